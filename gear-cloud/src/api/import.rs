//! Bulk item import
//!
//! Always answers HTTP 200 with an envelope; batch-level failures set
//! `success = false` and carry `error` instead of a row list.

use axum::{
    Extension, Json,
    extract::{Multipart, State},
};
use serde::Serialize;

use crate::auth::UserIdentity;
use crate::catalog::import::{self, ImportError, ImportReport, ImportRow, RowError};
use crate::state::AppState;

use super::ApiResult;
use super::image::read_file_field;

const CSV_FORMATS: &[&str] = &["csv", "txt"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportResponse {
    pub success: bool,
    pub accepted: usize,
    pub rejected: Vec<RowError>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ImportResponse {
    fn from_outcome(user_id: i64, outcome: Result<ImportReport, ImportError>) -> Self {
        match outcome {
            Ok(report) => {
                tracing::info!(
                    user_id,
                    accepted = report.accepted,
                    rejected = report.rejected.len(),
                    "Items imported"
                );
                Self {
                    success: true,
                    accepted: report.accepted,
                    rejected: report.rejected,
                    error: None,
                }
            }
            Err(ImportError::InvalidFile(msg)) => {
                tracing::warn!(user_id, error = %msg, "Import file rejected");
                Self::failed(format!("Invalid CSV file: {msg}"))
            }
            Err(ImportError::BatchFailed(e)) => {
                tracing::error!(user_id, error = %e, "Import batch failed");
                Self::failed("Import failed, no items were saved".to_string())
            }
        }
    }

    fn failed(error: String) -> Self {
        Self {
            success: false,
            accepted: 0,
            rejected: Vec::new(),
            error: Some(error),
        }
    }
}

/// POST /item/import
///
/// Multipart CSV in field `file`
pub async fn import_items(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    mut multipart: Multipart,
) -> ApiResult<ImportResponse> {
    let (_, data) = read_file_field(&mut multipart, CSV_FORMATS).await?;
    let outcome = import::import_csv(&state.catalog, identity.user_id, &data).await;
    Ok(Json(ImportResponse::from_outcome(identity.user_id, outcome)))
}

/// POST /item/import/rows
///
/// Rows already decoded by the client
pub async fn import_item_rows(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Json(rows): Json<Vec<ImportRow>>,
) -> ApiResult<ImportResponse> {
    let outcome = import::import_rows(&state.catalog, identity.user_id, rows).await;
    Ok(Json(ImportResponse::from_outcome(identity.user_id, outcome)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StoreError;

    #[test]
    fn test_success_envelope() {
        let report = ImportReport {
            accepted: 2,
            rejected: vec![RowError {
                line: 3,
                message: "Invalid unit: xyz".into(),
            }],
        };
        let resp = ImportResponse::from_outcome(1, Ok(report));
        assert!(resp.success);
        assert_eq!(resp.accepted, 2);
        assert_eq!(resp.rejected[0].line, 3);

        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_batch_failure_envelope() {
        let err = ImportError::BatchFailed(StoreError::Rejected("boom".into()));
        let resp = ImportResponse::from_outcome(1, Err(err));
        assert!(!resp.success);
        assert_eq!(resp.accepted, 0);
        assert!(resp.rejected.is_empty());
        assert!(resp.error.is_some());
    }
}
