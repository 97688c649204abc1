//! Catalog reconciliation
//!
//! Free-text brand / product / variant / category names coming from item
//! forms and CSV imports are turned into canonical row ids here:
//!
//! - [`resolver`]: case-insensitive get-or-create of catalog rows
//! - [`binding`]: lazy per-user [`ItemCategory`](shared::models::ItemCategory) rows
//! - [`import`]: bulk CSV import on top of both
//!
//! All three talk to storage through the [`CatalogStore`] trait; Postgres
//! lives in [`crate::db::catalog::PgCatalog`]; tests use `MemoryCatalog`
//! (built with `cfg(test)` or the `test-util` feature).

pub mod binding;
pub mod import;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod resolver;
pub mod store;

pub use binding::get_or_create_binding;
pub use import::{ImportError, ImportReport, ImportRow, RowError};
#[cfg(any(test, feature = "test-util"))]
pub use memory::MemoryCatalog;
pub use resolver::CatalogResolver;
pub use store::{CatalogStore, NewItem, StoreError};

use shared::error::{AppError, ErrorCode};
use shared::limits;
use std::fmt;

/// Kind of catalog row a name resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CatalogKind {
    Brand,
    Product,
    Variant,
    Category,
}

impl CatalogKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogKind::Brand => "brand",
            CatalogKind::Product => "product",
            CatalogKind::Variant => "variant",
            CatalogKind::Category => "category",
        }
    }

    /// Whether rows of this kind cannot exist without a parent id
    pub fn requires_parent(&self) -> bool {
        matches!(self, CatalogKind::Product | CatalogKind::Variant)
    }

    /// Longest name a row of this kind can hold
    pub fn max_name_len(&self) -> usize {
        match self {
            CatalogKind::Brand => limits::BRAND_NAME_MAX_LEN,
            CatalogKind::Product => limits::PRODUCT_NAME_MAX_LEN,
            CatalogKind::Variant => limits::VARIANT_NAME_MAX_LEN,
            CatalogKind::Category => limits::CATEGORY_NAME_MAX_LEN,
        }
    }

    fn not_found_code(&self) -> ErrorCode {
        match self {
            CatalogKind::Brand => ErrorCode::BrandNotFound,
            CatalogKind::Product => ErrorCode::ProductNotFound,
            CatalogKind::Variant => ErrorCode::VariantNotFound,
            CatalogKind::Category => ErrorCode::CategoryNotFound,
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by the resolver and the binding service
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Name is empty after trimming
    #[error("{0} name is required")]
    EmptyName(CatalogKind),

    /// Name is longer than the column allows
    #[error("{kind} name too long (max {max})")]
    NameTooLong { kind: CatalogKind, max: usize },

    /// Other bad input (missing parent, malformed reference)
    #[error("{0}")]
    Validation(String),

    /// A referenced id does not exist (or is not visible to the user)
    #[error("{kind} {id} not found")]
    NotFound { kind: CatalogKind, id: i64 },

    /// Persistence failed; never retried here
    #[error(transparent)]
    Storage(#[from] StoreError),
}

impl CatalogError {
    /// Whether the error is caused by the input rather than storage
    pub fn is_validation(&self) -> bool {
        !matches!(self, CatalogError::Storage(_))
    }
}

impl From<CatalogError> for AppError {
    fn from(e: CatalogError) -> Self {
        match e {
            CatalogError::EmptyName(kind) => AppError::with_message(
                ErrorCode::CatalogNameRequired,
                format!("{kind} name is required"),
            ),
            CatalogError::NameTooLong { kind, max } => {
                AppError::validation(format!("{kind} name too long (max {max})"))
                    .with_detail("max", max)
            }
            CatalogError::Validation(msg) => AppError::validation(msg),
            CatalogError::NotFound { kind, id } => {
                AppError::with_message(kind.not_found_code(), format!("{kind} {id} not found"))
                    .with_detail("id", id)
            }
            CatalogError::Storage(err) => {
                tracing::error!(error = %err, "Catalog storage error");
                AppError::new(ErrorCode::CatalogCreateFailed)
            }
        }
    }
}

/// Trim a catalog name, rejecting empty and overlong input
pub fn clean_name(kind: CatalogKind, name: &str) -> Result<String, CatalogError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::EmptyName(kind));
    }
    let max = kind.max_name_len();
    if limits::exceeds(trimmed, max) {
        return Err(CatalogError::NameTooLong { kind, max });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_name() {
        assert_eq!(clean_name(CatalogKind::Brand, "  Osprey ").unwrap(), "Osprey");
        let err = clean_name(CatalogKind::Product, "   ").unwrap_err();
        assert!(matches!(err, CatalogError::EmptyName(CatalogKind::Product)));
        assert_eq!(err.to_string(), "product name is required");

        let long = "x".repeat(51);
        let err = clean_name(CatalogKind::Category, &long).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::NameTooLong {
                kind: CatalogKind::Category,
                max: 50
            }
        ));
        assert_eq!(err.to_string(), "category name too long (max 50)");
        assert!(clean_name(CatalogKind::Product, &long).is_ok());
    }

    #[test]
    fn test_error_mapping() {
        let app: AppError = CatalogError::EmptyName(CatalogKind::Brand).into();
        assert_eq!(app.code, ErrorCode::CatalogNameRequired);

        let app: AppError = CatalogError::NameTooLong {
            kind: CatalogKind::Brand,
            max: 100,
        }
        .into();
        assert_eq!(app.code, ErrorCode::ValidationFailed);
        assert_eq!(app.message, "brand name too long (max 100)");

        let app: AppError = CatalogError::Validation("product requires a brand".into()).into();
        assert_eq!(app.code, ErrorCode::ValidationFailed);

        let app: AppError = CatalogError::NotFound {
            kind: CatalogKind::Brand,
            id: 7,
        }
        .into();
        assert_eq!(app.code, ErrorCode::BrandNotFound);
        assert_eq!(app.message, "brand 7 not found");

        let app: AppError = CatalogError::Storage(StoreError::Missing("brand".into())).into();
        assert_eq!(app.code, ErrorCode::CatalogCreateFailed);
        assert_eq!(app.http_status(), http::StatusCode::BAD_REQUEST);
    }
}
