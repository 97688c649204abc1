//! Pack endpoints

use std::collections::HashSet;

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    Pack, PackAssign, PackDetail, PackInput, PackItemToggle, PackWeightSummary, Trip,
};
use shared::units::UnitSystem;

use crate::auth::UserIdentity;
use crate::db;
use crate::error::ServiceResult;
use crate::state::AppState;

use super::{ApiResult, internal};

fn pack_not_found() -> AppError {
    AppError::new(ErrorCode::PackNotFound)
}

/// Title present, quantities positive, no item listed twice
fn validate_input(input: &PackInput) -> Result<(), AppError> {
    if input.title.trim().is_empty() {
        return Err(AppError::validation("Pack title is required"));
    }
    let mut seen = HashSet::new();
    for item in &input.items {
        if !seen.insert(item.item_id) {
            return Err(AppError::validation(format!(
                "Item {} is listed more than once",
                item.item_id
            )));
        }
        if let Some(q) = item.quantity
            && (!q.is_finite() || q <= 0.0)
        {
            return Err(AppError::with_message(
                ErrorCode::InvalidNumber,
                format!("Invalid quantity: {q}"),
            ));
        }
    }
    Ok(())
}

/// Items and trip referenced by `input` must belong to the caller
async fn check_ownership(state: &AppState, user_id: i64, input: &PackInput) -> ServiceResult<()> {
    if !input.items.is_empty() {
        let ids: Vec<i64> = input.items.iter().map(|i| i.item_id).collect();
        let owned = db::packs::count_owned_items(&state.pool, user_id, &ids).await?;
        if owned != ids.len() as i64 {
            return Err(AppError::new(ErrorCode::ItemNotFound).into());
        }
    }
    if let Some(trip_id) = input.trip_id {
        db::trips::find_owned(&state.pool, user_id, trip_id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::TripNotFound))?;
    }
    Ok(())
}

/// Pack with items and weight totals in the owner's preferred unit
async fn load_detail(state: &AppState, pack: Pack) -> ServiceResult<PackDetail> {
    let items = db::packs::list_items(&state.pool, pack.id).await?;
    let unit = db::trips::owner(&state.pool, pack.user_id)
        .await?
        .and_then(|owner| UnitSystem::from_db(&owner.unit_weight))
        .unwrap_or(UnitSystem::Metric)
        .summary_unit();

    let summary = PackWeightSummary::compute(&items, unit);
    Ok(PackDetail {
        pack,
        items,
        summary,
    })
}

/// GET /packs
pub async fn list_packs(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<Vec<Pack>> {
    let packs = db::packs::list_for_user(&state.pool, identity.user_id)
        .await
        .map_err(internal)?;
    Ok(Json(packs))
}

/// GET /pack/trip/{trip_id}
pub async fn list_trip_packs(
    State(state): State<AppState>,
    Path(trip_id): Path<i64>,
) -> ApiResult<Vec<Pack>> {
    let packs = db::packs::list_for_trip(&state.pool, trip_id)
        .await
        .map_err(internal)?;
    Ok(Json(packs))
}

/// GET /pack/{pack_id}
pub async fn get_pack(
    State(state): State<AppState>,
    Path(pack_id): Path<i64>,
) -> ApiResult<PackDetail> {
    let pack = db::packs::find(&state.pool, pack_id)
        .await
        .map_err(internal)?
        .ok_or_else(pack_not_found)?;
    Ok(Json(load_detail(&state, pack).await?))
}

/// POST /pack
pub async fn create_pack(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Json(input): Json<PackInput>,
) -> ApiResult<PackDetail> {
    validate_input(&input)?;
    check_ownership(&state, identity.user_id, &input).await?;

    let pack = db::packs::create(&state.pool, identity.user_id, &input)
        .await
        .map_err(internal)?;
    tracing::info!(user_id = identity.user_id, pack_id = pack.id, "Pack created");
    Ok(Json(load_detail(&state, pack).await?))
}

/// PUT /pack/{pack_id}
///
/// Replaces title, trip and the item list
pub async fn update_pack(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(pack_id): Path<i64>,
    Json(input): Json<PackInput>,
) -> ApiResult<PackDetail> {
    validate_input(&input)?;
    check_ownership(&state, identity.user_id, &input).await?;

    let pack = db::packs::replace(&state.pool, identity.user_id, pack_id, &input)
        .await
        .map_err(internal)?
        .ok_or_else(pack_not_found)?;
    Ok(Json(load_detail(&state, pack).await?))
}

/// PUT /pack/{pack_id}/item/{item_id}
pub async fn toggle_item(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path((pack_id, item_id)): Path<(i64, i64)>,
    Json(data): Json<PackItemToggle>,
) -> ApiResult<bool> {
    let updated =
        db::packs::set_item_checked(&state.pool, identity.user_id, pack_id, item_id, data.checked)
            .await
            .map_err(internal)?;
    if !updated {
        return Err(AppError::new(ErrorCode::PackItemNotFound));
    }
    Ok(Json(data.checked))
}

/// PUT /pack/{pack_id}/assign
///
/// `trip_id: null` detaches the pack
pub async fn assign_pack(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(pack_id): Path<i64>,
    Json(data): Json<PackAssign>,
) -> ApiResult<Pack> {
    if let Some(trip_id) = data.trip_id {
        db::trips::find_owned(&state.pool, identity.user_id, trip_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| AppError::new(ErrorCode::TripNotFound))?;
    }
    let pack = db::packs::assign_trip(&state.pool, identity.user_id, pack_id, data.trip_id)
        .await
        .map_err(internal)?
        .ok_or_else(pack_not_found)?;
    Ok(Json(pack))
}

/// POST /pack/{pack_id}/generate
///
/// New trip named after the pack
pub async fn generate_trip(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(pack_id): Path<i64>,
) -> ApiResult<Trip> {
    let pack = db::packs::find_owned(&state.pool, identity.user_id, pack_id)
        .await
        .map_err(internal)?
        .ok_or_else(pack_not_found)?;

    let trip = db::packs::generate_trip(&state.pool, &pack)
        .await
        .map_err(internal)?;
    tracing::info!(user_id = identity.user_id, pack_id, trip_id = trip.id, "Trip generated from pack");
    Ok(Json(trip))
}

/// DELETE /pack/{pack_id}
pub async fn delete_pack(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(pack_id): Path<i64>,
) -> ApiResult<bool> {
    let removed = db::packs::soft_delete(&state.pool, identity.user_id, pack_id)
        .await
        .map_err(internal)?;
    if !removed {
        return Err(pack_not_found());
    }
    Ok(Json(true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::PackItemInput;

    fn input(title: &str, items: &[(i64, Option<f64>)]) -> PackInput {
        PackInput {
            title: title.into(),
            trip_id: None,
            items: items
                .iter()
                .map(|(item_id, quantity)| PackItemInput {
                    item_id: *item_id,
                    quantity: *quantity,
                    worn: false,
                    checked: false,
                    sort_order: 0,
                })
                .collect(),
        }
    }

    #[test]
    fn test_validate_input() {
        assert!(validate_input(&input("Weekend", &[(1, None), (2, Some(2.0))])).is_ok());
        assert!(validate_input(&input("  ", &[])).is_err());
        assert!(validate_input(&input("Weekend", &[(1, None), (1, None)])).is_err());

        let err = validate_input(&input("Weekend", &[(1, Some(0.0))])).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidNumber);
    }
}
