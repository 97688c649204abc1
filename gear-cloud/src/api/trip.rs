//! Trip endpoints

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::HeaderMap,
};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    Image, ImageCaptionUpdate, SortOrderUpdate, Trip, TripCreate, TripInfo, TripSitemapEntry,
    TripUpdate,
};

use crate::auth::UserIdentity;
use crate::auth::user_auth::optional_identity;
use crate::db;
use crate::error::ServiceResult;
use crate::state::AppState;
use crate::storage;

use super::{ApiResult, internal};

fn trip_not_found() -> AppError {
    AppError::new(ErrorCode::TripNotFound)
}

fn validate_dates(
    start: Option<chrono::NaiveDate>,
    end: Option<chrono::NaiveDate>,
) -> Result<(), AppError> {
    if let (Some(start), Some(end)) = (start, end)
        && end < start
    {
        return Err(AppError::validation("End date is before start date"));
    }
    Ok(())
}

/// Published trips are public; drafts only to their owner
async fn visible_trip(state: &AppState, headers: &HeaderMap, trip_id: i64) -> ServiceResult<Trip> {
    let trip = db::trips::find(&state.pool, trip_id)
        .await?
        .ok_or_else(trip_not_found)?;
    if trip.published {
        return Ok(trip);
    }
    match optional_identity(headers, &state.jwt_secret) {
        Some(identity) if identity.user_id == trip.user_id => Ok(trip),
        _ => Err(trip_not_found().into()),
    }
}

async fn owned_trip(state: &AppState, user_id: i64, trip_id: i64) -> ServiceResult<Trip> {
    let trip = db::trips::find_owned(&state.pool, user_id, trip_id)
        .await?
        .ok_or_else(trip_not_found)?;
    Ok(trip)
}

/// GET /trip
///
/// Public feed
pub async fn feed(State(state): State<AppState>) -> ApiResult<Vec<Trip>> {
    let trips = db::trips::feed(&state.pool).await.map_err(internal)?;
    Ok(Json(trips))
}

/// GET /trip/sitemap
pub async fn sitemap(State(state): State<AppState>) -> ApiResult<Vec<TripSitemapEntry>> {
    let entries = db::trips::sitemap(&state.pool).await.map_err(internal)?;
    Ok(Json(entries))
}

/// GET /trip/info/{trip_id}
///
/// Trip, its packs and the owner's unit preferences
pub async fn info(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(trip_id): Path<i64>,
) -> ApiResult<TripInfo> {
    let trip = visible_trip(&state, &headers, trip_id).await?;
    let packs = db::packs::list_for_trip(&state.pool, trip.id)
        .await
        .map_err(internal)?;
    let user = db::trips::owner(&state.pool, trip.user_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    Ok(Json(TripInfo { trip, packs, user }))
}

/// GET /trip/{trip_id}
pub async fn get_trip(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(trip_id): Path<i64>,
) -> ApiResult<Trip> {
    Ok(Json(visible_trip(&state, &headers, trip_id).await?))
}

/// GET /trip/{trip_id}/images
pub async fn list_images(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(trip_id): Path<i64>,
) -> ApiResult<Vec<Image>> {
    let trip = visible_trip(&state, &headers, trip_id).await?;
    let images = db::images::list_for_trip(&state.pool, trip.id)
        .await
        .map_err(internal)?;
    Ok(Json(images))
}

/// GET /trips
///
/// The caller's trips
pub async fn list_trips(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<Vec<Trip>> {
    let trips = db::trips::list_for_user(&state.pool, identity.user_id)
        .await
        .map_err(internal)?;
    Ok(Json(trips))
}

/// POST /trip
pub async fn create_trip(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Json(input): Json<TripCreate>,
) -> ApiResult<Trip> {
    if input.title.trim().is_empty() {
        return Err(AppError::validation("Trip title is required"));
    }
    validate_dates(input.start_date, input.end_date)?;

    let trip = db::trips::create(&state.pool, identity.user_id, &input)
        .await
        .map_err(internal)?;
    tracing::info!(user_id = identity.user_id, trip_id = trip.id, "Trip created");
    Ok(Json(trip))
}

/// PUT /trip/{trip_id}
pub async fn update_trip(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(trip_id): Path<i64>,
    Json(input): Json<TripUpdate>,
) -> ApiResult<Trip> {
    if input.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(AppError::validation("Trip title is required"));
    }
    let current = owned_trip(&state, identity.user_id, trip_id).await?;
    validate_dates(
        input.start_date.or(current.start_date),
        input.end_date.or(current.end_date),
    )?;

    let trip = db::trips::update(&state.pool, identity.user_id, trip_id, &input)
        .await
        .map_err(internal)?
        .ok_or_else(trip_not_found)?;
    Ok(Json(trip))
}

/// POST /trip/{trip_id}/clone
pub async fn clone_trip(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(trip_id): Path<i64>,
) -> ApiResult<Trip> {
    let source = owned_trip(&state, identity.user_id, trip_id).await?;
    let trip = db::trips::clone_trip(&state.pool, &source)
        .await
        .map_err(internal)?;
    tracing::info!(user_id = identity.user_id, source_id = trip_id, trip_id = trip.id, "Trip cloned");
    Ok(Json(trip))
}

/// PUT /trip/{trip_id}/publish
///
/// Flips the published flag
pub async fn toggle_publish(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(trip_id): Path<i64>,
) -> ApiResult<Trip> {
    let trip = db::trips::toggle_published(&state.pool, identity.user_id, trip_id)
        .await
        .map_err(internal)?
        .ok_or_else(trip_not_found)?;
    Ok(Json(trip))
}

/// DELETE /trip/{trip_id}
///
/// Soft delete; packs are detached, images removed
pub async fn delete_trip(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(trip_id): Path<i64>,
) -> ApiResult<bool> {
    let keys = db::trips::soft_delete(&state.pool, identity.user_id, trip_id)
        .await
        .map_err(internal)?
        .ok_or_else(trip_not_found)?;

    let keys: Vec<&str> = keys
        .iter()
        .flat_map(|(original, thumb)| [original.as_str(), thumb.as_str()])
        .collect();
    storage::delete_all(&state.s3, &keys).await;

    tracing::info!(user_id = identity.user_id, trip_id, "Trip removed");
    Ok(Json(true))
}

/// POST /trip/{trip_id}/sort-photos
pub async fn sort_images(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(trip_id): Path<i64>,
    Json(mut order): Json<Vec<SortOrderUpdate>>,
) -> ApiResult<Vec<Image>> {
    owned_trip(&state, identity.user_id, trip_id).await?;

    order.sort_by_key(|o| o.sort_order);
    let ids: Vec<i64> = order.iter().map(|o| o.id).collect();
    db::images::batch_update_sort_order(&state.pool, identity.user_id, trip_id, &ids)
        .await
        .map_err(internal)?;

    let images = db::images::list_for_trip(&state.pool, trip_id)
        .await
        .map_err(internal)?;
    Ok(Json(images))
}

/// PUT /trip/{trip_id}/image/{image_id}
pub async fn update_image(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path((trip_id, image_id)): Path<(i64, i64)>,
    Json(data): Json<ImageCaptionUpdate>,
) -> ApiResult<Image> {
    owned_trip(&state, identity.user_id, trip_id).await?;

    let caption = data.caption.as_deref().map(str::trim).filter(|c| !c.is_empty());
    let image = db::images::set_caption(&state.pool, identity.user_id, image_id, caption)
        .await
        .map_err(internal)?
        .filter(|i| i.trip_id == Some(trip_id))
        .ok_or_else(|| AppError::new(ErrorCode::ImageNotFound))?;
    Ok(Json(image))
}

/// DELETE /trip/{trip_id}/image/{image_id}
pub async fn delete_image(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path((trip_id, image_id)): Path<(i64, i64)>,
) -> ApiResult<serde_json::Value> {
    owned_trip(&state, identity.user_id, trip_id).await?;

    let image = db::images::find_owned(&state.pool, identity.user_id, image_id)
        .await
        .map_err(internal)?
        .filter(|i| i.trip_id == Some(trip_id))
        .ok_or_else(|| AppError::new(ErrorCode::ImageNotFound))?;

    super::image::remove_image(&state, &image).await?;
    Ok(Json(serde_json::json!({
        "trip_id": trip_id,
        "image_id": image_id,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_validate_dates() {
        let d = |day| NaiveDate::from_ymd_opt(2024, 7, day);
        assert!(validate_dates(d(1), d(3)).is_ok());
        assert!(validate_dates(d(3), d(3)).is_ok());
        assert!(validate_dates(None, d(3)).is_ok());
        assert!(validate_dates(d(4), d(3)).is_err());
    }
}
