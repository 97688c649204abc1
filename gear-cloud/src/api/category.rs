//! Category endpoints
//!
//! Categories themselves are global or user-owned; what a user lists and
//! orders are their item categories (bindings).

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    CategoryCreate, ItemCategory, ItemCategoryUpdate, ItemCategoryView, SortOrderUpdate,
};

use crate::auth::UserIdentity;
use crate::catalog::CatalogResolver;
use crate::db;
use crate::state::AppState;

use super::{ApiResult, internal};

/// POST /category
///
/// Returns the caller's item category for the name
pub async fn create_category(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Json(data): Json<CategoryCreate>,
) -> ApiResult<ItemCategoryView> {
    let resolver = CatalogResolver::new(&state.catalog);
    let binding_id = resolver.resolve_category(identity.user_id, &data.name).await?;

    let view = db::categories::list(&state.pool, identity.user_id)
        .await
        .map_err(internal)?
        .into_iter()
        .find(|c| c.id == binding_id)
        .ok_or_else(|| AppError::new(ErrorCode::ItemCategoryNotFound))?;
    Ok(Json(view))
}

/// GET /categories
pub async fn list_categories(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<Vec<ItemCategoryView>> {
    let categories = db::categories::list(&state.pool, identity.user_id)
        .await
        .map_err(internal)?;
    Ok(Json(categories))
}

/// PUT /category/sort
pub async fn sort_categories(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Json(updates): Json<Vec<SortOrderUpdate>>,
) -> ApiResult<bool> {
    db::categories::batch_update_sort_order(&state.pool, identity.user_id, &updates)
        .await
        .map_err(internal)?;
    Ok(Json(true))
}

/// PUT /category/{item_category_id}
pub async fn update_category(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Path(item_category_id): Path<i64>,
    Json(data): Json<ItemCategoryUpdate>,
) -> ApiResult<ItemCategory> {
    let Some(consumable) = data.consumable else {
        return Err(AppError::validation("Nothing to update"));
    };
    let updated =
        db::categories::set_consumable(&state.pool, identity.user_id, item_category_id, consumable)
            .await
            .map_err(internal)?
            .ok_or_else(|| AppError::new(ErrorCode::ItemCategoryNotFound))?;
    Ok(Json(updated))
}
