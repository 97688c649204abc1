//! Catalog browsing for item form autocomplete

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::models::{Brand, Product, ProductVariant};

use crate::db;
use crate::state::AppState;

use super::{ApiResult, internal};

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 100;

#[derive(Debug, Deserialize)]
pub struct BrandQuery {
    #[serde(default)]
    pub q: String,
    pub limit: Option<i64>,
}

/// GET /catalog/brands?q=
pub async fn search_brands(
    State(state): State<AppState>,
    Query(query): Query<BrandQuery>,
) -> ApiResult<Vec<Brand>> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let brands = db::catalog::search_brands(&state.pool, query.q.trim(), limit)
        .await
        .map_err(internal)?;
    Ok(Json(brands))
}

/// GET /catalog/brands/{brand_id}/products
pub async fn list_products(
    State(state): State<AppState>,
    Path(brand_id): Path<i64>,
) -> ApiResult<Vec<Product>> {
    let products = db::catalog::list_products(&state.pool, brand_id)
        .await
        .map_err(internal)?;
    Ok(Json(products))
}

/// GET /catalog/products/{product_id}/variants
pub async fn list_variants(
    State(state): State<AppState>,
    Path(product_id): Path<i64>,
) -> ApiResult<Vec<ProductVariant>> {
    let variants = db::catalog::list_variants(&state.pool, product_id)
        .await
        .map_err(internal)?;
    Ok(Json(variants))
}
