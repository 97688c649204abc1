//! Catalog Models (brands, products, variants, categories)

use serde::{Deserialize, Serialize};

/// Brand entity, shared by every user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Brand {
    pub id: i64,
    pub name: String,
    pub removed: bool,
}

/// Product entity, name unique within its brand
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub brand_id: i64,
    pub name: String,
    pub removed: bool,
}

/// Free-text descriptor of a product (size, color, ...)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductVariant {
    pub id: i64,
    pub product_id: i64,
    pub name: String,
}

/// Category entity
///
/// `user_id = None` marks a shared category visible to all users.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub user_id: Option<i64>,
    pub name: String,
}

/// Per-user binding of a category, carrying the user's own ordering
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ItemCategory {
    pub id: i64,
    pub user_id: i64,
    pub category_id: i64,
    pub sort_order: i32,
    pub consumable: bool,
}

/// Item category joined with its category name, as listed to the owner
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ItemCategoryView {
    pub id: i64,
    pub category_id: i64,
    pub name: String,
    pub sort_order: i32,
    pub consumable: bool,
}

/// Create category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
}

/// Update item category payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemCategoryUpdate {
    pub consumable: Option<bool>,
}

/// One entry of a batch reorder request (items or item categories)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SortOrderUpdate {
    pub id: i64,
    pub sort_order: i32,
}
