//! Item Model

use serde::{Deserialize, Serialize};

use crate::units::WeightUnit;

/// Gear item owned by a user
///
/// `category_id` references an [`ItemCategory`](super::ItemCategory), never
/// a [`Category`](super::Category) directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Item {
    pub id: i64,
    pub user_id: i64,
    pub brand_id: Option<i64>,
    pub product_id: Option<i64>,
    pub product_variant_id: Option<i64>,
    pub category_id: Option<i64>,
    pub sort_order: i32,
    pub removed: bool,
    pub name: String,
    pub weight: Option<f64>,
    /// Canonical unit token (`g`, `kg`, `oz`, `lb`)
    pub unit: Option<String>,
    pub price: Option<f64>,
    pub consumable: bool,
    pub product_url: Option<String>,
    pub wishlist: bool,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Item {
    pub fn weight_unit(&self) -> Option<WeightUnit> {
        self.unit.as_deref().and_then(WeightUnit::parse_token)
    }
}

/// Item joined with catalog names, as listed to the owner
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ItemView {
    #[serde(flatten)]
    #[cfg_attr(feature = "db", sqlx(flatten))]
    pub item: Item,
    pub brand_name: Option<String>,
    pub product_name: Option<String>,
    pub variant_name: Option<String>,
    pub category_name: Option<String>,
}

/// Catalog reference in a payload: either an existing id or a free-text name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CatalogRef {
    Id(i64),
    Name(String),
}

/// Create item payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemCreate {
    pub name: String,
    pub brand: Option<CatalogRef>,
    pub product: Option<CatalogRef>,
    pub variant: Option<CatalogRef>,
    pub category: Option<CatalogRef>,
    pub weight: Option<f64>,
    /// Unit token; synonyms such as `Pounds` are accepted
    pub unit: Option<String>,
    pub price: Option<f64>,
    #[serde(default)]
    pub consumable: bool,
    pub product_url: Option<String>,
    #[serde(default)]
    pub wishlist: bool,
    pub notes: Option<String>,
}

/// Update item payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ItemUpdate {
    pub name: Option<String>,
    pub brand: Option<CatalogRef>,
    pub product: Option<CatalogRef>,
    pub variant: Option<CatalogRef>,
    pub category: Option<CatalogRef>,
    pub weight: Option<f64>,
    /// Unit token; synonyms such as `Pounds` are accepted
    pub unit: Option<String>,
    pub price: Option<f64>,
    pub consumable: Option<bool>,
    pub product_url: Option<String>,
    pub wishlist: Option<bool>,
    pub notes: Option<String>,
}
