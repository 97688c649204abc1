//! Storage seam for catalog reconciliation

use async_trait::async_trait;
use shared::units::WeightUnit;

use super::CatalogKind;

/// Persistence failure
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Insert reported a conflict but the conflicting row could not be read back
    #[error("Conflicting {0} row not found after insert")]
    Missing(String),

    /// Backend rejected the write for another reason
    #[error("Storage error: {0}")]
    Rejected(String),
}

/// Item record staged for insertion, catalog references already resolved
#[derive(Debug, Clone, PartialEq)]
pub struct NewItem {
    pub user_id: i64,
    pub brand_id: Option<i64>,
    pub product_id: Option<i64>,
    pub product_variant_id: Option<i64>,
    /// Item category (binding) id
    pub category_id: Option<i64>,
    pub sort_order: i32,
    pub name: String,
    pub weight: Option<f64>,
    pub unit: Option<WeightUnit>,
    pub price: Option<f64>,
    pub consumable: bool,
    pub product_url: Option<String>,
    pub wishlist: bool,
    pub notes: Option<String>,
}

/// Row-level operations the resolver, binding service and importer need.
///
/// `scope` is the parent id: brand for products, product for variants,
/// owner user for categories (`None` = shared), ignored for brands.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Case-insensitive exact match on `name` within `scope`
    async fn find_id(
        &self,
        kind: CatalogKind,
        name: &str,
        scope: Option<i64>,
    ) -> Result<Option<i64>, StoreError>;

    /// Insert `name` unless a case-insensitive match already exists in
    /// `scope`; returns the id of whichever row wins. Atomic.
    async fn insert_if_absent(
        &self,
        kind: CatalogKind,
        name: &str,
        scope: Option<i64>,
    ) -> Result<i64, StoreError>;

    /// Whether row `id` exists within `scope`: products must belong to
    /// brand `scope` and variants to product `scope`. For categories `scope`
    /// is the requesting user and the row must be shared or owned by them.
    async fn exists(
        &self,
        kind: CatalogKind,
        id: i64,
        scope: Option<i64>,
    ) -> Result<bool, StoreError>;

    /// Existing item category for `(category_id, user_id)`
    async fn find_binding(&self, category_id: i64, user_id: i64)
    -> Result<Option<i64>, StoreError>;

    /// Create the `(category_id, user_id)` binding with `sort_order` equal
    /// to the user's current binding count, unless it exists. Atomic.
    async fn insert_binding_if_absent(
        &self,
        category_id: i64,
        user_id: i64,
    ) -> Result<i64, StoreError>;

    /// Insert all items or none; returns the new ids in input order
    async fn insert_items(&self, items: &[NewItem]) -> Result<Vec<i64>, StoreError>;
}
