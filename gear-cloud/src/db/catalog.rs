//! Catalog storage in PostgreSQL
//!
//! Case-insensitive uniqueness comes from the `lower(name)` unique indexes,
//! so `insert_if_absent` is a plain `ON CONFLICT DO NOTHING` followed by a
//! lookup of the winning row.

use async_trait::async_trait;
use shared::models::{Brand, Product, ProductVariant};
use sqlx::PgPool;

use crate::catalog::{CatalogKind, CatalogStore, NewItem, StoreError};

use super::BoxError;

/// Postgres-backed [`CatalogStore`]
#[derive(Clone)]
pub struct PgCatalog {
    pool: PgPool,
}

impl PgCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn table(kind: CatalogKind) -> &'static str {
    match kind {
        CatalogKind::Brand => "brands",
        CatalogKind::Product => "products",
        CatalogKind::Variant => "product_variants",
        CatalogKind::Category => "categories",
    }
}

fn scope_column(kind: CatalogKind) -> Option<&'static str> {
    match kind {
        CatalogKind::Brand => None,
        CatalogKind::Product => Some("brand_id"),
        CatalogKind::Variant => Some("product_id"),
        CatalogKind::Category => Some("user_id"),
    }
}

#[async_trait]
impl CatalogStore for PgCatalog {
    async fn find_id(
        &self,
        kind: CatalogKind,
        name: &str,
        scope: Option<i64>,
    ) -> Result<Option<i64>, StoreError> {
        let row: Option<(i64,)> = match scope_column(kind) {
            Some(col) => {
                let sql = format!(
                    "SELECT id FROM {} WHERE {col} IS NOT DISTINCT FROM $2 AND lower(name) = lower($1) ORDER BY id LIMIT 1",
                    table(kind)
                );
                sqlx::query_as(&sql)
                    .bind(name)
                    .bind(scope)
                    .fetch_optional(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT id FROM {} WHERE lower(name) = lower($1) ORDER BY id LIMIT 1",
                    table(kind)
                );
                sqlx::query_as(&sql)
                    .bind(name)
                    .fetch_optional(&self.pool)
                    .await?
            }
        };
        Ok(row.map(|r| r.0))
    }

    async fn insert_if_absent(
        &self,
        kind: CatalogKind,
        name: &str,
        scope: Option<i64>,
    ) -> Result<i64, StoreError> {
        let row: Option<(i64,)> = match scope_column(kind) {
            Some(col) => {
                let sql = format!(
                    "INSERT INTO {} (name, {col}) VALUES ($1, $2) ON CONFLICT DO NOTHING RETURNING id",
                    table(kind)
                );
                sqlx::query_as(&sql)
                    .bind(name)
                    .bind(scope)
                    .fetch_optional(&self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "INSERT INTO {} (name) VALUES ($1) ON CONFLICT DO NOTHING RETURNING id",
                    table(kind)
                );
                sqlx::query_as(&sql)
                    .bind(name)
                    .fetch_optional(&self.pool)
                    .await?
            }
        };

        if let Some((id,)) = row {
            return Ok(id);
        }
        // Lost the race: another writer inserted the same name
        self.find_id(kind, name, scope)
            .await?
            .ok_or_else(|| StoreError::Missing(kind.to_string()))
    }

    async fn exists(
        &self,
        kind: CatalogKind,
        id: i64,
        scope: Option<i64>,
    ) -> Result<bool, StoreError> {
        let found: (bool,) = match (kind, scope_column(kind)) {
            (CatalogKind::Category, _) => {
                sqlx::query_as(
                    "SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1 AND (user_id IS NULL OR user_id = $2))",
                )
                .bind(id)
                .bind(scope)
                .fetch_one(&self.pool)
                .await?
            }
            (_, Some(col)) => {
                let sql = format!(
                    "SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1 AND {col} = $2)",
                    table(kind)
                );
                sqlx::query_as(&sql)
                    .bind(id)
                    .bind(scope)
                    .fetch_one(&self.pool)
                    .await?
            }
            (_, None) => {
                let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1)", table(kind));
                sqlx::query_as(&sql).bind(id).fetch_one(&self.pool).await?
            }
        };
        Ok(found.0)
    }

    async fn find_binding(
        &self,
        category_id: i64,
        user_id: i64,
    ) -> Result<Option<i64>, StoreError> {
        let row: Option<(i64,)> = sqlx::query_as(
            "SELECT id FROM item_categories WHERE category_id = $1 AND user_id = $2",
        )
        .bind(category_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(|r| r.0))
    }

    async fn insert_binding_if_absent(
        &self,
        category_id: i64,
        user_id: i64,
    ) -> Result<i64, StoreError> {
        let row: Option<(i64,)> = sqlx::query_as(
            r#"
            INSERT INTO item_categories (category_id, user_id, sort_order)
            SELECT $1, $2, COUNT(*)::int FROM item_categories WHERE user_id = $2
            ON CONFLICT (category_id, user_id) DO NOTHING
            RETURNING id
            "#,
        )
        .bind(category_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some((id,)) = row {
            return Ok(id);
        }
        self.find_binding(category_id, user_id)
            .await?
            .ok_or_else(|| StoreError::Missing("item category".into()))
    }

    async fn insert_items(&self, items: &[NewItem]) -> Result<Vec<i64>, StoreError> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let now = shared::util::now_millis();
        let user_ids: Vec<i64> = items.iter().map(|i| i.user_id).collect();
        let brand_ids: Vec<Option<i64>> = items.iter().map(|i| i.brand_id).collect();
        let product_ids: Vec<Option<i64>> = items.iter().map(|i| i.product_id).collect();
        let variant_ids: Vec<Option<i64>> = items.iter().map(|i| i.product_variant_id).collect();
        let category_ids: Vec<Option<i64>> = items.iter().map(|i| i.category_id).collect();
        let sort_orders: Vec<i32> = items.iter().map(|i| i.sort_order).collect();
        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        let weights: Vec<Option<f64>> = items.iter().map(|i| i.weight).collect();
        let units: Vec<Option<&str>> = items.iter().map(|i| i.unit.map(|u| u.as_str())).collect();
        let prices: Vec<Option<f64>> = items.iter().map(|i| i.price).collect();
        let consumables: Vec<bool> = items.iter().map(|i| i.consumable).collect();
        let urls: Vec<Option<&str>> = items.iter().map(|i| i.product_url.as_deref()).collect();
        let wishlists: Vec<bool> = items.iter().map(|i| i.wishlist).collect();
        let notes: Vec<Option<&str>> = items.iter().map(|i| i.notes.as_deref()).collect();

        // One statement: all rows or none. Sort orders continue after the
        // user's existing items.
        let rows: Vec<(i64,)> = sqlx::query_as(
            r#"
            INSERT INTO items (
                user_id, brand_id, product_id, product_variant_id, category_id,
                sort_order, name, weight, unit, price, consumable, product_url,
                wishlist, notes, created_at, updated_at
            )
            SELECT u, b, p, v, c,
                   s + (SELECT COALESCE(MAX(sort_order) + 1, 0) FROM items WHERE user_id = u AND NOT removed),
                   n, w, un, pr, co, url, wl, nt, $15, $15
            FROM UNNEST(
                $1::bigint[], $2::bigint[], $3::bigint[], $4::bigint[], $5::bigint[],
                $6::integer[], $7::text[], $8::float8[], $9::text[], $10::float8[],
                $11::boolean[], $12::text[], $13::boolean[], $14::text[]
            ) AS t(u, b, p, v, c, s, n, w, un, pr, co, url, wl, nt)
            RETURNING id
            "#,
        )
        .bind(&user_ids)
        .bind(&brand_ids)
        .bind(&product_ids)
        .bind(&variant_ids)
        .bind(&category_ids)
        .bind(&sort_orders)
        .bind(&names)
        .bind(&weights)
        .bind(&units)
        .bind(&prices)
        .bind(&consumables)
        .bind(&urls)
        .bind(&wishlists)
        .bind(&notes)
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.0).collect())
    }
}

// ── Catalog browsing (autocomplete) ──

pub async fn search_brands(pool: &PgPool, query: &str, limit: i64) -> Result<Vec<Brand>, BoxError> {
    let rows = sqlx::query_as::<_, Brand>(
        "SELECT id, name, removed FROM brands WHERE NOT removed AND name ILIKE $1 ORDER BY name LIMIT $2",
    )
    .bind(format!("{}%", escape_like(query)))
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn list_products(pool: &PgPool, brand_id: i64) -> Result<Vec<Product>, BoxError> {
    let rows = sqlx::query_as::<_, Product>(
        "SELECT id, brand_id, name, removed FROM products WHERE brand_id = $1 AND NOT removed ORDER BY name",
    )
    .bind(brand_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn list_variants(pool: &PgPool, product_id: i64) -> Result<Vec<ProductVariant>, BoxError> {
    let rows = sqlx::query_as::<_, ProductVariant>(
        "SELECT id, product_id, name FROM product_variants WHERE product_id = $1 ORDER BY name",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn test_scope_columns() {
        assert_eq!(scope_column(CatalogKind::Brand), None);
        assert_eq!(scope_column(CatalogKind::Product), Some("brand_id"));
        assert_eq!(scope_column(CatalogKind::Category), Some("user_id"));
        assert_eq!(table(CatalogKind::Variant), "product_variants");
    }
}
