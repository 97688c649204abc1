//! Item database operations

use shared::models::{Item, ItemView, SortOrderUpdate};
use sqlx::PgPool;

use super::BoxError;
use crate::catalog::NewItem;

const ITEM_COLUMNS: &str = "i.id, i.user_id, i.brand_id, i.product_id, i.product_variant_id, \
     i.category_id, i.sort_order, i.removed, i.name, i.weight, i.unit, i.price, i.consumable, \
     i.product_url, i.wishlist, i.notes, i.created_at, i.updated_at";

pub async fn create(pool: &PgPool, item: &NewItem) -> Result<Item, BoxError> {
    let now = shared::util::now_millis();
    let row = sqlx::query_as::<_, Item>(
        r#"
        INSERT INTO items (
            user_id, brand_id, product_id, product_variant_id, category_id,
            sort_order, name, weight, unit, price, consumable, product_url,
            wishlist, notes, created_at, updated_at
        )
        VALUES (
            $1, $2, $3, $4, $5,
            (SELECT COALESCE(MAX(sort_order) + 1, 0) FROM items WHERE user_id = $1 AND NOT removed),
            $6, $7, $8, $9, $10, $11, $12, $13, $14, $14
        )
        RETURNING id, user_id, brand_id, product_id, product_variant_id, category_id,
                  sort_order, removed, name, weight, unit, price, consumable,
                  product_url, wishlist, notes, created_at, updated_at
        "#,
    )
    .bind(item.user_id)
    .bind(item.brand_id)
    .bind(item.product_id)
    .bind(item.product_variant_id)
    .bind(item.category_id)
    .bind(&item.name)
    .bind(item.weight)
    .bind(item.unit.map(|u| u.as_str()))
    .bind(item.price)
    .bind(item.consumable)
    .bind(&item.product_url)
    .bind(item.wishlist)
    .bind(&item.notes)
    .bind(now)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Item of `user_id`, removed items excluded
pub async fn find(pool: &PgPool, user_id: i64, item_id: i64) -> Result<Option<Item>, BoxError> {
    let sql = format!(
        "SELECT {ITEM_COLUMNS} FROM items i WHERE i.id = $1 AND i.user_id = $2 AND NOT i.removed"
    );
    let row = sqlx::query_as::<_, Item>(&sql)
        .bind(item_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Non-removed items of a user with catalog names, in sort order
pub async fn list(pool: &PgPool, user_id: i64) -> Result<Vec<ItemView>, BoxError> {
    let sql = format!(
        r#"
        SELECT {ITEM_COLUMNS},
               b.name AS brand_name, p.name AS product_name,
               v.name AS variant_name, c.name AS category_name
        FROM items i
        LEFT JOIN brands b ON b.id = i.brand_id
        LEFT JOIN products p ON p.id = i.product_id
        LEFT JOIN product_variants v ON v.id = i.product_variant_id
        LEFT JOIN item_categories ic ON ic.id = i.category_id
        LEFT JOIN categories c ON c.id = ic.category_id
        WHERE i.user_id = $1 AND NOT i.removed
        ORDER BY i.sort_order, i.id
        "#
    );
    let rows = sqlx::query_as::<_, ItemView>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Overwrite every mutable column with the merged record
pub async fn update(pool: &PgPool, item_id: i64, item: &NewItem) -> Result<Option<Item>, BoxError> {
    let now = shared::util::now_millis();
    let row = sqlx::query_as::<_, Item>(
        r#"
        UPDATE items SET
            brand_id = $3, product_id = $4, product_variant_id = $5, category_id = $6,
            name = $7, weight = $8, unit = $9, price = $10, consumable = $11,
            product_url = $12, wishlist = $13, notes = $14, updated_at = $15
        WHERE id = $1 AND user_id = $2 AND NOT removed
        RETURNING id, user_id, brand_id, product_id, product_variant_id, category_id,
                  sort_order, removed, name, weight, unit, price, consumable,
                  product_url, wishlist, notes, created_at, updated_at
        "#,
    )
    .bind(item_id)
    .bind(item.user_id)
    .bind(item.brand_id)
    .bind(item.product_id)
    .bind(item.product_variant_id)
    .bind(item.category_id)
    .bind(&item.name)
    .bind(item.weight)
    .bind(item.unit.map(|u| u.as_str()))
    .bind(item.price)
    .bind(item.consumable)
    .bind(&item.product_url)
    .bind(item.wishlist)
    .bind(&item.notes)
    .bind(now)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Soft delete; returns false when the item does not exist
pub async fn soft_delete(pool: &PgPool, user_id: i64, item_id: i64) -> Result<bool, BoxError> {
    let result = sqlx::query(
        "UPDATE items SET removed = TRUE, updated_at = $3 WHERE id = $1 AND user_id = $2 AND NOT removed",
    )
    .bind(item_id)
    .bind(user_id)
    .bind(shared::util::now_millis())
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn batch_update_sort_order(
    pool: &PgPool,
    user_id: i64,
    updates: &[SortOrderUpdate],
) -> Result<(), BoxError> {
    if updates.is_empty() {
        return Ok(());
    }
    let ids: Vec<i64> = updates.iter().map(|u| u.id).collect();
    let orders: Vec<i32> = updates.iter().map(|u| u.sort_order).collect();
    sqlx::query(
        "UPDATE items SET sort_order = u.sort_order FROM UNNEST($1::bigint[], $2::integer[]) AS u(id, sort_order) WHERE items.id = u.id AND items.user_id = $3",
    )
    .bind(&ids)
    .bind(&orders)
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(())
}
