//! Item category (per-user binding) database operations

use shared::models::{ItemCategory, ItemCategoryView, SortOrderUpdate};
use sqlx::PgPool;

use super::BoxError;

/// Item categories of a user joined with category names, in sort order
pub async fn list(pool: &PgPool, user_id: i64) -> Result<Vec<ItemCategoryView>, BoxError> {
    let rows = sqlx::query_as::<_, ItemCategoryView>(
        r#"
        SELECT ic.id, ic.category_id, c.name, ic.sort_order, ic.consumable
        FROM item_categories ic
        JOIN categories c ON c.id = ic.category_id
        WHERE ic.user_id = $1
        ORDER BY ic.sort_order, ic.id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn set_consumable(
    pool: &PgPool,
    user_id: i64,
    item_category_id: i64,
    consumable: bool,
) -> Result<Option<ItemCategory>, BoxError> {
    let row = sqlx::query_as::<_, ItemCategory>(
        r#"
        UPDATE item_categories SET consumable = $3
        WHERE id = $1 AND user_id = $2
        RETURNING id, user_id, category_id, sort_order, consumable
        "#,
    )
    .bind(item_category_id)
    .bind(user_id)
    .bind(consumable)
    .fetch_optional(pool)
    .await?;
    Ok(row)
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
        "UPDATE item_categories SET sort_order = u.sort_order FROM UNNEST($1::bigint[], $2::integer[]) AS u(id, sort_order) WHERE item_categories.id = u.id AND item_categories.user_id = $3",
    )
    .bind(&ids)
    .bind(&orders)
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(())
}
