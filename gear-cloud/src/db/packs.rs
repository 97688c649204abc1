//! Pack database operations

use shared::models::{Pack, PackInput, PackItemInput, PackItemView, Trip};
use sqlx::{PgPool, Postgres, Transaction};

use super::BoxError;

const PACK_COLUMNS: &str = "id, user_id, trip_id, title, removed, created_at";

pub async fn list_for_user(pool: &PgPool, user_id: i64) -> Result<Vec<Pack>, BoxError> {
    let sql = format!(
        "SELECT {PACK_COLUMNS} FROM packs WHERE user_id = $1 AND NOT removed ORDER BY created_at DESC"
    );
    let rows = sqlx::query_as::<_, Pack>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn list_for_trip(pool: &PgPool, trip_id: i64) -> Result<Vec<Pack>, BoxError> {
    let sql = format!(
        "SELECT {PACK_COLUMNS} FROM packs WHERE trip_id = $1 AND NOT removed ORDER BY created_at"
    );
    let rows = sqlx::query_as::<_, Pack>(&sql)
        .bind(trip_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find(pool: &PgPool, pack_id: i64) -> Result<Option<Pack>, BoxError> {
    let sql = format!("SELECT {PACK_COLUMNS} FROM packs WHERE id = $1 AND NOT removed");
    let row = sqlx::query_as::<_, Pack>(&sql)
        .bind(pack_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_owned(pool: &PgPool, user_id: i64, pack_id: i64) -> Result<Option<Pack>, BoxError> {
    Ok(find(pool, pack_id).await?.filter(|p| p.user_id == user_id))
}

/// Items of a pack with the item fields needed for totals
pub async fn list_items(pool: &PgPool, pack_id: i64) -> Result<Vec<PackItemView>, BoxError> {
    let rows = sqlx::query_as::<_, PackItemView>(
        r#"
        SELECT pi.item_id, i.name, pi.quantity, pi.worn, pi.checked, pi.sort_order,
               i.weight, i.unit,
               (i.consumable OR COALESCE(ic.consumable, FALSE)) AS consumable,
               c.name AS category_name
        FROM pack_items pi
        JOIN items i ON i.id = pi.item_id
        LEFT JOIN item_categories ic ON ic.id = i.category_id
        LEFT JOIN categories c ON c.id = ic.category_id
        WHERE pi.pack_id = $1
        ORDER BY pi.sort_order, pi.item_id
        "#,
    )
    .bind(pack_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

async fn insert_items(
    tx: &mut Transaction<'_, Postgres>,
    pack_id: i64,
    items: &[PackItemInput],
) -> Result<(), sqlx::Error> {
    if items.is_empty() {
        return Ok(());
    }
    let pack_ids: Vec<i64> = items.iter().map(|_| pack_id).collect();
    let item_ids: Vec<i64> = items.iter().map(|i| i.item_id).collect();
    let quantities: Vec<f64> = items.iter().map(|i| i.quantity.unwrap_or(1.0)).collect();
    let worn: Vec<bool> = items.iter().map(|i| i.worn).collect();
    let checked: Vec<bool> = items.iter().map(|i| i.checked).collect();
    let orders: Vec<i32> = items.iter().map(|i| i.sort_order).collect();

    sqlx::query(
        r#"
        INSERT INTO pack_items (pack_id, item_id, quantity, worn, checked, sort_order)
        SELECT * FROM UNNEST($1::bigint[], $2::bigint[], $3::float8[], $4::boolean[], $5::boolean[], $6::integer[])
        ON CONFLICT (pack_id, item_id) DO NOTHING
        "#,
    )
    .bind(&pack_ids)
    .bind(&item_ids)
    .bind(&quantities)
    .bind(&worn)
    .bind(&checked)
    .bind(&orders)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Number of `item_ids` that are live items of `user_id`
pub async fn count_owned_items(
    pool: &PgPool,
    user_id: i64,
    item_ids: &[i64],
) -> Result<i64, BoxError> {
    let (count,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM items WHERE id = ANY($1) AND user_id = $2 AND NOT removed",
    )
    .bind(item_ids)
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

pub async fn create(pool: &PgPool, user_id: i64, input: &PackInput) -> Result<Pack, BoxError> {
    let mut tx = pool.begin().await?;

    let sql = format!(
        "INSERT INTO packs (user_id, trip_id, title, created_at) VALUES ($1, $2, $3, $4) RETURNING {PACK_COLUMNS}"
    );
    let pack = sqlx::query_as::<_, Pack>(&sql)
        .bind(user_id)
        .bind(input.trip_id)
        .bind(input.title.trim())
        .bind(shared::util::now_millis())
        .fetch_one(&mut *tx)
        .await?;

    insert_items(&mut tx, pack.id, &input.items).await?;
    tx.commit().await?;
    Ok(pack)
}

/// Replace title, trip and the full item list
pub async fn replace(
    pool: &PgPool,
    user_id: i64,
    pack_id: i64,
    input: &PackInput,
) -> Result<Option<Pack>, BoxError> {
    let mut tx = pool.begin().await?;

    let sql = format!(
        "UPDATE packs SET title = $3, trip_id = $4 WHERE id = $1 AND user_id = $2 AND NOT removed RETURNING {PACK_COLUMNS}"
    );
    let Some(pack) = sqlx::query_as::<_, Pack>(&sql)
        .bind(pack_id)
        .bind(user_id)
        .bind(input.title.trim())
        .bind(input.trip_id)
        .fetch_optional(&mut *tx)
        .await?
    else {
        return Ok(None);
    };

    sqlx::query("DELETE FROM pack_items WHERE pack_id = $1")
        .bind(pack_id)
        .execute(&mut *tx)
        .await?;
    insert_items(&mut tx, pack_id, &input.items).await?;

    tx.commit().await?;
    Ok(Some(pack))
}

/// Set the checked flag of one pack item; false if the pair does not exist
pub async fn set_item_checked(
    pool: &PgPool,
    user_id: i64,
    pack_id: i64,
    item_id: i64,
    checked: bool,
) -> Result<bool, BoxError> {
    let result = sqlx::query(
        r#"
        UPDATE pack_items SET checked = $4
        FROM packs
        WHERE pack_items.pack_id = $1 AND pack_items.item_id = $2
          AND packs.id = pack_items.pack_id AND packs.user_id = $3 AND NOT packs.removed
        "#,
    )
    .bind(pack_id)
    .bind(item_id)
    .bind(user_id)
    .bind(checked)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn assign_trip(
    pool: &PgPool,
    user_id: i64,
    pack_id: i64,
    trip_id: Option<i64>,
) -> Result<Option<Pack>, BoxError> {
    let sql = format!(
        "UPDATE packs SET trip_id = $3 WHERE id = $1 AND user_id = $2 AND NOT removed RETURNING {PACK_COLUMNS}"
    );
    let row = sqlx::query_as::<_, Pack>(&sql)
        .bind(pack_id)
        .bind(user_id)
        .bind(trip_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn soft_delete(pool: &PgPool, user_id: i64, pack_id: i64) -> Result<bool, BoxError> {
    let result = sqlx::query(
        "UPDATE packs SET removed = TRUE WHERE id = $1 AND user_id = $2 AND NOT removed",
    )
    .bind(pack_id)
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Create a trip named after the pack and attach the pack to it
pub async fn generate_trip(pool: &PgPool, pack: &Pack) -> Result<Trip, BoxError> {
    let mut tx = pool.begin().await?;
    let now = shared::util::now_millis();

    let trip = sqlx::query_as::<_, Trip>(
        r#"
        INSERT INTO trips (user_id, title, location, created_at, updated_at)
        VALUES ($1, $2, $2, $3, $3)
        RETURNING id, user_id, title, location, start_date, end_date, temp_min, temp_max,
                  distance, notes, published, removed, created_at, updated_at
        "#,
    )
    .bind(pack.user_id)
    .bind(&pack.title)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("UPDATE packs SET trip_id = $1 WHERE id = $2")
        .bind(trip.id)
        .bind(pack.id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(trip)
}
