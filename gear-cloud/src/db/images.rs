//! Image rows (objects live in S3)

use shared::models::Image;
use sqlx::PgPool;

use super::BoxError;

const IMAGE_COLUMNS: &str = "id, user_id, avatar, trip_id, item_id, sort_order, caption, \
     s3_key, s3_key_thumb, url, url_thumb, created_at";

/// Stored object locations of an image
pub struct NewImage<'a> {
    pub id: i64,
    pub user_id: i64,
    pub avatar: bool,
    pub trip_id: Option<i64>,
    pub item_id: Option<i64>,
    pub s3_key: &'a str,
    pub s3_key_thumb: &'a str,
    pub url: &'a str,
    pub url_thumb: &'a str,
}

/// Reserve an id before the objects are uploaded (keys embed it)
pub async fn next_id(pool: &PgPool) -> Result<i64, BoxError> {
    let (id,): (i64,) = sqlx::query_as("SELECT nextval(pg_get_serial_sequence('images', 'id'))")
        .fetch_one(pool)
        .await?;
    Ok(id)
}

pub async fn insert(pool: &PgPool, image: &NewImage<'_>) -> Result<Image, BoxError> {
    let sql = format!(
        r#"
        INSERT INTO images (
            id, user_id, avatar, trip_id, item_id, sort_order,
            s3_key, s3_key_thumb, url, url_thumb, created_at
        )
        VALUES (
            $1, $2, $3, $4, $5,
            (SELECT COUNT(*)::int FROM images WHERE trip_id IS NOT DISTINCT FROM $4 AND user_id = $2),
            $6, $7, $8, $9, $10
        )
        RETURNING {IMAGE_COLUMNS}
        "#
    );
    let row = sqlx::query_as::<_, Image>(&sql)
        .bind(image.id)
        .bind(image.user_id)
        .bind(image.avatar)
        .bind(image.trip_id)
        .bind(image.item_id)
        .bind(image.s3_key)
        .bind(image.s3_key_thumb)
        .bind(image.url)
        .bind(image.url_thumb)
        .bind(shared::util::now_millis())
        .fetch_one(pool)
        .await?;
    Ok(row)
}

pub async fn list_for_trip(pool: &PgPool, trip_id: i64) -> Result<Vec<Image>, BoxError> {
    let sql = format!("SELECT {IMAGE_COLUMNS} FROM images WHERE trip_id = $1 ORDER BY sort_order, id");
    let rows = sqlx::query_as::<_, Image>(&sql)
        .bind(trip_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_owned(pool: &PgPool, user_id: i64, image_id: i64) -> Result<Option<Image>, BoxError> {
    let sql = format!("SELECT {IMAGE_COLUMNS} FROM images WHERE id = $1 AND user_id = $2");
    let row = sqlx::query_as::<_, Image>(&sql)
        .bind(image_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Current avatar of a user
pub async fn find_avatar(pool: &PgPool, user_id: i64) -> Result<Option<Image>, BoxError> {
    let sql = format!("SELECT {IMAGE_COLUMNS} FROM images WHERE user_id = $1 AND avatar ORDER BY id DESC LIMIT 1");
    let row = sqlx::query_as::<_, Image>(&sql)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn set_caption(
    pool: &PgPool,
    user_id: i64,
    image_id: i64,
    caption: Option<&str>,
) -> Result<Option<Image>, BoxError> {
    let sql = format!(
        "UPDATE images SET caption = $3 WHERE id = $1 AND user_id = $2 RETURNING {IMAGE_COLUMNS}"
    );
    let row = sqlx::query_as::<_, Image>(&sql)
        .bind(image_id)
        .bind(user_id)
        .bind(caption)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn delete(pool: &PgPool, image_id: i64) -> Result<(), BoxError> {
    sqlx::query("DELETE FROM images WHERE id = $1")
        .bind(image_id)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn batch_update_sort_order(
    pool: &PgPool,
    user_id: i64,
    trip_id: i64,
    image_ids: &[i64],
) -> Result<(), BoxError> {
    let orders: Vec<i32> = (0..image_ids.len() as i32).collect();
    sqlx::query(
        "UPDATE images SET sort_order = u.sort_order FROM UNNEST($1::bigint[], $2::integer[]) AS u(id, sort_order) WHERE images.id = u.id AND images.user_id = $3 AND images.trip_id = $4",
    )
    .bind(image_ids)
    .bind(&orders)
    .bind(user_id)
    .bind(trip_id)
    .execute(pool)
    .await?;
    Ok(())
}
