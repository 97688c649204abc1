//! Trip database operations

use shared::models::{Trip, TripCreate, TripOwner, TripSitemapEntry, TripUpdate};
use sqlx::{PgPool, Postgres, Transaction};

use super::BoxError;

const TRIP_COLUMNS: &str = "id, user_id, title, location, start_date, end_date, temp_min, temp_max, \
     distance, notes, published, removed, created_at, updated_at";

/// Size of the public feed
pub const FEED_LIMIT: i64 = 35;

/// Fill `condition_ids` / `geography_ids` from the junction tables
async fn load_tags(pool: &PgPool, trips: &mut [Trip]) -> Result<(), BoxError> {
    if trips.is_empty() {
        return Ok(());
    }
    let ids: Vec<i64> = trips.iter().map(|t| t.id).collect();

    let conditions: Vec<(i64, i64)> = sqlx::query_as(
        "SELECT trip_id, condition_id FROM trip_conditions WHERE trip_id = ANY($1) ORDER BY condition_id",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;
    let geographies: Vec<(i64, i64)> = sqlx::query_as(
        "SELECT trip_id, geography_id FROM trip_geographies WHERE trip_id = ANY($1) ORDER BY geography_id",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;

    for trip in trips.iter_mut() {
        trip.condition_ids = conditions
            .iter()
            .filter(|(t, _)| *t == trip.id)
            .map(|(_, c)| *c)
            .collect();
        trip.geography_ids = geographies
            .iter()
            .filter(|(t, _)| *t == trip.id)
            .map(|(_, g)| *g)
            .collect();
    }
    Ok(())
}

async fn replace_tags(
    tx: &mut Transaction<'_, Postgres>,
    trip_id: i64,
    condition_ids: Option<&[i64]>,
    geography_ids: Option<&[i64]>,
) -> Result<(), sqlx::Error> {
    if let Some(ids) = condition_ids {
        sqlx::query("DELETE FROM trip_conditions WHERE trip_id = $1")
            .bind(trip_id)
            .execute(&mut **tx)
            .await?;
        sqlx::query(
            "INSERT INTO trip_conditions (trip_id, condition_id) SELECT $1, c FROM UNNEST($2::bigint[]) AS c ON CONFLICT DO NOTHING",
        )
        .bind(trip_id)
        .bind(ids)
        .execute(&mut **tx)
        .await?;
    }
    if let Some(ids) = geography_ids {
        sqlx::query("DELETE FROM trip_geographies WHERE trip_id = $1")
            .bind(trip_id)
            .execute(&mut **tx)
            .await?;
        sqlx::query(
            "INSERT INTO trip_geographies (trip_id, geography_id) SELECT $1, g FROM UNNEST($2::bigint[]) AS g ON CONFLICT DO NOTHING",
        )
        .bind(trip_id)
        .bind(ids)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

/// Latest published trips that have already ended
pub async fn feed(pool: &PgPool) -> Result<Vec<Trip>, BoxError> {
    let sql = format!(
        r#"
        SELECT {TRIP_COLUMNS} FROM trips
        WHERE end_date IS NOT NULL AND end_date <= $1 AND published AND NOT removed
        ORDER BY end_date DESC
        LIMIT $2
        "#
    );
    let mut rows = sqlx::query_as::<_, Trip>(&sql)
        .bind(shared::util::today())
        .bind(FEED_LIMIT)
        .fetch_all(pool)
        .await?;
    load_tags(pool, &mut rows).await?;
    Ok(rows)
}

pub async fn sitemap(pool: &PgPool) -> Result<Vec<TripSitemapEntry>, BoxError> {
    let rows = sqlx::query_as::<_, TripSitemapEntry>(
        "SELECT id, title, updated_at FROM trips WHERE published AND NOT removed ORDER BY id",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn list_for_user(pool: &PgPool, user_id: i64) -> Result<Vec<Trip>, BoxError> {
    let sql = format!(
        "SELECT {TRIP_COLUMNS} FROM trips WHERE user_id = $1 AND NOT removed ORDER BY end_date DESC NULLS FIRST, id DESC"
    );
    let mut rows = sqlx::query_as::<_, Trip>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    load_tags(pool, &mut rows).await?;
    Ok(rows)
}

pub async fn find(pool: &PgPool, trip_id: i64) -> Result<Option<Trip>, BoxError> {
    let sql = format!("SELECT {TRIP_COLUMNS} FROM trips WHERE id = $1 AND NOT removed");
    let Some(trip) = sqlx::query_as::<_, Trip>(&sql)
        .bind(trip_id)
        .fetch_optional(pool)
        .await?
    else {
        return Ok(None);
    };
    let mut one = [trip];
    load_tags(pool, &mut one).await?;
    let [trip] = one;
    Ok(Some(trip))
}

pub async fn find_owned(pool: &PgPool, user_id: i64, trip_id: i64) -> Result<Option<Trip>, BoxError> {
    Ok(find(pool, trip_id).await?.filter(|t| t.user_id == user_id))
}

/// Username and unit preferences of the trip owner
pub async fn owner(pool: &PgPool, user_id: i64) -> Result<Option<TripOwner>, BoxError> {
    let row = sqlx::query_as::<_, TripOwner>(
        "SELECT username, unit_weight, unit_distance, unit_temperature FROM users WHERE id = $1",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(pool: &PgPool, user_id: i64, input: &TripCreate) -> Result<Trip, BoxError> {
    let mut tx = pool.begin().await?;
    let now = shared::util::now_millis();

    let sql = format!(
        r#"
        INSERT INTO trips (
            user_id, title, location, start_date, end_date, temp_min, temp_max,
            distance, notes, published, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
        RETURNING {TRIP_COLUMNS}
        "#
    );
    let trip = sqlx::query_as::<_, Trip>(&sql)
        .bind(user_id)
        .bind(input.title.trim())
        .bind(&input.location)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(input.temp_min)
        .bind(input.temp_max)
        .bind(input.distance)
        .bind(&input.notes)
        .bind(input.published.unwrap_or(false))
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

    replace_tags(
        &mut tx,
        trip.id,
        input.condition_ids.as_deref(),
        input.geography_ids.as_deref(),
    )
    .await?;
    tx.commit().await?;

    Ok(find(pool, trip.id).await?.unwrap_or(trip))
}

/// Apply the fields present in `input`
pub async fn update(
    pool: &PgPool,
    user_id: i64,
    trip_id: i64,
    input: &TripUpdate,
) -> Result<Option<Trip>, BoxError> {
    let mut tx = pool.begin().await?;

    let sql = format!(
        r#"
        UPDATE trips SET
            title = COALESCE($3, title),
            location = COALESCE($4, location),
            start_date = COALESCE($5, start_date),
            end_date = COALESCE($6, end_date),
            temp_min = COALESCE($7, temp_min),
            temp_max = COALESCE($8, temp_max),
            distance = COALESCE($9, distance),
            notes = COALESCE($10, notes),
            published = COALESCE($11, published),
            updated_at = $12
        WHERE id = $1 AND user_id = $2 AND NOT removed
        RETURNING {TRIP_COLUMNS}
        "#
    );
    let Some(trip) = sqlx::query_as::<_, Trip>(&sql)
        .bind(trip_id)
        .bind(user_id)
        .bind(input.title.as_deref().map(str::trim))
        .bind(&input.location)
        .bind(input.start_date)
        .bind(input.end_date)
        .bind(input.temp_min)
        .bind(input.temp_max)
        .bind(input.distance)
        .bind(&input.notes)
        .bind(input.published)
        .bind(shared::util::now_millis())
        .fetch_optional(&mut *tx)
        .await?
    else {
        return Ok(None);
    };

    replace_tags(
        &mut tx,
        trip.id,
        input.condition_ids.as_deref(),
        input.geography_ids.as_deref(),
    )
    .await?;
    tx.commit().await?;

    find(pool, trip.id).await
}

pub async fn toggle_published(
    pool: &PgPool,
    user_id: i64,
    trip_id: i64,
) -> Result<Option<Trip>, BoxError> {
    let result = sqlx::query(
        "UPDATE trips SET published = NOT published, updated_at = $3 WHERE id = $1 AND user_id = $2 AND NOT removed",
    )
    .bind(trip_id)
    .bind(user_id)
    .bind(shared::util::now_millis())
    .execute(pool)
    .await?;
    if result.rows_affected() == 0 {
        return Ok(None);
    }
    find(pool, trip_id).await
}

/// Copy a trip with its tags and packs; title and location get " (Copy)"
pub async fn clone_trip(pool: &PgPool, source: &Trip) -> Result<Trip, BoxError> {
    let mut tx = pool.begin().await?;
    let now = shared::util::now_millis();

    let sql = format!(
        r#"
        INSERT INTO trips (
            user_id, title, location, start_date, end_date, temp_min, temp_max,
            distance, notes, published, created_at, updated_at
        )
        SELECT user_id, title || ' (Copy)', location || ' (Copy)', start_date, end_date,
               temp_min, temp_max, distance, notes, FALSE, $2, $2
        FROM trips WHERE id = $1
        RETURNING {TRIP_COLUMNS}
        "#
    );
    let trip = sqlx::query_as::<_, Trip>(&sql)
        .bind(source.id)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

    replace_tags(
        &mut tx,
        trip.id,
        Some(source.condition_ids.as_slice()),
        Some(source.geography_ids.as_slice()),
    )
    .await?;

    let packs: Vec<(i64, String)> = sqlx::query_as(
        "SELECT id, title FROM packs WHERE trip_id = $1 AND NOT removed ORDER BY id",
    )
    .bind(source.id)
    .fetch_all(&mut *tx)
    .await?;

    for (pack_id, title) in packs {
        let (new_pack_id,): (i64,) = sqlx::query_as(
            "INSERT INTO packs (user_id, trip_id, title, created_at) VALUES ($1, $2, $3, $4) RETURNING id",
        )
        .bind(source.user_id)
        .bind(trip.id)
        .bind(&title)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO pack_items (pack_id, item_id, quantity, worn, checked, sort_order)
            SELECT $1, item_id, quantity, worn, checked, sort_order
            FROM pack_items WHERE pack_id = $2
            "#,
        )
        .bind(new_pack_id)
        .bind(pack_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(Trip {
        condition_ids: source.condition_ids.clone(),
        geography_ids: source.geography_ids.clone(),
        ..trip
    })
}

/// Soft delete a trip, detaching its packs. Returns the image rows removed
/// so their objects can be deleted from storage.
pub async fn soft_delete(
    pool: &PgPool,
    user_id: i64,
    trip_id: i64,
) -> Result<Option<Vec<(String, String)>>, BoxError> {
    let mut tx = pool.begin().await?;

    let result = sqlx::query(
        "UPDATE trips SET removed = TRUE, updated_at = $3 WHERE id = $1 AND user_id = $2 AND NOT removed",
    )
    .bind(trip_id)
    .bind(user_id)
    .bind(shared::util::now_millis())
    .execute(&mut *tx)
    .await?;
    if result.rows_affected() == 0 {
        return Ok(None);
    }

    sqlx::query("UPDATE packs SET trip_id = NULL WHERE trip_id = $1 AND user_id = $2")
        .bind(trip_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    let keys: Vec<(String, String)> =
        sqlx::query_as("DELETE FROM images WHERE trip_id = $1 RETURNING s3_key, s3_key_thumb")
            .bind(trip_id)
            .fetch_all(&mut *tx)
            .await?;

    tx.commit().await?;
    Ok(Some(keys))
}
