//! User database operations

use shared::models::{ProfileUpdate, UserProfile, UserRecord};
use sqlx::PgPool;

use super::BoxError;

const PROFILE_COLUMNS: &str = "id, email, username, display_name, bio, unit_weight, unit_distance, \
     unit_temperature, currency, instagram_url, facebook_url, youtube_url, twitter_url, \
     personal_url, avatar_url, created_at";

const RECORD_COLUMNS: &str = "id, email, username, hashed_password, banned, deactivated";

pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool, BoxError> {
    let (exists,): (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE lower(email) = lower($1))")
            .bind(email)
            .fetch_one(pool)
            .await?;
    Ok(exists)
}

pub async fn username_exists(pool: &PgPool, username: &str) -> Result<bool, BoxError> {
    let (exists,): (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM users WHERE lower(username) = lower($1))")
            .bind(username)
            .fetch_one(pool)
            .await?;
    Ok(exists)
}

pub async fn create(
    pool: &PgPool,
    email: &str,
    username: &str,
    hashed_password: &str,
) -> Result<UserProfile, BoxError> {
    let now = shared::util::now_millis();
    let sql = format!(
        "INSERT INTO users (email, username, hashed_password, created_at, updated_at) VALUES ($1, $2, $3, $4, $4) RETURNING {PROFILE_COLUMNS}"
    );
    let row = sqlx::query_as::<_, UserProfile>(&sql)
        .bind(email)
        .bind(username)
        .bind(hashed_password)
        .bind(now)
        .fetch_one(pool)
        .await?;
    Ok(row)
}

/// Look up credentials by email or username (case-insensitive)
pub async fn find_by_login(pool: &PgPool, login: &str) -> Result<Option<UserRecord>, BoxError> {
    let sql = format!(
        "SELECT {RECORD_COLUMNS} FROM users WHERE lower(email) = lower($1) OR lower(username) = lower($1) LIMIT 1"
    );
    let row = sqlx::query_as::<_, UserRecord>(&sql)
        .bind(login)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_profile(pool: &PgPool, user_id: i64) -> Result<Option<UserProfile>, BoxError> {
    let sql = format!("SELECT {PROFILE_COLUMNS} FROM users WHERE id = $1");
    let row = sqlx::query_as::<_, UserProfile>(&sql)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn update_profile(
    pool: &PgPool,
    user_id: i64,
    update: &ProfileUpdate,
) -> Result<Option<UserProfile>, BoxError> {
    let sql = format!(
        r#"
        UPDATE users SET
            display_name = COALESCE($2, display_name),
            bio = COALESCE($3, bio),
            unit_weight = COALESCE($4, unit_weight),
            unit_distance = COALESCE($5, unit_distance),
            unit_temperature = COALESCE($6, unit_temperature),
            currency = COALESCE($7, currency),
            instagram_url = COALESCE($8, instagram_url),
            facebook_url = COALESCE($9, facebook_url),
            youtube_url = COALESCE($10, youtube_url),
            twitter_url = COALESCE($11, twitter_url),
            personal_url = COALESCE($12, personal_url),
            updated_at = $13
        WHERE id = $1
        RETURNING {PROFILE_COLUMNS}
        "#
    );
    let row = sqlx::query_as::<_, UserProfile>(&sql)
        .bind(user_id)
        .bind(&update.display_name)
        .bind(&update.bio)
        .bind(&update.unit_weight)
        .bind(&update.unit_distance)
        .bind(&update.unit_temperature)
        .bind(&update.currency)
        .bind(&update.instagram_url)
        .bind(&update.facebook_url)
        .bind(&update.youtube_url)
        .bind(&update.twitter_url)
        .bind(&update.personal_url)
        .bind(shared::util::now_millis())
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn set_avatar_url(pool: &PgPool, user_id: i64, url: Option<&str>) -> Result<(), BoxError> {
    sqlx::query("UPDATE users SET avatar_url = $2, updated_at = $3 WHERE id = $1")
        .bind(user_id)
        .bind(url)
        .bind(shared::util::now_millis())
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn update_password(pool: &PgPool, user_id: i64, hashed_password: &str) -> Result<(), BoxError> {
    sqlx::query("UPDATE users SET hashed_password = $2, updated_at = $3 WHERE id = $1")
        .bind(user_id)
        .bind(hashed_password)
        .bind(shared::util::now_millis())
        .execute(pool)
        .await?;
    Ok(())
}
