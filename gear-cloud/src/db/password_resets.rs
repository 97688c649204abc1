//! Password reset callbacks

use sqlx::PgPool;

use super::BoxError;

/// Reset links stay valid for one hour
pub const RESET_TTL_MS: i64 = 60 * 60 * 1000;

pub async fn create(pool: &PgPool, user_id: i64, callback_id: &str) -> Result<(), BoxError> {
    sqlx::query("INSERT INTO password_resets (user_id, callback_id, created_at) VALUES ($1, $2, $3)")
        .bind(user_id)
        .bind(callback_id)
        .bind(shared::util::now_millis())
        .execute(pool)
        .await?;
    Ok(())
}

/// Delete a callback and return its user if it was still valid
pub async fn consume(pool: &PgPool, callback_id: &str) -> Result<Option<i64>, BoxError> {
    let row: Option<(i64, i64)> = sqlx::query_as(
        "DELETE FROM password_resets WHERE callback_id = $1 RETURNING user_id, created_at",
    )
    .bind(callback_id)
    .fetch_optional(pool)
    .await?;

    let now = shared::util::now_millis();
    Ok(row.and_then(|(user_id, created_at)| (now - created_at < RESET_TTL_MS).then_some(user_id)))
}

/// Drop every outstanding callback of a user
pub async fn clear_for_user(pool: &PgPool, user_id: i64) -> Result<(), BoxError> {
    sqlx::query("DELETE FROM password_resets WHERE user_id = $1")
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(())
}
