//! Static lookup tables

use shared::models::{Condition, Geography};
use sqlx::PgPool;

use super::BoxError;

pub async fn conditions(pool: &PgPool) -> Result<Vec<Condition>, BoxError> {
    let rows = sqlx::query_as::<_, Condition>("SELECT id, name FROM conditions ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn geographies(pool: &PgPool) -> Result<Vec<Geography>, BoxError> {
    let rows = sqlx::query_as::<_, Geography>("SELECT id, name FROM geographies ORDER BY id")
        .fetch_all(pool)
        .await?;
    Ok(rows)
}
