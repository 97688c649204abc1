//! Lookup lists for forms

use axum::{Json, extract::State};
use shared::models::{CURRENCIES, MONTHS, Resources};
use shared::units::{UnitSystem, WeightUnit};

use crate::db;
use crate::state::AppState;

use super::{ApiResult, internal};

/// GET /resources
pub async fn get_resources(State(state): State<AppState>) -> ApiResult<Resources> {
    let conditions = db::resources::conditions(&state.pool)
        .await
        .map_err(internal)?;
    let geographies = db::resources::geographies(&state.pool)
        .await
        .map_err(internal)?;

    Ok(Json(Resources {
        conditions,
        geographies,
        weight_units: WeightUnit::ALL.iter().map(|u| u.as_str().to_string()).collect(),
        unit_systems: [UnitSystem::Imperial, UnitSystem::Metric]
            .iter()
            .map(|s| s.as_db().to_string())
            .collect(),
        currencies: CURRENCIES.iter().map(|c| c.to_string()).collect(),
        months: MONTHS.iter().map(|m| m.to_string()).collect(),
    }))
}
