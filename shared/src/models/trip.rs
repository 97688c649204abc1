//! Trip Model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::Pack;

/// Trip entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Trip {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub location: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub temp_min: Option<i32>,
    pub temp_max: Option<i32>,
    pub distance: Option<f64>,
    pub notes: Option<String>,
    pub published: bool,
    pub removed: bool,
    pub created_at: i64,
    pub updated_at: i64,
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub condition_ids: Vec<i64>,
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub geography_ids: Vec<i64>,
}

/// Sitemap entry for a published trip
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TripSitemapEntry {
    pub id: i64,
    pub title: String,
    pub updated_at: i64,
}

/// Unit preferences of a trip owner, shown alongside public trip info
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct TripOwner {
    pub username: String,
    pub unit_weight: String,
    pub unit_distance: String,
    pub unit_temperature: String,
}

/// Public trip info
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripInfo {
    pub trip: Trip,
    pub packs: Vec<Pack>,
    pub user: TripOwner,
}

/// Create trip payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TripCreate {
    pub title: String,
    pub location: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub temp_min: Option<i32>,
    pub temp_max: Option<i32>,
    pub distance: Option<f64>,
    pub notes: Option<String>,
    pub published: Option<bool>,
    pub condition_ids: Option<Vec<i64>>,
    pub geography_ids: Option<Vec<i64>>,
}

/// Update trip payload; `None` leaves a field untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TripUpdate {
    pub title: Option<String>,
    pub location: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub temp_min: Option<i32>,
    pub temp_max: Option<i32>,
    pub distance: Option<f64>,
    pub notes: Option<String>,
    pub published: Option<bool>,
    pub condition_ids: Option<Vec<i64>>,
    pub geography_ids: Option<Vec<i64>>,
}
