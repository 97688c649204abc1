//! Static resources (conditions, geographies, enum dictionaries)

use serde::{Deserialize, Serialize};

/// Trip condition (e.g. "Snow", "Rain")
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Condition {
    pub id: i64,
    pub name: String,
}

/// Trip geography (e.g. "Desert", "Alpine")
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Geography {
    pub id: i64,
    pub name: String,
}

/// Lookup data served to clients in one response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resources {
    pub conditions: Vec<Condition>,
    pub geographies: Vec<Geography>,
    pub weight_units: Vec<String>,
    pub unit_systems: Vec<String>,
    pub currencies: Vec<String>,
    pub months: Vec<String>,
}

pub const CURRENCIES: &[&str] = &["USD"];

pub const MONTHS: &[&str] = &[
    "JANUARY",
    "FEBRUARY",
    "MARCH",
    "APRIL",
    "MAY",
    "JUNE",
    "JULY",
    "AUGUST",
    "SEPTEMBER",
    "OCTOBER",
    "NOVEMBER",
    "DECEMBER",
];
