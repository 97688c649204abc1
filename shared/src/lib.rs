//! Shared types for the gear service
//!
//! Error codes and error body, domain models and payloads, text length
//! limits, weight units, and small time helpers.

pub mod error;
pub mod limits;
pub mod models;
pub mod units;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use units::{WeightUnit, convert_weight};
