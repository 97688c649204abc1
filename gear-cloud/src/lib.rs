//! gear-cloud: backpacking gear inventory service
//!
//! - Catalog reconciliation: free-text brand / product / variant / category
//!   names resolved to canonical rows, per-user category bindings, CSV import
//! - Items, packs with weight totals, trips, images
//! - Users with JWT auth and password reset email

pub mod api;
pub mod auth;
pub mod catalog;
pub mod config;
pub mod db;
pub mod email;
pub mod error;
pub mod state;
pub mod storage;
pub mod util;
