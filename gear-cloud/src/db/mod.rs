//! Database access layer

pub mod catalog;
pub mod categories;
pub mod images;
pub mod items;
pub mod packs;
pub mod password_resets;
pub mod resources;
pub mod trips;
pub mod users;

pub use catalog::PgCatalog;

pub(crate) type BoxError = Box<dyn std::error::Error + Send + Sync>;
