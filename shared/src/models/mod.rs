//! Domain models shared by the service and its clients
//!
//! Row structs derive `sqlx::FromRow` behind the `db` feature; the
//! `*Create` / `*Update` structs are request payloads.

pub mod catalog;
pub mod image;
pub mod item;
pub mod pack;
pub mod resource;
pub mod trip;
pub mod user;

pub use catalog::*;
pub use image::*;
pub use item::*;
pub use pack::*;
pub use resource::*;
pub use trip::*;
pub use user::*;
