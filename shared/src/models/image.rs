//! Image Model

use serde::{Deserialize, Serialize};

/// What an uploaded image is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageEntity {
    Avatar,
    Trip,
    Item,
}

impl ImageEntity {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageEntity::Avatar => "avatar",
            ImageEntity::Trip => "trip",
            ImageEntity::Item => "item",
        }
    }
}

impl std::fmt::Display for ImageEntity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Stored image with its original and thumbnail objects
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Image {
    pub id: i64,
    pub user_id: i64,
    pub avatar: bool,
    pub trip_id: Option<i64>,
    pub item_id: Option<i64>,
    pub sort_order: i32,
    pub caption: Option<String>,
    pub s3_key: String,
    pub s3_key_thumb: String,
    pub url: String,
    pub url_thumb: String,
    pub created_at: i64,
}

/// Caption update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageCaptionUpdate {
    pub caption: Option<String>,
}
