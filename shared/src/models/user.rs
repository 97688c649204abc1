//! User Model

use serde::{Deserialize, Serialize};

/// User row including credentials; never serialized to clients
#[derive(Debug, Clone)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub hashed_password: String,
    pub banned: bool,
    pub deactivated: bool,
}

/// Public profile of a user
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub username: String,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub unit_weight: String,
    pub unit_distance: String,
    pub unit_temperature: String,
    pub currency: String,
    pub instagram_url: Option<String>,
    pub facebook_url: Option<String>,
    pub youtube_url: Option<String>,
    pub twitter_url: Option<String>,
    pub personal_url: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: i64,
}

/// Registration payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

/// Login payload; `login` is an email address or a username
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub login: String,
    pub password: String,
}

/// Token issued after login or registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub user: UserProfile,
}

/// Profile update payload; `None` leaves a field untouched
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub unit_weight: Option<String>,
    pub unit_distance: Option<String>,
    pub unit_temperature: Option<String>,
    pub currency: Option<String>,
    pub instagram_url: Option<String>,
    pub facebook_url: Option<String>,
    pub youtube_url: Option<String>,
    pub twitter_url: Option<String>,
    pub personal_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordResetConfirm {
    pub callback_id: String,
    pub password: String,
}
