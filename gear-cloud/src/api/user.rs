//! Account endpoints: register, login, profile, password reset

use axum::{Extension, Json, extract::State};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    AuthResponse, CURRENCIES, LoginRequest, PasswordResetConfirm, PasswordResetRequest,
    ProfileUpdate, RegisterRequest, UserProfile,
};
use shared::units::UnitSystem;

use crate::auth::UserIdentity;
use crate::auth::user_auth::create_token;
use crate::db;
use crate::state::AppState;
use crate::util::{generate_token, hash_password, verify_password};

use super::{ApiResult, internal};

const USERNAME_MAX_LEN: usize = 15;
const PASSWORD_MIN_LEN: usize = 8;
const CALLBACK_ID_LEN: usize = 16;

fn validate_registration(req: &RegisterRequest) -> Result<(String, String), AppError> {
    let email = req.email.trim().to_lowercase();
    let username = req.username.trim().to_string();

    if email.is_empty() || !email.contains('@') {
        return Err(AppError::validation("A valid email address is required"));
    }
    if username.is_empty() {
        return Err(AppError::validation("Username is required"));
    }
    if username.chars().count() > USERNAME_MAX_LEN {
        return Err(AppError::new(ErrorCode::UsernameTooLong));
    }
    if req.password.chars().count() < PASSWORD_MIN_LEN {
        return Err(AppError::new(ErrorCode::PasswordTooShort));
    }
    Ok((email, username))
}

fn issue_token(state: &AppState, user: UserProfile) -> ApiResult<AuthResponse> {
    let access_token =
        create_token(user.id, &user.username, &state.jwt_secret, state.jwt_expiry_days)
            .map_err(|e| {
                tracing::error!("JWT creation failed: {e}");
                AppError::new(ErrorCode::InternalError)
            })?;

    Ok(Json(AuthResponse {
        access_token,
        token_type: "bearer".to_string(),
        user,
    }))
}

/// POST /user
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<AuthResponse> {
    let (email, username) = validate_registration(&req)?;

    if db::users::email_exists(&state.pool, &email)
        .await
        .map_err(internal)?
    {
        return Err(AppError::new(ErrorCode::EmailExists));
    }
    if db::users::username_exists(&state.pool, &username)
        .await
        .map_err(internal)?
    {
        return Err(AppError::new(ErrorCode::UsernameExists));
    }

    let hashed = hash_password(&req.password).map_err(internal)?;
    let user = db::users::create(&state.pool, &email, &username, &hashed)
        .await
        .map_err(internal)?;

    tracing::info!(user_id = user.id, username = %user.username, "User registered");
    issue_token(&state, user)
}

/// POST /user/login
///
/// `login` is an email or a username
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<AuthResponse> {
    let record = db::users::find_by_login(&state.pool, req.login.trim())
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    if !verify_password(&req.password, &record.hashed_password) {
        return Err(AppError::new(ErrorCode::InvalidCredentials));
    }
    if record.banned {
        return Err(AppError::new(ErrorCode::AccountBanned));
    }
    if record.deactivated {
        return Err(AppError::new(ErrorCode::AccountDeactivated));
    }

    let user = db::users::find_profile(&state.pool, record.id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    tracing::info!(user_id = user.id, "User logged in");
    issue_token(&state, user)
}

/// GET /user
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
) -> ApiResult<UserProfile> {
    let user = db::users::find_profile(&state.pool, identity.user_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    Ok(Json(user))
}

const DISTANCE_UNITS: &[&str] = &["MI", "KM"];
const TEMPERATURE_UNITS: &[&str] = &["F", "C"];

fn normalise_choice(
    field: &str,
    value: &mut Option<String>,
    choices: &[&str],
) -> Result<(), AppError> {
    if let Some(raw) = value.as_deref() {
        let upper = raw.trim().to_ascii_uppercase();
        if !choices.contains(&upper.as_str()) {
            return Err(AppError::validation(format!("Invalid {field}: {raw}")));
        }
        *value = Some(upper);
    }
    Ok(())
}

fn validate_profile(update: &mut ProfileUpdate) -> Result<(), AppError> {
    if let Some(raw) = update.unit_weight.as_deref() {
        let system = UnitSystem::from_db(raw.trim())
            .ok_or_else(|| AppError::validation(format!("Invalid unit_weight: {raw}")))?;
        update.unit_weight = Some(system.as_db().to_string());
    }
    normalise_choice("unit_distance", &mut update.unit_distance, DISTANCE_UNITS)?;
    normalise_choice("unit_temperature", &mut update.unit_temperature, TEMPERATURE_UNITS)?;
    normalise_choice("currency", &mut update.currency, CURRENCIES)?;
    Ok(())
}

/// PUT /user
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(identity): Extension<UserIdentity>,
    Json(mut update): Json<ProfileUpdate>,
) -> ApiResult<UserProfile> {
    validate_profile(&mut update)?;

    let user = db::users::update_profile(&state.pool, identity.user_id, &update)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    Ok(Json(user))
}

/// POST /user/password-reset
///
/// Always answers OK so callers cannot probe which emails are registered.
pub async fn request_password_reset(
    State(state): State<AppState>,
    Json(req): Json<PasswordResetRequest>,
) -> ApiResult<serde_json::Value> {
    let ok = Json(serde_json::json!({
        "message": "If the email exists, a reset link has been sent"
    }));

    let email = req.email.trim().to_lowercase();
    let user = match db::users::find_by_login(&state.pool, &email).await {
        Ok(Some(u)) if u.email.eq_ignore_ascii_case(&email) => u,
        Ok(_) => return Ok(ok),
        Err(e) => return Err(internal(e)),
    };

    let callback_id = generate_token(CALLBACK_ID_LEN);
    db::password_resets::create(&state.pool, user.id, &callback_id)
        .await
        .map_err(internal)?;

    let link = crate::email::reset_link(&state.app_host, &callback_id);
    if let Err(e) =
        crate::email::send_password_reset(&state.ses, &state.ses_from_email, &user.email, &link)
            .await
    {
        tracing::error!(user_id = user.id, error = %e, "Failed to send password reset email");
    }

    Ok(ok)
}

/// POST /user/password-reset/confirm
pub async fn confirm_password_reset(
    State(state): State<AppState>,
    Json(req): Json<PasswordResetConfirm>,
) -> ApiResult<serde_json::Value> {
    if req.password.chars().count() < PASSWORD_MIN_LEN {
        return Err(AppError::new(ErrorCode::PasswordTooShort));
    }

    let user_id = db::password_resets::consume(&state.pool, req.callback_id.trim())
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::ResetLinkInvalid))?;

    let hashed = hash_password(&req.password).map_err(internal)?;
    db::users::update_password(&state.pool, user_id, &hashed)
        .await
        .map_err(internal)?;
    db::password_resets::clear_for_user(&state.pool, user_id)
        .await
        .map_err(internal)?;

    tracing::info!(user_id, "Password reset");
    Ok(Json(serde_json::json!({ "message": "Password has been reset" })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register_req(email: &str, username: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    #[test]
    fn test_validate_registration() {
        let (email, username) =
            validate_registration(&register_req(" Hiker@Example.com ", " hiker ", "longenough"))
                .unwrap();
        assert_eq!(email, "hiker@example.com");
        assert_eq!(username, "hiker");

        let err = validate_registration(&register_req("a@b.c", "sixteen_chars_xx", "longenough"))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UsernameTooLong);

        let err = validate_registration(&register_req("a@b.c", "hiker", "short")).unwrap_err();
        assert_eq!(err.code, ErrorCode::PasswordTooShort);

        let err = validate_registration(&register_req("nope", "hiker", "longenough")).unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn test_validate_profile_normalises_units() {
        let mut update = ProfileUpdate {
            unit_weight: Some("metric".into()),
            ..Default::default()
        };
        validate_profile(&mut update).unwrap();
        assert_eq!(update.unit_weight.as_deref(), Some("METRIC"));

        let mut distance = ProfileUpdate {
            unit_distance: Some("km".into()),
            ..Default::default()
        };
        validate_profile(&mut distance).unwrap();
        assert_eq!(distance.unit_distance.as_deref(), Some("KM"));

        let mut bad = ProfileUpdate {
            unit_distance: Some("furlongs".into()),
            ..Default::default()
        };
        assert!(validate_profile(&mut bad).is_err());

        let mut bad_currency = ProfileUpdate {
            currency: Some("XYZ".into()),
            ..Default::default()
        };
        assert!(validate_profile(&mut bad_currency).is_err());
    }
}
