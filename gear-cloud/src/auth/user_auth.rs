//! User JWT authentication

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};

use crate::state::AppState;

/// JWT claims for user authentication
#[derive(Debug, Serialize, Deserialize)]
pub struct UserClaims {
    /// User ID
    pub sub: String,
    pub username: String,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Authenticated user extracted from JWT
#[derive(Debug, Clone)]
pub struct UserIdentity {
    pub user_id: i64,
    pub username: String,
}

/// Create a JWT token for a user
pub fn create_token(
    user_id: i64,
    username: &str,
    secret: &str,
    expiry_days: i64,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = UserClaims {
        sub: user_id.to_string(),
        username: username.to_string(),
        exp: (now + chrono::Duration::days(expiry_days)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Verify a token and return the identity it carries
pub fn decode_token(token: &str, secret: &str) -> Result<UserIdentity, AppError> {
    let token_data = jsonwebtoken::decode::<UserClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        tracing::debug!("JWT validation failed: {e}");
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::token_expired(),
            _ => AppError::invalid_token("Invalid token"),
        }
    })?;

    let user_id = token_data
        .claims
        .sub
        .parse()
        .map_err(|_| AppError::invalid_token("Invalid token subject"))?;

    Ok(UserIdentity {
        user_id,
        username: token_data.claims.username,
    })
}

/// Identity of an optional bearer token on a public route; invalid tokens
/// are treated as anonymous
pub fn optional_identity(headers: &http::HeaderMap, secret: &str) -> Option<UserIdentity> {
    let token = headers
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?;
    decode_token(token, secret).ok()
}

/// Middleware that extracts and verifies the user JWT from the Authorization header
pub async fn user_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let auth_header = request
        .headers()
        .get("Authorization")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| error_response("Missing Authorization header"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| error_response("Invalid Authorization format"))?;

    let identity = decode_token(token, &state.jwt_secret).map_err(|e| e.into_response())?;

    request.extensions_mut().insert(identity);

    Ok(next.run(request).await)
}

fn error_response(message: &str) -> Response {
    AppError::with_message(ErrorCode::NotAuthenticated, message).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_round_trip() {
        let token = create_token(42, "hiker", "secret", 30).unwrap();
        let identity = decode_token(&token, "secret").unwrap();
        assert_eq!(identity.user_id, 42);
        assert_eq!(identity.username, "hiker");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = create_token(42, "hiker", "secret", 30).unwrap();
        let err = decode_token(&token, "other").unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenInvalid);
    }

    #[test]
    fn test_optional_identity() {
        let token = create_token(7, "walker", "secret", 1).unwrap();
        let mut headers = http::HeaderMap::new();
        assert!(optional_identity(&headers, "secret").is_none());

        headers.insert("Authorization", format!("Bearer {token}").parse().unwrap());
        assert_eq!(optional_identity(&headers, "secret").map(|i| i.user_id), Some(7));
        assert!(optional_identity(&headers, "other").is_none());
    }

    #[test]
    fn test_expired_token_rejected() {
        let token = create_token(42, "hiker", "secret", -2).unwrap();
        let err = decode_token(&token, "secret").unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenExpired);
    }
}
