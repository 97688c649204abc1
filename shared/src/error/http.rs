//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::ItemNotFound
            | Self::BrandNotFound
            | Self::ProductNotFound
            | Self::VariantNotFound
            | Self::CategoryNotFound
            | Self::ItemCategoryNotFound
            | Self::ImageNotFound
            | Self::TripNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::EmailExists | Self::UsernameExists => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::AccountBanned
            | Self::AccountDeactivated => StatusCode::UNAUTHORIZED,

            // 413 Payload Too Large
            Self::FileTooLarge => StatusCode::PAYLOAD_TOO_LARGE,

            // 429 Too Many Requests
            Self::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,

            // 502 Bad Gateway (object storage)
            Self::FileStorageFailed => StatusCode::BAD_GATEWAY,

            // 500 Internal Server Error
            Self::InternalError | Self::Unknown => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation/creation errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        assert_eq!(ErrorCode::ItemNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::BrandNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::TripNotFound.http_status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_creation_failures_are_bad_request() {
        assert_eq!(
            ErrorCode::CatalogCreateFailed.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::CatalogNameRequired.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::InvalidWeightUnit.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ErrorCode::PackNotFound.http_status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_auth_status() {
        assert_eq!(
            ErrorCode::NotAuthenticated.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::AccountBanned.http_status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ErrorCode::TooManyRequests.http_status(),
            StatusCode::TOO_MANY_REQUESTS
        );
    }

    #[test]
    fn test_system_status() {
        assert_eq!(
            ErrorCode::InternalError.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::FileStorageFailed.http_status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_conflict_status() {
        assert_eq!(ErrorCode::EmailExists.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::UsernameExists.http_status(), StatusCode::CONFLICT);
    }
}
