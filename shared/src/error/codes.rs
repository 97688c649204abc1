//! Unified error codes for the gear service
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Account errors
//! - 6xxx: Gear catalog and inventory errors (65xx: file upload)
//! - 7xxx: Trip and pack errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the frontend can
/// switch on them without string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Invalid request
    InvalidRequest = 5,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account has been banned
    AccountBanned = 1006,
    /// Account was deactivated by its owner
    AccountDeactivated = 1007,
    /// Password too short
    PasswordTooShort = 1008,
    /// Password reset link is unknown or already used
    ResetLinkInvalid = 1009,
    /// Too many requests from one client
    TooManyRequests = 1010,

    // ==================== 2xxx: Account ====================
    /// User not found
    UserNotFound = 2101,
    /// Email already registered
    EmailExists = 2102,
    /// Username already taken
    UsernameExists = 2103,
    /// Username longer than allowed
    UsernameTooLong = 2104,

    // ==================== 6xxx: Gear ====================
    /// Item not found
    ItemNotFound = 6001,
    /// Weight unit not recognised
    InvalidWeightUnit = 6002,
    /// Numeric field could not be parsed
    InvalidNumber = 6003,
    /// Brand not found
    BrandNotFound = 6101,
    /// Product not found
    ProductNotFound = 6102,
    /// Product variant not found
    VariantNotFound = 6103,
    /// Catalog name is empty
    CatalogNameRequired = 6104,
    /// Catalog row could not be created
    CatalogCreateFailed = 6105,
    /// Category not found
    CategoryNotFound = 6201,
    /// Item category binding not found
    ItemCategoryNotFound = 6202,

    // ==================== 65xx: File Upload ====================
    /// File too large
    FileTooLarge = 6501,
    /// Unsupported file format
    UnsupportedFileFormat = 6502,
    /// Invalid/corrupted image file
    InvalidImageFile = 6503,
    /// No file provided in request
    NoFileProvided = 6504,
    /// Empty file provided
    EmptyFile = 6505,
    /// Image processing failed
    ImageProcessingFailed = 6508,
    /// File storage failed
    FileStorageFailed = 6509,
    /// Image not found
    ImageNotFound = 6510,

    // ==================== 7xxx: Trip & Pack ====================
    /// Trip not found
    TripNotFound = 7001,
    /// Pack not found
    PackNotFound = 7101,
    /// Pack item not found
    PackItemNotFound = 7102,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::InvalidRequest => "Invalid request",

            // Auth
            ErrorCode::NotAuthenticated => "Invalid or missing token",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::AccountBanned => "Account has been banned",
            ErrorCode::AccountDeactivated => "Account is deactivated",
            ErrorCode::PasswordTooShort => "Password must be at least 8 characters",
            ErrorCode::ResetLinkInvalid => "Password reset link is invalid",
            ErrorCode::TooManyRequests => "Too many requests, try again later",

            // Account
            ErrorCode::UserNotFound => "Account does not exist",
            ErrorCode::EmailExists => "Email is already registered",
            ErrorCode::UsernameExists => "Username is already taken",
            ErrorCode::UsernameTooLong => "Username must be at most 15 characters",

            // Gear
            ErrorCode::ItemNotFound => "Item not found",
            ErrorCode::InvalidWeightUnit => "Invalid unit",
            ErrorCode::InvalidNumber => "Invalid number",
            ErrorCode::BrandNotFound => "Brand not found",
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::VariantNotFound => "Product variant not found",
            ErrorCode::CatalogNameRequired => "Name must not be empty",
            ErrorCode::CatalogCreateFailed => "Unable to create catalog entry",
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::ItemCategoryNotFound => "Item category not found",

            // File Upload
            ErrorCode::FileTooLarge => "File too large",
            ErrorCode::UnsupportedFileFormat => "Unsupported file format",
            ErrorCode::InvalidImageFile => "Invalid image file",
            ErrorCode::NoFileProvided => "No file provided",
            ErrorCode::EmptyFile => "Empty file provided",
            ErrorCode::ImageProcessingFailed => "Image processing failed",
            ErrorCode::FileStorageFailed => "File storage failed",
            ErrorCode::ImageNotFound => "Image not found",

            // Trip & Pack
            ErrorCode::TripNotFound => "Trip not found",
            ErrorCode::PackNotFound => "Pack does not exist",
            ErrorCode::PackItemNotFound => "Pack item does not exist",

            // System
            ErrorCode::InternalError => "Internal server error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            5 => Ok(ErrorCode::InvalidRequest),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1006 => Ok(ErrorCode::AccountBanned),
            1007 => Ok(ErrorCode::AccountDeactivated),
            1008 => Ok(ErrorCode::PasswordTooShort),
            1009 => Ok(ErrorCode::ResetLinkInvalid),
            1010 => Ok(ErrorCode::TooManyRequests),

            // Account
            2101 => Ok(ErrorCode::UserNotFound),
            2102 => Ok(ErrorCode::EmailExists),
            2103 => Ok(ErrorCode::UsernameExists),
            2104 => Ok(ErrorCode::UsernameTooLong),

            // Gear
            6001 => Ok(ErrorCode::ItemNotFound),
            6002 => Ok(ErrorCode::InvalidWeightUnit),
            6003 => Ok(ErrorCode::InvalidNumber),
            6101 => Ok(ErrorCode::BrandNotFound),
            6102 => Ok(ErrorCode::ProductNotFound),
            6103 => Ok(ErrorCode::VariantNotFound),
            6104 => Ok(ErrorCode::CatalogNameRequired),
            6105 => Ok(ErrorCode::CatalogCreateFailed),
            6201 => Ok(ErrorCode::CategoryNotFound),
            6202 => Ok(ErrorCode::ItemCategoryNotFound),

            // File Upload
            6501 => Ok(ErrorCode::FileTooLarge),
            6502 => Ok(ErrorCode::UnsupportedFileFormat),
            6503 => Ok(ErrorCode::InvalidImageFile),
            6504 => Ok(ErrorCode::NoFileProvided),
            6505 => Ok(ErrorCode::EmptyFile),
            6508 => Ok(ErrorCode::ImageProcessingFailed),
            6509 => Ok(ErrorCode::FileStorageFailed),
            6510 => Ok(ErrorCode::ImageNotFound),

            // Trip & Pack
            7001 => Ok(ErrorCode::TripNotFound),
            7101 => Ok(ErrorCode::PackNotFound),
            7102 => Ok(ErrorCode::PackItemNotFound),

            // System
            9001 => Ok(ErrorCode::InternalError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::ValidationFailed.code(), 2);

        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::InvalidCredentials.code(), 1002);

        assert_eq!(ErrorCode::UsernameExists.code(), 2103);

        assert_eq!(ErrorCode::ItemNotFound.code(), 6001);
        assert_eq!(ErrorCode::InvalidWeightUnit.code(), 6002);
        assert_eq!(ErrorCode::CatalogCreateFailed.code(), 6105);
        assert_eq!(ErrorCode::FileTooLarge.code(), 6501);

        assert_eq!(ErrorCode::TripNotFound.code(), 7001);
        assert_eq!(ErrorCode::PackNotFound.code(), 7101);

        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::Unknown.is_success());
        assert!(!ErrorCode::ItemNotFound.is_success());
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(0), Ok(ErrorCode::Success));
        assert_eq!(ErrorCode::try_from(1001), Ok(ErrorCode::NotAuthenticated));
        assert_eq!(ErrorCode::try_from(6002), Ok(ErrorCode::InvalidWeightUnit));
        assert_eq!(ErrorCode::try_from(7101), Ok(ErrorCode::PackNotFound));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(999), Err(InvalidErrorCode(999)));
        assert_eq!(ErrorCode::try_from(4001), Err(InvalidErrorCode(4001)));
        assert_eq!(ErrorCode::try_from(10000), Err(InvalidErrorCode(10000)));
    }

    #[test]
    fn test_serialize() {
        let json = serde_json::to_string(&ErrorCode::ValidationFailed).unwrap();
        assert_eq!(json, "2");

        let json = serde_json::to_string(&ErrorCode::InvalidWeightUnit).unwrap();
        assert_eq!(json, "6002");
    }

    #[test]
    fn test_deserialize_invalid() {
        let result: Result<ErrorCode, _> = serde_json::from_str("999");
        assert!(result.is_err());
    }

    #[test]
    fn test_every_code_round_trips_through_u16() {
        for value in 0..10_000u16 {
            if let Ok(code) = ErrorCode::try_from(value) {
                assert_eq!(code.code(), value, "{code:?}");
            }
        }
    }

    #[test]
    fn test_message() {
        assert_eq!(ErrorCode::InvalidWeightUnit.message(), "Invalid unit");
        assert_eq!(ErrorCode::PackNotFound.message(), "Pack does not exist");
        assert_eq!(ErrorCode::InternalError.message(), "Internal server error");
    }
}
