//! Unified error system for the gear service
//!
//! This module provides:
//! - [`ErrorCode`]: Standardized error codes for all error types
//! - [`ErrorCategory`]: Classification of errors by domain
//! - [`AppError`]: Rich error type with codes, messages, and details
//! - [`ErrorBody`]: JSON body of error responses
//!
//! # Error Code Ranges
//!
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Account errors
//! - 6xxx: Gear catalog / inventory errors
//! - 7xxx: Trip and pack errors
//! - 9xxx: System errors
//!
//! # Example
//!
//! ```
//! use shared::error::{AppError, ErrorBody, ErrorCode};
//!
//! let err = AppError::new(ErrorCode::ItemNotFound);
//!
//! let err = AppError::with_message(ErrorCode::InvalidWeightUnit, "Invalid unit: xyz")
//!     .with_detail("field", "unit");
//!
//! let body = ErrorBody::from(&err);
//! assert_eq!(body.code, ErrorCode::InvalidWeightUnit.code());
//! ```

mod category;
mod codes;
mod http;
mod types;

pub use category::ErrorCategory;
pub use codes::{ErrorCode, InvalidErrorCode};
pub use types::{AppError, AppResult, ErrorBody};
