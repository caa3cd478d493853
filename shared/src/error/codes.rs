//! Unified error codes for the Univ platform
//!
//! Error codes are shared between the cloud service and the frontend and are
//! organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Tenant errors
//! - 5xxx: Billing errors
//! - 6xxx: Student errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
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
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 6,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is disabled
    AccountDisabled = 1005,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Specific role required
    RoleRequired = 2002,

    // ==================== 3xxx: Tenant ====================
    /// Tenant not found
    TenantNotFound = 3001,
    /// Subdomain slug already taken
    SlugTaken = 3002,
    /// Email already registered
    EmailTaken = 3003,

    // ==================== 5xxx: Billing ====================
    /// Payment signature mismatch
    SignatureMismatch = 5001,
    /// Subscription does not currently grant access
    SubscriptionNotActive = 5002,
    /// No subscription exists for this tenant
    NoSubscription = 5003,
    /// Purchased seat count is zero
    SeatLimitZero = 5004,
    /// All purchased seats are in use
    SeatLimitReached = 5005,
    /// Payment setup failed (gateway)
    PaymentSetupFailed = 5006,

    // ==================== 6xxx: Student ====================
    /// Student not found in the educator's roster
    StudentNotFound = 6001,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9003,
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
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::AccountDisabled => "Account is disabled",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::RoleRequired => "Specific role is required",

            // Tenant
            ErrorCode::TenantNotFound => "Tenant not found",
            ErrorCode::SlugTaken => "Subdomain is already taken",
            ErrorCode::EmailTaken => "Email is already registered",

            // Billing
            ErrorCode::SignatureMismatch => "Payment signature mismatch",
            ErrorCode::SubscriptionNotActive => "Subscription is not active",
            ErrorCode::NoSubscription => "No subscription found",
            ErrorCode::SeatLimitZero => "Seat limit is zero",
            ErrorCode::SeatLimitReached => "Seat limit reached",
            ErrorCode::PaymentSetupFailed => "Payment setup failed",

            // Student
            ErrorCode::StudentNotFound => "Student not found",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl From<ErrorCode> for u16 {
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an unknown u16 value to [`ErrorCode`]
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
        let code = match value {
            0 => Self::Success,
            1 => Self::Unknown,
            2 => Self::ValidationFailed,
            3 => Self::NotFound,
            4 => Self::AlreadyExists,
            5 => Self::InvalidRequest,
            6 => Self::RequiredField,
            1001 => Self::NotAuthenticated,
            1002 => Self::InvalidCredentials,
            1003 => Self::TokenExpired,
            1004 => Self::TokenInvalid,
            1005 => Self::AccountDisabled,
            2001 => Self::PermissionDenied,
            2002 => Self::RoleRequired,
            3001 => Self::TenantNotFound,
            3002 => Self::SlugTaken,
            3003 => Self::EmailTaken,
            5001 => Self::SignatureMismatch,
            5002 => Self::SubscriptionNotActive,
            5003 => Self::NoSubscription,
            5004 => Self::SeatLimitZero,
            5005 => Self::SeatLimitReached,
            5006 => Self::PaymentSetupFailed,
            6001 => Self::StudentNotFound,
            9001 => Self::InternalError,
            9002 => Self::DatabaseError,
            9003 => Self::ConfigError,
            other => return Err(InvalidErrorCode(other)),
        };
        Ok(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::SignatureMismatch.code(), 5001);
        assert_eq!(ErrorCode::SeatLimitReached.code(), 5005);
        assert_eq!(ErrorCode::StudentNotFound.code(), 6001);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_try_from_roundtrip() {
        for code in [
            ErrorCode::Success,
            ErrorCode::ValidationFailed,
            ErrorCode::TokenExpired,
            ErrorCode::TenantNotFound,
            ErrorCode::SeatLimitZero,
            ErrorCode::StudentNotFound,
            ErrorCode::DatabaseError,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()).unwrap(), code);
        }
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
    }

    #[test]
    fn test_serialize_as_u16() {
        let json = serde_json::to_string(&ErrorCode::SeatLimitReached).unwrap();
        assert_eq!(json, "5005");
        let code: ErrorCode = serde_json::from_str("5005").unwrap();
        assert_eq!(code, ErrorCode::SeatLimitReached);
    }
}
