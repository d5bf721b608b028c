//! Error codes carried by every error envelope.
//!
//! Each code has a client-facing identifier (`as_str`), an integer used in
//! logs and dashboards (`code`) and a fallback message.
//!
//! ```rust
//! use axum_helpers::errors::ErrorCode;
//!
//! assert_eq!(ErrorCode::ValidationError.as_str(), "VALIDATION_ERROR");
//! assert_eq!(ErrorCode::ValidationError.code(), 1001);
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Client errors (1000-1999)
    /// A required field is missing or a value failed a rule
    ValidationError,

    InvalidUuid,

    /// JSON body could not be read or deserialized
    JsonExtraction,

    NotFound,

    InternalError,

    /// Anything else the client got wrong
    BadRequest,

    /// Multipart body could not be parsed
    InvalidMultipart,

    PayloadTooLarge,

    // Database errors (2000-2999)
    /// Unique index violation
    DatabaseDuplicateKey,

    /// No server could be selected or the connection dropped
    DatabaseUnavailable,

    DatabaseError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::InvalidUuid => "INVALID_UUID",
            Self::JsonExtraction => "JSON_EXTRACTION",
            Self::NotFound => "NOT_FOUND",
            Self::InternalError => "INTERNAL_ERROR",
            Self::BadRequest => "BAD_REQUEST",
            Self::InvalidMultipart => "INVALID_MULTIPART",
            Self::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            Self::DatabaseDuplicateKey => "DATABASE_DUPLICATE_KEY",
            Self::DatabaseUnavailable => "DATABASE_UNAVAILABLE",
            Self::DatabaseError => "DATABASE_ERROR",
        }
    }

    /// Integer code for structured logs.
    ///
    /// - 1000-1999: client and generic server errors
    /// - 2000-2999: database errors
    pub fn code(&self) -> i32 {
        match self {
            Self::ValidationError => 1001,
            Self::InvalidUuid => 1002,
            Self::JsonExtraction => 1003,
            Self::NotFound => 1004,
            Self::InternalError => 1005,
            Self::BadRequest => 1012,
            Self::InvalidMultipart => 1013,
            Self::PayloadTooLarge => 1014,

            Self::DatabaseDuplicateKey => 2001,
            Self::DatabaseUnavailable => 2002,
            Self::DatabaseError => 2003,
        }
    }

    pub fn default_message(&self) -> &'static str {
        match self {
            Self::ValidationError => "Request validation failed",
            Self::InvalidUuid => "Invalid UUID format",
            Self::JsonExtraction => "Failed to parse request body",
            Self::NotFound => "Resource not found",
            Self::InternalError => "An internal server error occurred",
            Self::BadRequest => "Bad request",
            Self::InvalidMultipart => "Failed to parse multipart form data",
            Self::PayloadTooLarge => "Request body is too large",
            Self::DatabaseDuplicateKey => "A record with the same key already exists",
            Self::DatabaseUnavailable => "Database is temporarily unavailable",
            Self::DatabaseError => "Database error occurred",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
