//! Unified error codes for the console
//!
//! This module defines all error codes used across console-server, mixo-client and the dashboard.
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 4xxx: Category ordering errors
//! - 5xxx: Cocktail errors
//! - 6xxx: Translation errors
//! - 7xxx: Storage errors
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
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 4xxx: Category ====================
    /// Category not found in the working set
    CategoryNotFound = 4001,
    /// Display position outside the allowed bounds
    InvalidPosition = 4002,
    /// Caller's idea of a category position no longer matches the list
    StalePosition = 4003,
    /// A batch commit is already in flight
    CommitInProgress = 4004,
    /// Persisted display order is not a dense 1..N sequence
    OrderingCorrupted = 4005,

    // ==================== 5xxx: Cocktail ====================
    /// Cocktail not found
    CocktailNotFound = 5001,
    /// Cocktail has not passed moderation
    CocktailNotValidated = 5002,
    /// Cocktail already belongs to the category
    CocktailAlreadyInCategory = 5003,

    // ==================== 6xxx: Translation ====================
    /// Translation service returned an error
    TranslationServiceError = 6001,
    /// Translation service has no API key
    TranslationNotConfigured = 6002,
    /// Translation service rate limit hit
    TranslationRateLimited = 6003,
    /// Language code is not supported
    UnsupportedLanguage = 6004,

    // ==================== 7xxx: Storage ====================
    /// Batch write to the document store failed
    StoreCommitFailed = 7001,
    /// Document store unreachable or returned an error
    StoreUnavailable = 7002,
    /// Blob upload failed
    BlobUploadFailed = 7003,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Configuration error
    ConfigError = 9002,
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
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Category
            ErrorCode::CategoryNotFound => "Category not found",
            ErrorCode::InvalidPosition => "Display position is out of range",
            ErrorCode::StalePosition => "Display position is stale, reload the list",
            ErrorCode::CommitInProgress => "A reorder commit is already in progress",
            ErrorCode::OrderingCorrupted => "Display order is not a dense sequence",

            // Cocktail
            ErrorCode::CocktailNotFound => "Cocktail not found",
            ErrorCode::CocktailNotValidated => "Cocktail has not been validated",
            ErrorCode::CocktailAlreadyInCategory => "Cocktail already belongs to this category",

            // Translation
            ErrorCode::TranslationServiceError => "Translation service error",
            ErrorCode::TranslationNotConfigured => "Translation service is not configured",
            ErrorCode::TranslationRateLimited => "Translation rate limit reached",
            ErrorCode::UnsupportedLanguage => "Language is not supported",

            // Storage
            ErrorCode::StoreCommitFailed => "Batch commit to the document store failed",
            ErrorCode::StoreUnavailable => "Document store is unavailable",
            ErrorCode::BlobUploadFailed => "File upload failed",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::ConfigError => "Configuration error",
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
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Category
            4001 => Ok(ErrorCode::CategoryNotFound),
            4002 => Ok(ErrorCode::InvalidPosition),
            4003 => Ok(ErrorCode::StalePosition),
            4004 => Ok(ErrorCode::CommitInProgress),
            4005 => Ok(ErrorCode::OrderingCorrupted),

            // Cocktail
            5001 => Ok(ErrorCode::CocktailNotFound),
            5002 => Ok(ErrorCode::CocktailNotValidated),
            5003 => Ok(ErrorCode::CocktailAlreadyInCategory),

            // Translation
            6001 => Ok(ErrorCode::TranslationServiceError),
            6002 => Ok(ErrorCode::TranslationNotConfigured),
            6003 => Ok(ErrorCode::TranslationRateLimited),
            6004 => Ok(ErrorCode::UnsupportedLanguage),

            // Storage
            7001 => Ok(ErrorCode::StoreCommitFailed),
            7002 => Ok(ErrorCode::StoreUnavailable),
            7003 => Ok(ErrorCode::BlobUploadFailed),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
