//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 4xxx: Category ordering errors
/// - 5xxx: Cocktail errors
/// - 6xxx: Translation errors
/// - 7xxx: Storage errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Category ordering errors (4xxx)
    Category,
    /// Cocktail errors (5xxx)
    Cocktail,
    /// Translation errors (6xxx)
    Translation,
    /// Storage errors (7xxx)
    Storage,
    /// System errors (9xxx and anything unmapped)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            4000..5000 => Self::Category,
            5000..6000 => Self::Cocktail,
            6000..7000 => Self::Translation,
            7000..8000 => Self::Storage,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Category => "category",
            Self::Cocktail => "cocktail",
            Self::Translation => "translation",
            Self::Storage => "storage",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(0), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(999), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(4001), ErrorCategory::Category);
        assert_eq!(ErrorCategory::from_code(5003), ErrorCategory::Cocktail);
        assert_eq!(ErrorCategory::from_code(6001), ErrorCategory::Translation);
        assert_eq!(ErrorCategory::from_code(7002), ErrorCategory::Storage);
        assert_eq!(ErrorCategory::from_code(9001), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(2001), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::Success.category(), ErrorCategory::General);
        assert_eq!(ErrorCode::InvalidPosition.category(), ErrorCategory::Category);
        assert_eq!(ErrorCode::CocktailNotFound.category(), ErrorCategory::Cocktail);
        assert_eq!(
            ErrorCode::TranslationRateLimited.category(),
            ErrorCategory::Translation
        );
        assert_eq!(ErrorCode::StoreCommitFailed.category(), ErrorCategory::Storage);
        assert_eq!(ErrorCode::InternalError.category(), ErrorCategory::System);
    }

    #[test]
    fn test_category_serialize() {
        let json = serde_json::to_string(&ErrorCategory::Translation).unwrap();
        assert_eq!(json, "\"translation\"");
    }

    #[test]
    fn test_category_deserialize() {
        let category: ErrorCategory = serde_json::from_str("\"storage\"").unwrap();
        assert_eq!(category, ErrorCategory::Storage);
    }
}
