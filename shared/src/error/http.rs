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
            Self::NotFound | Self::CategoryNotFound | Self::CocktailNotFound => {
                StatusCode::NOT_FOUND
            }

            // 409 Conflict
            Self::AlreadyExists
            | Self::StalePosition
            | Self::CommitInProgress
            | Self::CocktailAlreadyInCategory => StatusCode::CONFLICT,

            // 422 Unprocessable
            Self::OrderingCorrupted | Self::CocktailNotValidated => {
                StatusCode::UNPROCESSABLE_ENTITY
            }

            // 429 Too Many Requests
            Self::TranslationRateLimited => StatusCode::TOO_MANY_REQUESTS,

            // 502 Bad Gateway (upstream collaborator failed)
            Self::StoreCommitFailed | Self::BlobUploadFailed | Self::TranslationServiceError => {
                StatusCode::BAD_GATEWAY
            }

            // 503 Service Unavailable (transient errors, client can retry)
            Self::StoreUnavailable | Self::TranslationNotConfigured => {
                StatusCode::SERVICE_UNAVAILABLE
            }

            // 500 Internal Server Error
            Self::Unknown | Self::InternalError | Self::ConfigError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }

            // 400 Bad Request (default for validation errors)
            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::InvalidFormat
            | Self::RequiredField
            | Self::ValueOutOfRange
            | Self::InvalidPosition
            | Self::UnsupportedLanguage => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_status() {
        assert_eq!(ErrorCode::CategoryNotFound.http_status(), StatusCode::NOT_FOUND);
        assert_eq!(ErrorCode::CocktailNotFound.http_status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_ordering_statuses() {
        assert_eq!(ErrorCode::InvalidPosition.http_status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorCode::StalePosition.http_status(), StatusCode::CONFLICT);
        assert_eq!(ErrorCode::CommitInProgress.http_status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_upstream_statuses() {
        assert_eq!(ErrorCode::StoreCommitFailed.http_status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            ErrorCode::TranslationRateLimited.http_status(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ErrorCode::StoreUnavailable.http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
