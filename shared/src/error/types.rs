//! `AppError` and the JSON envelope every console endpoint answers with

use super::category::ErrorCategory;
use super::codes::ErrorCode;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

/// Console error: a code, a message for the admin UI, and optional details
/// such as the offending field or category id.
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct AppError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<HashMap<String, Value>>,
}

impl AppError {
    /// Error carrying the code's default message
    pub fn new(code: ErrorCode) -> Self {
        Self {
            message: code.message().to_string(),
            code,
            details: None,
        }
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.details
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    pub fn http_status(&self) -> StatusCode {
        self.code.http_status()
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ValidationFailed, msg)
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, msg)
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, msg)
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::ConfigError, msg)
    }

    pub fn category_not_found(id: impl Into<String>) -> Self {
        let id = id.into();
        Self::with_message(ErrorCode::CategoryNotFound, format!("Category {id} not found"))
            .with_detail("category_id", id)
    }

    pub fn cocktail_not_found(id: impl Into<String>) -> Self {
        let id = id.into();
        Self::with_message(ErrorCode::CocktailNotFound, format!("Cocktail {id} not found"))
            .with_detail("cocktail_id", id)
    }

    /// A buffer is already writing its working copy to the store
    pub fn commit_in_progress() -> Self {
        Self::new(ErrorCode::CommitInProgress)
    }

    pub fn store_commit(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::StoreCommitFailed, msg)
    }

    pub fn store_unavailable(msg: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::StoreUnavailable, msg)
    }
}

/// Response envelope
///
/// `code` is 0 on success. Failures carry the [`ErrorCode`] number and the
/// error's details; `data` is omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<u16>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, Value>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self::success_with_message("OK", data)
    }

    pub fn success_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            code: Some(0),
            message: message.into(),
            data: Some(data),
            details: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn error(err: &AppError) -> Self {
        Self {
            code: Some(err.code.code()),
            message: err.message.clone(),
            data: None,
            details: err.details.clone(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.http_status();
        if self.code.category() == ErrorCategory::System {
            tracing::error!(code = %self.code, message = %self.message, "System error occurred");
        }
        (status, axum::Json(ApiResponse::<()>::error(&self))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::response::IntoResponse;

    #[test]
    fn test_default_message_and_details() {
        let err = AppError::new(ErrorCode::CategoryNotFound);
        assert_eq!(err.message, "Category not found");
        assert!(err.details.is_none());

        let err = AppError::validation("Title must not be empty")
            .with_detail("field", "title")
            .with_detail("value", "  ");
        assert_eq!(err.code, ErrorCode::ValidationFailed);
        let details = err.details.unwrap();
        assert_eq!(details["field"], "title");
        assert_eq!(details["value"], "  ");
    }

    #[test]
    fn test_catalog_errors_name_the_entity() {
        let err = AppError::category_not_found("summer");
        assert_eq!(err.to_string(), "Category summer not found");
        assert_eq!(err.details.as_ref().unwrap()["category_id"], "summer");

        let err = AppError::cocktail_not_found("mojito");
        assert_eq!(err.code, ErrorCode::CocktailNotFound);
        assert_eq!(err.details.as_ref().unwrap()["cocktail_id"], "mojito");
    }

    #[test]
    fn test_status_follows_code() {
        assert_eq!(AppError::category_not_found("a").http_status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::commit_in_progress().http_status(), StatusCode::CONFLICT);
        assert_eq!(AppError::store_commit("rejected").http_status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            AppError::store_unavailable("timeout").http_status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_error_envelope() {
        let err = AppError::with_message(ErrorCode::StalePosition, "moved since last refresh")
            .with_detail("expected", 3);
        let response = ApiResponse::<()>::error(&err);
        assert_eq!(response.code, Some(ErrorCode::StalePosition.code()));
        assert!(response.data.is_none());

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["message"], "moved since last refresh");
        assert_eq!(json["details"]["expected"], 3);
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_success_envelope_omits_details() {
        let json = serde_json::to_value(ApiResponse::success(vec!["a", "b"])).unwrap();
        assert_eq!(json["code"], 0);
        assert_eq!(json["message"], "OK");
        assert_eq!(json["data"][1], "b");
        assert!(json.get("details").is_none());
    }

    #[test]
    fn test_into_response_uses_error_status() {
        let response = AppError::commit_in_progress().into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = AppError::config("bad backend").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
