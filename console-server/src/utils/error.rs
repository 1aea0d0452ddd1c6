//! 统一错误处理
//!
//! 错误类型来自 `shared::error`，这里只提供处理器用到的响应助手。
//!
//! ```ignore
//! Err(AppError::category_not_found(id))
//! Ok(ok(list))
//! ```

use axum::Json;
use serde::Serialize;

pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

/// Create a successful response
pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

/// Create a successful response with a custom message
pub fn ok_with_message<T: Serialize>(message: impl Into<String>, data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success_with_message(message, data))
}
