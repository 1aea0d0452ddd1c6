//! 工具模块 - 通用工具函数和类型
//!
//! - [`AppError`] / [`ApiResponse`] - 来自 `shared::error`
//! - [`logger`] - 日志初始化
//! - [`validation`] - 输入校验

pub mod error;
pub mod logger;
pub mod validation;

pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use error::{ok, ok_with_message};
