//! Ordering errors

use crate::error::{AppError, ErrorCode};
use thiserror::Error;

/// Local validation failures of the reconciliation engine.
///
/// These never reach the store; they mean the caller's view of the list is wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderingError {
    #[error("position {position} is outside 1..={max}")]
    InvalidPosition { position: u32, max: u32 },

    #[error("entry {0} not found")]
    NotFound(String),

    #[error("entry {id} is at position {actual}, not {expected}")]
    StalePosition { id: String, expected: u32, actual: u32 },

    #[error("order must list every entry exactly once: {0}")]
    NotAPermutation(String),
}

pub type OrderingResult<T> = Result<T, OrderingError>;

impl From<OrderingError> for AppError {
    fn from(err: OrderingError) -> Self {
        match err {
            OrderingError::InvalidPosition { position, max } => AppError::with_message(
                ErrorCode::InvalidPosition,
                format!("Position {} is outside 1..={}", position, max),
            )
            .with_detail("position", position)
            .with_detail("max", max),
            OrderingError::NotFound(id) => AppError::category_not_found(id),
            OrderingError::StalePosition {
                id,
                expected,
                actual,
            } => AppError::new(ErrorCode::StalePosition)
                .with_detail("category_id", id)
                .with_detail("expected", expected)
                .with_detail("actual", actual),
            OrderingError::NotAPermutation(reason) => {
                AppError::invalid_request(format!("Invalid order: {}", reason))
            }
        }
    }
}
