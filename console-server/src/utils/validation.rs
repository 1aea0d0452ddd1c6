//! Input validation helpers
//!
//! Text length limits and checks shared by the category handlers.

use crate::utils::AppError;
use shared::models::is_valid_color_code;

/// Category titles
pub const MAX_TITLE_LEN: usize = 200;

/// URLs / image paths
pub const MAX_URL_LEN: usize = 2048;

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} must not be empty"))
            .with_detail("field", field));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        ))
        .with_detail("field", field));
    }
    Ok(())
}

/// Color codes must be one of the known two-color themes, or empty.
pub fn validate_color_code(value: &str) -> Result<(), AppError> {
    if !is_valid_color_code(value) {
        return Err(AppError::validation(format!("Unknown color code {value}"))
            .with_detail("field", "colorCode"));
    }
    Ok(())
}
