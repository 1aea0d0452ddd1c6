//! Translation API Handlers

use axum::{Json, extract::State};
use serde_json::Value;
use shared::models::{Language, TranslateRequest, TranslateResponse};

use crate::core::ServerState;
use crate::translation::{SUPPORTED_LANGUAGES, tree};
use crate::utils::{ApiResponse, AppResult, ok, ok_with_message};

/// GET /api/translations/languages
pub async fn languages() -> Json<ApiResponse<&'static [Language]>> {
    ok(SUPPORTED_LANGUAGES)
}

/// GET /api/translations/skeleton
pub async fn skeleton() -> Json<ApiResponse<Value>> {
    ok(tree::skeleton())
}

/// POST /api/translations/translate - 批量翻译, 失败批次保留原文
pub async fn translate(
    State(state): State<ServerState>,
    Json(payload): Json<TranslateRequest>,
) -> AppResult<Json<ApiResponse<TranslateResponse>>> {
    let target = payload.target_lang.to_uppercase();
    let progress = move |done: usize, total: usize| {
        tracing::debug!(target_lang = %target, done, total, "Translation progress");
    };
    let response = state.translation.translate(payload, Some(&progress)).await?;

    let message = if response.report.failed_batches > 0 {
        format!(
            "{} of {} texts kept their original value",
            response.report.fallback, response.report.total
        )
    } else {
        "OK".to_string()
    };
    Ok(ok_with_message(message, response))
}
