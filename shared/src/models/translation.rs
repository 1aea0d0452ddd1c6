//! Translation DTOs

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Source language assumed when a request does not name one
pub const DEFAULT_SOURCE_LANG: &str = "FR";

/// A language the translation service accepts as a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Language {
    pub code: &'static str,
    pub name: &'static str,
}

/// Body of `POST /api/translations/translate`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    /// Source tree of nested keys with string leaves
    pub source: Value,
    pub target_lang: String,
    #[serde(default)]
    pub source_lang: Option<String>,
    /// Partially translated tree; when present only its missing or empty leaves are filled
    #[serde(default)]
    pub existing: Option<Value>,
}

/// Outcome of one translation pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationReport {
    /// Leaves sent to the translator
    pub total: usize,
    /// Leaves that came back translated
    pub translated: usize,
    /// Leaves that kept their original text because their batch failed
    pub fallback: usize,
    pub batches: usize,
    pub failed_batches: usize,
}

/// Translated tree plus its report
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslateResponse {
    pub result: Value,
    pub report: TranslationReport,
}
