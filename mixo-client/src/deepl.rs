//! DeepL translation adapter
//!
//! Posts form-encoded batches to `/v2/translate`. One `text` field per input string;
//! the response keeps input order.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use shared::store::{TranslationError, Translator};

use crate::ClientResult;

pub const DEFAULT_API_URL: &str = "https://api-free.deepl.com/v2/translate";

/// DeepL answers 456 when the character quota is exhausted
const QUOTA_EXCEEDED: u16 = 456;

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    translations: Vec<Translation>,
}

#[derive(Debug, Deserialize)]
struct Translation {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// [`Translator`] backed by the DeepL REST API
#[derive(Debug, Clone)]
pub struct DeeplTranslator {
    client: Client,
    api_url: String,
    api_key: Option<String>,
}

impl DeeplTranslator {
    pub fn new(
        api_url: impl Into<String>,
        api_key: Option<String>,
        timeout_ms: u64,
    ) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()?;
        Ok(Self {
            client,
            api_url: api_url.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

/// Form fields for one batch
fn form_params(
    api_key: &str,
    texts: &[String],
    target_lang: &str,
    source_lang: &str,
) -> Vec<(&'static str, String)> {
    let mut params = Vec::with_capacity(texts.len() + 4);
    params.push(("auth_key", api_key.to_string()));
    params.extend(texts.iter().map(|t| ("text", t.clone())));
    params.push(("target_lang", target_lang.to_uppercase()));
    params.push(("source_lang", source_lang.to_uppercase()));
    params.push(("preserve_formatting", "1".to_string()));
    params
}

fn error_for_status(status: StatusCode, body: &str) -> TranslationError {
    if status == StatusCode::TOO_MANY_REQUESTS || status.as_u16() == QUOTA_EXCEEDED {
        return TranslationError::RateLimited;
    }
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message)
        .unwrap_or_else(|| "DeepL API error".to_string());
    TranslationError::Service(format!("{}: {}", status, message))
}

#[async_trait]
impl Translator for DeeplTranslator {
    async fn translate_batch(
        &self,
        texts: &[String],
        target_lang: &str,
        source_lang: &str,
    ) -> Result<Vec<String>, TranslationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(TranslationError::NotConfigured)?;
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let response = self
            .client
            .post(&self.api_url)
            .form(&form_params(api_key, texts, target_lang, source_lang))
            .send()
            .await
            .map_err(|e| TranslationError::Service(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = error_for_status(status, &body);
            tracing::warn!(status = %status, error = %err, "DeepL request failed");
            return Err(err);
        }

        let parsed: TranslateResponse = response
            .json()
            .await
            .map_err(|e| TranslationError::Service(format!("invalid response: {}", e)))?;
        if parsed.translations.len() != texts.len() {
            return Err(TranslationError::Service(format!(
                "expected {} translations, got {}",
                texts.len(),
                parsed.translations.len()
            )));
        }

        Ok(parsed.translations.into_iter().map(|t| t.text).collect())
    }
}
