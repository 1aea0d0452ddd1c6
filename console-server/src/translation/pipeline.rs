//! Batch translation of nested trees
//!
//! Leaves are sent to the [`Translator`] in chunks of `batch_size`, with a pause
//! between chunks. A chunk that fails keeps its original texts; the pass always
//! runs to the end and reports what happened.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use shared::models::{DEFAULT_SOURCE_LANG, TranslateRequest, TranslateResponse, TranslationReport};
use shared::store::Translator;
use shared::{AppError, AppResult};

use super::languages::validate_language;
use super::tree::{self, Leaf};

/// Progress callback: `(processed, total)` leaves
pub type Progress<'a> = &'a (dyn Fn(usize, usize) + Send + Sync);

pub struct TranslationPipeline {
    translator: Arc<dyn Translator>,
    batch_size: usize,
    batch_delay: Duration,
}

impl TranslationPipeline {
    pub fn new(translator: Arc<dyn Translator>, batch_size: usize, batch_delay: Duration) -> Self {
        Self {
            translator,
            batch_size: batch_size.max(1),
            batch_delay,
        }
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Translate `request.source`, or only fill the gaps of `request.existing` when given
    pub async fn translate(
        &self,
        request: TranslateRequest,
        progress: Option<Progress<'_>>,
    ) -> AppResult<TranslateResponse> {
        let target = validate_language(&request.target_lang)?.code;
        let source_lang = request.source_lang.as_deref().unwrap_or(DEFAULT_SOURCE_LANG);
        let source_lang = validate_language(source_lang)?.code;
        if !request.source.is_object() {
            return Err(
                AppError::validation("source must be a JSON object").with_detail("field", "source")
            );
        }

        let (mut result, leaves) = match &request.existing {
            Some(existing) if !existing.is_object() => {
                return Err(AppError::validation("existing must be a JSON object")
                    .with_detail("field", "existing"));
            }
            Some(existing) => (
                tree::fill_from(existing, &request.source),
                tree::collect_missing(&request.source, existing),
            ),
            None => (request.source.clone(), tree::collect_leaves(&request.source)),
        };

        tracing::info!(
            target_lang = target,
            source_lang,
            leaves = leaves.len(),
            fill_missing = request.existing.is_some(),
            "Translation pass started"
        );
        let report = self
            .run(&mut result, &leaves, target, source_lang, progress)
            .await;
        tracing::info!(
            translated = report.translated,
            fallback = report.fallback,
            failed_batches = report.failed_batches,
            "Translation pass finished"
        );

        Ok(TranslateResponse { result, report })
    }

    async fn run(
        &self,
        result: &mut Value,
        leaves: &[Leaf],
        target: &str,
        source: &str,
        progress: Option<Progress<'_>>,
    ) -> TranslationReport {
        let mut report = TranslationReport {
            total: leaves.len(),
            ..Default::default()
        };
        let mut processed = 0;

        for (batch, chunk) in leaves.chunks(self.batch_size).enumerate() {
            if batch > 0 && !self.batch_delay.is_zero() {
                tokio::time::sleep(self.batch_delay).await;
            }
            report.batches += 1;

            let texts: Vec<String> = chunk.iter().map(|l| l.text.clone()).collect();
            match self.translator.translate_batch(&texts, target, source).await {
                Ok(translated) if translated.len() == chunk.len() => {
                    let mut placed = 0;
                    for (leaf, text) in chunk.iter().zip(translated) {
                        if tree::set_at(result, &leaf.path, Value::String(text)) {
                            placed += 1;
                        } else {
                            tracing::warn!(
                                path = ?leaf.path,
                                "No slot for translated text, skipped"
                            );
                        }
                    }
                    report.translated += placed;
                    report.fallback += chunk.len() - placed;
                }
                Ok(translated) => {
                    tracing::warn!(
                        batch,
                        sent = chunk.len(),
                        received = translated.len(),
                        "Translator returned a different number of texts, keeping originals"
                    );
                    report.failed_batches += 1;
                    report.fallback += chunk.len();
                }
                Err(e) => {
                    tracing::warn!(
                        batch,
                        size = chunk.len(),
                        error = %e,
                        "Translation batch failed, keeping originals"
                    );
                    report.failed_batches += 1;
                    report.fallback += chunk.len();
                }
            }

            processed += chunk.len();
            if let Some(progress) = progress {
                progress(processed, report.total);
            }
            tracing::debug!(processed, total = report.total, "Translation progress");
        }

        report
    }
}
