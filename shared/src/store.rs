//! External collaborator traits
//!
//! ```text
//!  ┌───────────────┐   ┌────────────┐   ┌────────────┐
//!  │ DocumentStore │   │ BlobStore  │   │ Translator │   ◄── traits (this module)
//!  └───────┬───────┘   └─────┬──────┘   └─────┬──────┘
//!          │                 │                │
//!   HttpDocumentStore   HttpBlobStore   DeeplTranslator  (mixo-client)
//!   MemoryDocumentStore MemoryBlobStore                  (console-server, dev)
//! ```

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc};

use crate::error::{AppError, ErrorCode};

/// Category documents
pub const CATEGORIES: &str = "categories";
/// Cocktail documents
pub const COCKTAILS: &str = "cocktails";

// =============================================================================
// Documents
// =============================================================================

/// A stored document: store-assigned id plus its JSON body
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

impl Document {
    pub fn new(id: impl Into<String>, data: Value) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// Deserialize into a model, injecting the id as the `id` field
    pub fn into_model<T: DeserializeOwned>(self) -> StoreResult<T> {
        let mut data = self.data;
        match data.as_object_mut() {
            Some(obj) => {
                obj.insert("id".to_string(), Value::String(self.id.clone()));
            }
            None => {
                return Err(StoreError::InvalidDocument(format!(
                    "{} is not an object",
                    self.id
                )));
            }
        }
        serde_json::from_value(data)
            .map_err(|e| StoreError::InvalidDocument(format!("{}: {}", self.id, e)))
    }
}

/// One write of a batch
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Merge `data` into the document's fields
    Update {
        collection: String,
        id: String,
        data: Value,
    },
    Delete {
        collection: String,
        id: String,
    },
}

impl WriteOp {
    pub fn update(collection: &str, id: impl Into<String>, data: Value) -> Self {
        Self::Update {
            collection: collection.to_string(),
            id: id.into(),
            data,
        }
    }

    pub fn delete(collection: &str, id: impl Into<String>) -> Self {
        Self::Delete {
            collection: collection.to_string(),
            id: id.into(),
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Self::Update { id, .. } | Self::Delete { id, .. } => id,
        }
    }
}

/// Change notification pushed by stores that support live subscriptions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub collection: String,
}

/// Document / blob store errors
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("document {collection}/{id} not found")]
    NotFound { collection: String, id: String },

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("write rejected: {0}")]
    Rejected(String),

    #[error("invalid document: {0}")]
    InvalidDocument(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { collection, id } => AppError::with_message(
                ErrorCode::NotFound,
                format!("{}/{} not found", collection, id),
            )
            .with_detail("collection", collection)
            .with_detail("id", id),
            StoreError::Unavailable(msg) => AppError::store_unavailable(msg),
            StoreError::Rejected(msg) => AppError::store_commit(msg),
            StoreError::InvalidDocument(msg) => AppError::internal(msg),
        }
    }
}

/// Hosted document database
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents of a collection, ascending on `order_by` when given
    async fn query(&self, collection: &str, order_by: Option<&str>) -> StoreResult<Vec<Document>>;

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Document>>;

    /// Insert a document and return its new id
    async fn add(&self, collection: &str, data: Value) -> StoreResult<String>;

    /// Merge `data` into an existing document
    async fn update(&self, collection: &str, id: &str, data: Value) -> StoreResult<()>;

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()>;

    /// Apply all writes as one unit
    async fn batch_write(&self, ops: Vec<WriteOp>) -> StoreResult<()>;

    /// Live change feed, when the backend offers one
    fn watch(&self) -> Option<broadcast::Receiver<ChangeEvent>> {
        None
    }
}

// =============================================================================
// Blobs
// =============================================================================

/// Upload progress in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadProgress {
    pub transferred: u64,
    pub total: u64,
}

impl UploadProgress {
    /// Percentage in `0..=100`
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        ((self.transferred.min(self.total) * 100) / self.total) as u8
    }
}

/// Object storage
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store `bytes` at `path` and return the public download URL
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        progress: Option<mpsc::Sender<UploadProgress>>,
    ) -> StoreResult<String>;
}

// =============================================================================
// Translation
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TranslationError {
    #[error("translation service is not configured")]
    NotConfigured,

    #[error("translation rate limit reached")]
    RateLimited,

    #[error("unsupported language: {0}")]
    UnsupportedLanguage(String),

    #[error("translation service error: {0}")]
    Service(String),
}

impl From<TranslationError> for AppError {
    fn from(err: TranslationError) -> Self {
        match err {
            TranslationError::NotConfigured => AppError::new(ErrorCode::TranslationNotConfigured),
            TranslationError::RateLimited => AppError::new(ErrorCode::TranslationRateLimited),
            TranslationError::UnsupportedLanguage(code) => AppError::with_message(
                ErrorCode::UnsupportedLanguage,
                format!("Language {} is not supported", code),
            )
            .with_detail("language", code),
            TranslationError::Service(msg) => {
                AppError::with_message(ErrorCode::TranslationServiceError, msg)
            }
        }
    }
}

/// Third-party text translation API
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate `texts` in one call; the result has the same length and order
    async fn translate_batch(
        &self,
        texts: &[String],
        target_lang: &str,
        source_lang: &str,
    ) -> Result<Vec<String>, TranslationError>;
}
