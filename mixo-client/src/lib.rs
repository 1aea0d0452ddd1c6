//! Mixo Client - HTTP adapters for the console's external collaborators
//!
//! - [`HttpDocumentStore`]: REST document database
//! - [`HttpBlobStore`]: object storage uploads
//! - [`DeeplTranslator`]: DeepL batch translation

pub mod blob;
pub mod config;
pub mod deepl;
pub mod document;
pub mod error;
pub mod http;

pub use blob::HttpBlobStore;
pub use config::ClientConfig;
pub use deepl::DeeplTranslator;
pub use document::HttpDocumentStore;
pub use error::{ClientError, ClientResult};
pub use http::HttpClient;
