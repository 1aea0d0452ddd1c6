//! Object storage adapter
//!
//! `PUT /objects/{path}` with the raw bytes, answered by `{"url": "..."}`.

use async_trait::async_trait;
use reqwest::Method;
use reqwest::header::{CONTENT_LENGTH, CONTENT_TYPE};
use serde::Deserialize;
use shared::store::{BlobStore, StoreResult, UploadProgress};
use tokio::sync::mpsc;

use crate::{ClientConfig, ClientResult, HttpClient};

/// Bytes handed to the transport per progress tick
const CHUNK_SIZE: usize = 64 * 1024;

#[derive(Debug, Deserialize)]
struct Uploaded {
    url: String,
}

/// [`BlobStore`] over plain HTTP object storage
#[derive(Debug, Clone)]
pub struct HttpBlobStore {
    http: HttpClient,
}

impl HttpBlobStore {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self {
            http: HttpClient::new(config)?,
        })
    }
}

/// Split `bytes` into chunks, reporting cumulative progress as each chunk is taken
fn progress_chunks(
    bytes: Vec<u8>,
    progress: Option<mpsc::Sender<UploadProgress>>,
) -> impl Iterator<Item = Result<Vec<u8>, std::io::Error>> + Send + 'static {
    let total = bytes.len() as u64;
    let chunks: Vec<Vec<u8>> = bytes.chunks(CHUNK_SIZE).map(<[u8]>::to_vec).collect();
    chunks.into_iter().scan(0u64, move |sent, chunk| {
        *sent += chunk.len() as u64;
        if let Some(tx) = &progress {
            // a slow listener only loses ticks
            let _ = tx.try_send(UploadProgress {
                transferred: *sent,
                total,
            });
        }
        Some(Ok(chunk))
    })
}

#[async_trait]
impl BlobStore for HttpBlobStore {
    async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        progress: Option<mpsc::Sender<UploadProgress>>,
    ) -> StoreResult<String> {
        let total = bytes.len();
        let body = reqwest::Body::wrap_stream(futures::stream::iter(progress_chunks(
            bytes, progress,
        )));

        let response = self
            .http
            .request(Method::PUT, &format!("objects/{}", path.trim_start_matches('/')))
            .header(CONTENT_TYPE, content_type)
            .header(CONTENT_LENGTH, total)
            .body(body)
            .send()
            .await
            .map_err(crate::ClientError::from)?;
        let uploaded: Uploaded = HttpClient::handle_response(response).await?;

        tracing::info!(path = %path, size = total, "Blob uploaded");
        Ok(uploaded.url)
    }
}
