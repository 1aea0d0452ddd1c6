//! Upload Routes
//!
//! Category image uploads through the blob store.

mod handler;

use axum::{Router, extract::DefaultBodyLimit, routing::post};

use crate::core::ServerState;

pub use handler::{MAX_FILE_SIZE, SUPPORTED_FORMATS, UploadResponse};

/// Build upload router
pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/uploads/category", post(handler::upload_category_image))
        // Room for multipart framing on top of the file itself
        .layer(DefaultBodyLimit::max(MAX_FILE_SIZE + 64 * 1024))
}
