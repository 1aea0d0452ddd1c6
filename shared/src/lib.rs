//! Shared types for the cocktail catalog console
//!
//! Domain models, the unified error system, the display-order reconciliation
//! engine and the traits of the external collaborators (document store, blob
//! store, translator).

pub mod error;
pub mod models;
pub mod ordering;
pub mod store;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
