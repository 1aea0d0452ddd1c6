//! Data models
//!
//! Shared between console-server, mixo-client and the dashboard (via API).
//! Document fields are camelCase on the wire. All IDs are opaque store-assigned strings.

pub mod category;
pub mod cocktail;
pub mod translation;

// Re-exports
pub use category::*;
pub use cocktail::*;
pub use translation::*;
