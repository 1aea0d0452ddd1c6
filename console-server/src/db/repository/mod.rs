//! Repository Module
//!
//! Typed access to the `categories` and `cocktails` collections on top of any
//! [`DocumentStore`](shared::store::DocumentStore).

pub mod category;
pub mod cocktail;

pub use category::CategoryRepository;
pub use cocktail::CocktailRepository;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use shared::store::Document;

/// Build an update patch from `(field, value)` pairs
pub fn patch<'a>(fields: impl IntoIterator<Item = (&'a str, Value)>) -> Value {
    let map: Map<String, Value> = fields
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();
    Value::Object(map)
}

/// Decode documents, skipping (and logging) the ones that do not fit the model
fn decode_all<T: DeserializeOwned>(collection: &str, docs: Vec<Document>) -> Vec<T> {
    docs.into_iter()
        .filter_map(|doc| {
            let id = doc.id.clone();
            match doc.into_model() {
                Ok(model) => Some(model),
                Err(e) => {
                    tracing::warn!(collection, id = %id, error = %e, "Skipping malformed document");
                    None
                }
            }
        })
        .collect()
}
