//! Cocktail Model
//!
//! Only the fields the category screens read. Authoring and moderation live elsewhere.

use serde::{Deserialize, Serialize};

/// Cocktail document (collection `cocktails`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cocktail {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    /// Moderation flag, stored capitalized in the document
    #[serde(rename = "Validated", default)]
    pub validated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
}

/// Body of `POST /api/categories/{id}/cocktails`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CocktailAdd {
    pub cocktail_id: String,
}

/// Body of `POST /api/categories/{id}/cocktails/{cocktail_id}/move`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CocktailMove {
    /// Zero-based target index in the category list
    pub index: usize,
}
