//! Category Model

use serde::{Deserialize, Serialize};

/// Two-color themes a category card can be painted with.
///
/// The empty string means "no theme".
pub const COLOR_CODES: &[&str] = &[
    "",
    "Red&White",
    "Blue&White",
    "Green&White",
    "Orange&White",
    "Purple&White",
    "Red&Black",
    "Blue&Black",
    "Green&Black",
];

/// Check whether a color code is one of the known themes
pub fn is_valid_color_code(code: &str) -> bool {
    COLOR_CODES.contains(&code)
}

/// Category document (collection `categories`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub title: String,
    /// 1-based rank, dense and unique across the collection
    pub display_order: u32,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub color_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// Ordered cocktail ids shown inside the category
    #[serde(default)]
    pub cocktails: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<i64>,
}

fn default_true() -> bool {
    true
}

impl Category {
    /// Project to the ordering view used by the reconciliation engine
    pub fn order_item(&self) -> DisplayOrderItem {
        DisplayOrderItem {
            id: self.id.clone(),
            display_order: self.display_order,
        }
    }
}

/// Minimal `{id, displayOrder}` projection of a category
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayOrderItem {
    pub id: String,
    pub display_order: u32,
}

impl DisplayOrderItem {
    pub fn new(id: impl Into<String>, display_order: u32) -> Self {
        Self {
            id: id.into(),
            display_order,
        }
    }
}

/// Create category payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCreate {
    pub title: String,
    /// Target position; appends when absent
    pub display_order: Option<u32>,
    pub visible: Option<bool>,
    pub color_code: Option<String>,
    pub image_url: Option<String>,
    #[serde(default)]
    pub cocktails: Vec<String>,
}

/// Update category payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryUpdate {
    pub title: Option<String>,
    pub display_order: Option<u32>,
    pub visible: Option<bool>,
    pub color_code: Option<String>,
    pub image_url: Option<String>,
}

impl CategoryUpdate {
    /// True when no field would change
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.display_order.is_none()
            && self.visible.is_none()
            && self.color_code.is_none()
            && self.image_url.is_none()
    }
}

/// Category counts shown above the list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub total: usize,
    pub visible: usize,
    pub hidden: usize,
}

impl CategoryStats {
    pub fn from_categories(categories: &[Category]) -> Self {
        let visible = categories.iter().filter(|c| c.visible).count();
        Self {
            total: categories.len(),
            visible,
            hidden: categories.len() - visible,
        }
    }
}
