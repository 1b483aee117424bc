use serde::{Deserialize, Serialize};

/// Inventory product record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    /// Stock-keeping unit, unique per business
    pub sku: String,
    #[serde(default)]
    pub description: Option<String>,
    pub unit_price: f64,
    /// Units currently in stock; negative means oversold
    pub quantity_on_hand: i64,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

fn default_active() -> bool {
    true
}

/// Create/update payload for a product.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductDraft {
    pub name: String,
    pub sku: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub unit_price: f64,
    pub quantity_on_hand: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}
