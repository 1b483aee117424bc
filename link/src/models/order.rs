use serde::{Deserialize, Serialize};

use super::line_item::LineItem;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Fulfilled,
    Cancelled,
}

/// Sales order record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: u64,
    pub number: String,
    pub customer_id: u64,
    #[serde(default)]
    pub customer_name: Option<String>,
    pub status: OrderStatus,
    pub placed_on: String,
    #[serde(default)]
    pub lines: Vec<LineItem>,
    pub total: f64,
    pub created_at: String,
    pub updated_at: String,
}

/// Create/update payload for an order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDraft {
    pub customer_id: u64,
    pub placed_on: String,
    #[serde(default)]
    pub lines: Vec<LineItem>,
}
