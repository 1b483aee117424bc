use serde::{Deserialize, Serialize};

/// One line on an invoice or order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub quantity: f64,
    pub unit_price: f64,
}

impl LineItem {
    /// Line total (quantity times unit price).
    pub fn amount(&self) -> f64 {
        self.quantity * self.unit_price
    }
}
