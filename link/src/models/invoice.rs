use serde::{Deserialize, Serialize};

use super::line_item::LineItem;

/// Invoice lifecycle status, as tracked by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Draft,
    Sent,
    Paid,
    Overdue,
    Void,
}

/// Invoice record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: u64,
    /// Human-facing invoice number, assigned by the server
    pub number: String,
    pub customer_id: u64,
    /// Denormalized customer name for list rendering
    #[serde(default)]
    pub customer_name: Option<String>,
    pub status: InvoiceStatus,
    pub issued_on: String,
    pub due_on: String,
    #[serde(default)]
    pub lines: Vec<LineItem>,
    pub total: f64,
    #[serde(default)]
    pub amount_paid: f64,
    pub created_at: String,
    pub updated_at: String,
}

/// Create/update payload for an invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceDraft {
    pub customer_id: u64,
    pub issued_on: String,
    pub due_on: String,
    #[serde(default)]
    pub lines: Vec<LineItem>,
}
