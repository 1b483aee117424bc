use serde::{Deserialize, Serialize};

/// How a payment was received.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Card,
    Transfer,
    Other,
}

impl PaymentMethod {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "cash" => Some(PaymentMethod::Cash),
            "card" => Some(PaymentMethod::Card),
            "transfer" => Some(PaymentMethod::Transfer),
            "other" => Some(PaymentMethod::Other),
            _ => None,
        }
    }
}

/// Payment receipt record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Receipt {
    pub id: u64,
    pub number: String,
    /// Invoice this payment settles, when tied to one
    #[serde(default)]
    pub invoice_id: Option<u64>,
    #[serde(default)]
    pub customer_id: Option<u64>,
    pub amount: f64,
    pub method: PaymentMethod,
    pub received_on: String,
    #[serde(default)]
    pub note: Option<String>,
    pub created_at: String,
}

/// Create/update payload for a receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceiptDraft {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invoice_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<u64>,
    pub amount: f64,
    pub method: PaymentMethod,
    pub received_on: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
