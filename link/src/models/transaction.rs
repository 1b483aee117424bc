use serde::{Deserialize, Serialize};

/// Direction of a ledger transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "income" => Some(TransactionKind::Income),
            "expense" => Some(TransactionKind::Expense),
            _ => None,
        }
    }
}

/// Ledger transaction record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: u64,
    /// Date the money moved, ISO 8601 date
    pub occurred_on: String,
    pub description: String,
    /// Always positive; `kind` carries the direction
    pub amount: f64,
    pub kind: TransactionKind,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub customer_id: Option<u64>,
    pub created_at: String,
}

/// Create/update payload for a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionDraft {
    pub occurred_on: String,
    pub description: String,
    pub amount: f64,
    pub kind: TransactionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<u64>,
}
