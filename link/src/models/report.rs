use serde::{Deserialize, Serialize};

/// Sales for one product within a reporting window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductSales {
    pub product_id: u64,
    pub name: String,
    pub units_sold: f64,
    pub revenue: f64,
}

/// Profit-and-loss style summary for a date range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub from: String,
    pub to: String,
    pub total_revenue: f64,
    pub total_expenses: f64,
    pub net_income: f64,
    pub invoice_count: u64,
    /// Total outstanding across unpaid invoices
    pub open_invoice_total: f64,
    #[serde(default)]
    pub top_products: Vec<ProductSales>,
}
