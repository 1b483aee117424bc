//! Reports screen: period summaries and report exports

use chrono::NaiveDate;
use colored::*;
use moneta_link::{ExportFormat, ReportSummary};

use crate::error::{CliError, Result};
use crate::guard::Screen;

use super::CliSession;

impl CliSession {
    /// Fetch and render the financial summary for a period
    ///
    /// Lands on the reports screen as a side effect, so a later
    /// `export csv` picks the report export rather than a collection.
    pub(super) async fn run_summary(&mut self, from: &str, to: &str) -> Result<()> {
        self.require_signed_in()?;
        let (from, to) = validate_period(from, to)?;

        // Guarded implicitly: require_signed_in passed, so reports is open
        // to this session
        self.screen = Screen::Reports;

        let pb = self.spinner("Crunching the numbers...");
        let result = self.session.client().report_summary(&from, &to).await;
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
        let summary = result?;

        self.render_summary(&summary);
        self.last_summary = Some(summary);
        Ok(())
    }

    /// Export the report last shown on the reports screen
    pub(super) async fn export_report(&mut self, format: ExportFormat) -> Result<()> {
        let (from, to) = match self.last_summary {
            Some(ref summary) => (summary.from.clone(), summary.to.clone()),
            None => {
                return Err(CliError::Validation(
                    "no report to export; run summary <from> <to> first".to_string(),
                ));
            }
        };

        let pb = self.spinner(&format!("Exporting report as {}...", format));
        let result = self
            .session
            .client()
            .report_export(format, &from, &to)
            .await;
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
        let export = result?;

        self.save_export(&export)
    }

    fn render_summary(&self, summary: &ReportSummary) {
        println!();
        println!("{}", "═══════════════════════════════════════".cyan().bold());
        println!("{}", "    Financial Summary".white().bold());
        println!("{}", "═══════════════════════════════════════".cyan().bold());
        println!();

        println!("{}", "Period:".yellow().bold());
        println!("  From:           {}", summary.from.green());
        println!("  To:             {}", summary.to.green());
        println!();

        println!("{}", "Totals:".yellow().bold());
        println!("  Revenue:        {}", format_money(summary.total_revenue).green());
        println!("  Expenses:       {}", format_money(summary.total_expenses).red());
        let net = format_money(summary.net_income);
        println!(
            "  Net income:     {}",
            if summary.net_income >= 0.0 {
                net.green()
            } else {
                net.red()
            }
        );
        println!();

        println!("{}", "Invoices:".yellow().bold());
        println!("  Issued:         {}", summary.invoice_count.to_string().green());
        println!(
            "  Open total:     {}",
            format_money(summary.open_invoice_total).yellow()
        );
        println!();

        if !summary.top_products.is_empty() {
            println!("{}", "Top products:".yellow().bold());
            for (rank, product) in summary.top_products.iter().enumerate() {
                println!(
                    "  {}. {} | {} sold | {}",
                    rank + 1,
                    product.name,
                    product.units_sold,
                    format_money(product.revenue).green()
                );
            }
            println!();
        }
    }
}

/// Check a reporting period: both dates parse and the range is not inverted
fn validate_period(from: &str, to: &str) -> Result<(String, String)> {
    let parsed_from = parse_date(from)?;
    let parsed_to = parse_date(to)?;
    if parsed_from > parsed_to {
        return Err(CliError::Validation(format!(
            "the period starts after it ends ({} > {})",
            from, to
        )));
    }
    Ok((from.to_string(), to.to_string()))
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| CliError::Validation(format!("'{}' is not a date (expected YYYY-MM-DD)", value)))
}

/// Two-decimal money with a thousands separator
fn format_money(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let fraction = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if negative { "-" } else { "" };
    format!("{}{}.{:02}", sign, grouped, fraction)
}
