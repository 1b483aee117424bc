//! Output formatting for list screens and detail views.
//!
//! Renders one page of records as a bordered table, JSON, or CSV. Table
//! columns come from [`ApiResource::COLUMNS`] and are shrunk to fit the
//! terminal; JSON and CSV emit the raw field values untouched.

use std::collections::HashSet;

use clap::ValueEnum;
use moneta_link::{ApiResource, Page};
use serde_json::Value as JsonValue;

use crate::error::{CliError, Result};

/// Maximum column width before truncation
const MAX_COLUMN_WIDTH: usize = 32;

/// Minimum column width when resizing to fit the terminal
const MIN_COLUMN_WIDTH: usize = 6;

/// Output format for list screens and exports to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

/// Formats record pages for display
pub struct OutputFormatter {
    format: OutputFormat,
    color: bool,
}

impl OutputFormatter {
    /// Create a new formatter
    pub fn new(format: OutputFormat, color: bool) -> Self {
        Self { format, color }
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    pub fn set_format(&mut self, format: OutputFormat) {
        self.format = format;
    }

    /// Get terminal width, defaulting to 80 if unavailable
    fn get_terminal_width() -> usize {
        if let Some((w, _h)) = term_size::dimensions() {
            w
        } else {
            80 // Default fallback
        }
    }

    /// Truncate a string to max width with ellipsis
    fn truncate_value(value: &str, max_width: usize) -> String {
        if value.len() <= max_width {
            value.to_string()
        } else if max_width <= 3 {
            value.chars().take(max_width).collect()
        } else {
            let take = max_width - 3;
            format!("{}...", value.chars().take(take).collect::<String>())
        }
    }

    /// Format one page of records, marking selected rows in table output
    pub fn format_page<R: ApiResource>(
        &self,
        page: &Page<R>,
        selection: &HashSet<u64>,
    ) -> Result<String> {
        match self.format {
            OutputFormat::Table => self.format_table(page, selection),
            OutputFormat::Json => self.format_json(page),
            OutputFormat::Csv => self.format_csv(page),
        }
    }

    /// Format a single record as a field/value listing
    pub fn format_record<R: ApiResource>(&self, record: &R) -> Result<String> {
        let object = Self::to_object(record)?;

        if self.format == OutputFormat::Json {
            return serde_json::to_string_pretty(&object)
                .map_err(|e| CliError::Format(e.to_string()));
        }

        // Named columns first, remaining fields after in map order
        let mut fields: Vec<(String, String)> = Vec::with_capacity(object.len());
        for col in R::COLUMNS {
            if let Some(value) = object.get(*col) {
                fields.push(((*col).to_string(), self.format_json_value(value)));
            }
        }
        for (key, value) in &object {
            if !R::COLUMNS.contains(&key.as_str()) {
                fields.push((key.clone(), self.format_json_value(value)));
            }
        }

        let key_width = fields.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        let mut output = String::new();
        for (key, value) in &fields {
            output.push_str(&format!("{:key_width$}  {}\n", key, value));
        }
        Ok(output)
    }

    /// Format as table
    fn format_table<R: ApiResource>(
        &self,
        page: &Page<R>,
        selection: &HashSet<u64>,
    ) -> Result<String> {
        if page.items.is_empty() {
            return Ok(format!("No {}s found\n", R::LABEL));
        }

        let show_marker = !selection.is_empty();
        let mut columns: Vec<String> = Vec::with_capacity(R::COLUMNS.len() + 1);
        if show_marker {
            columns.push("*".to_string());
        }
        columns.extend(R::COLUMNS.iter().map(|c| c.to_string()));

        let terminal_width = Self::get_terminal_width();

        // Precompute string values once to avoid double formatting
        let mut string_rows: Vec<Vec<String>> = Vec::with_capacity(page.items.len());
        let mut col_widths: Vec<usize> = columns.iter().map(|c| c.len()).collect();
        for item in &page.items {
            let object = Self::to_object(item)?;
            let mut srow: Vec<String> = Vec::with_capacity(columns.len());
            if show_marker {
                let mark = if selection.contains(&item.id()) { "*" } else { "" };
                srow.push(mark.to_string());
            }
            for col in R::COLUMNS {
                let value = object
                    .get(*col)
                    .map(|v| self.format_json_value(v))
                    .unwrap_or_default();
                srow.push(value);
            }
            for (i, value) in srow.iter().enumerate() {
                col_widths[i] = col_widths[i].max(value.len());
            }
            string_rows.push(srow);
        }

        let column_count = col_widths.len();
        if column_count > 0 {
            // Calculate available width for columns
            let border_padding = column_count * 3 + 1;
            let mut available = terminal_width.saturating_sub(border_padding);
            if available < column_count {
                available = column_count;
            }

            // Only truncate if total width exceeds available space
            let mut total_width = col_widths.iter().sum::<usize>();
            if total_width > available {
                // First pass: cap at MAX_COLUMN_WIDTH if needed
                for width in col_widths.iter_mut() {
                    if *width > MAX_COLUMN_WIDTH {
                        *width = MAX_COLUMN_WIDTH;
                    }
                }
                total_width = col_widths.iter().sum();

                // Second pass: shrink columns to fit terminal if still too wide
                while total_width > available {
                    if let Some((idx, _)) = col_widths
                        .iter()
                        .enumerate()
                        .filter(|(_, width)| **width > MIN_COLUMN_WIDTH)
                        .max_by_key(|(_, width)| *width)
                    {
                        col_widths[idx] -= 1;
                    } else if let Some((idx, _)) = col_widths
                        .iter()
                        .enumerate()
                        .filter(|(_, width)| **width > 1)
                        .max_by_key(|(_, width)| *width)
                    {
                        col_widths[idx] -= 1;
                    } else {
                        break;
                    }
                    total_width = col_widths.iter().sum();
                }
            }
        }

        let mut output = String::new();

        // Top border
        output.push('┌');
        for (idx, width) in col_widths.iter().enumerate() {
            output.push_str(&"─".repeat(width + 2));
            output.push(if idx == col_widths.len() - 1 {
                '┐'
            } else {
                '┬'
            });
        }
        output.push('\n');

        // Header row
        output.push('│');
        for (i, col) in columns.iter().enumerate() {
            output.push(' ');
            let truncated = Self::truncate_value(col, col_widths[i]);
            output.push_str(&format!("{:width$}", truncated, width = col_widths[i]));
            output.push(' ');
            output.push('│');
        }
        output.push('\n');

        // Header separator
        output.push('├');
        for (idx, width) in col_widths.iter().enumerate() {
            output.push_str(&"─".repeat(width + 2));
            output.push(if idx == col_widths.len() - 1 {
                '┤'
            } else {
                '┼'
            });
        }
        output.push('\n');

        // Data rows
        for srow in &string_rows {
            output.push('│');
            for (i, value) in srow.iter().enumerate() {
                output.push(' ');
                let truncated = Self::truncate_value(value, col_widths[i]);
                output.push_str(&format!("{:width$}", truncated, width = col_widths[i]));
                output.push(' ');
                output.push('│');
            }
            output.push('\n');
        }

        // Bottom border
        output.push('└');
        for (idx, width) in col_widths.iter().enumerate() {
            output.push_str(&"─".repeat(width + 2));
            output.push(if idx == col_widths.len() - 1 {
                '┘'
            } else {
                '┴'
            });
        }
        output.push('\n');

        let row_count = string_rows.len();
        let row_label = if row_count == 1 { "row" } else { "rows" };
        output.push_str(&format!("({} {})\n", row_count, row_label));
        output.push_str(&format!(
            "Page {} of {} ({} total)",
            page.page,
            page.total_pages(),
            page.total_count
        ));
        if show_marker {
            output.push_str(&format!("  [{} selected]", selection.len()));
        }
        output.push('\n');

        Ok(output)
    }

    /// Format as JSON, paging metadata included
    fn format_json<R: ApiResource>(&self, page: &Page<R>) -> Result<String> {
        serde_json::to_string_pretty(page).map_err(|e| CliError::Format(e.to_string()))
    }

    /// Format as CSV
    fn format_csv<R: ApiResource>(&self, page: &Page<R>) -> Result<String> {
        if page.items.is_empty() {
            return Ok("".to_string());
        }

        let mut output = R::COLUMNS.join(",") + "\n";
        for item in &page.items {
            let object = Self::to_object(item)?;
            let values: Vec<String> = R::COLUMNS
                .iter()
                .map(|col| {
                    object
                        .get(*col)
                        .map(|v| self.format_csv_value(v))
                        .unwrap_or_default()
                })
                .collect();
            output.push_str(&values.join(","));
            output.push('\n');
        }

        Ok(output)
    }

    /// Format an error message - MySQL/PostgreSQL style
    pub fn format_error(&self, message: &str) -> String {
        if self.color {
            format!("\x1b[31mERROR\x1b[0m: {}", message)
        } else {
            format!("ERROR: {}", message)
        }
    }

    /// Serialize a record into a JSON object for column lookup
    fn to_object<R: ApiResource>(record: &R) -> Result<serde_json::Map<String, JsonValue>> {
        match serde_json::to_value(record).map_err(|e| CliError::Format(e.to_string()))? {
            JsonValue::Object(map) => Ok(map),
            other => Err(CliError::Format(format!(
                "expected a record object, got {}",
                other
            ))),
        }
    }

    /// Format JSON value for table display
    fn format_json_value(&self, value: &JsonValue) -> String {
        match value {
            JsonValue::Null => "".to_string(),
            JsonValue::Bool(b) => b.to_string(),
            JsonValue::Number(n) => n.to_string(),
            JsonValue::String(s) => s.clone(),
            JsonValue::Array(_) | JsonValue::Object(_) => value.to_string(),
        }
    }

    /// Format JSON value for CSV (escape commas and quotes)
    fn format_csv_value(&self, value: &JsonValue) -> String {
        let s = self.format_json_value(value);
        if s.contains(',') || s.contains('"') || s.contains('\n') {
            format!("\"{}\"", s.replace('"', "\"\""))
        } else {
            s
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moneta_link::Product;

    fn product(id: u64, name: &str, price: f64) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "name": name,
            "sku": format!("SKU-{id}"),
            "unit_price": price,
            "quantity_on_hand": 4,
            "category": "office",
            "created_at": "2026-01-05T09:00:00Z",
            "updated_at": "2026-01-05T09:00:00Z",
        }))
        .unwrap()
    }

    fn page_of(items: Vec<Product>) -> Page<Product> {
        let len = items.len() as u64;
        Page {
            items,
            total_count: len,
            page: 1,
            page_size: 10,
        }
    }

    #[test]
    fn test_format_json_value() {
        let formatter = OutputFormatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.format_json_value(&JsonValue::Null), "");
        assert_eq!(formatter.format_json_value(&JsonValue::Bool(true)), "true");
        assert_eq!(
            formatter.format_json_value(&JsonValue::String("test".into())),
            "test"
        );
    }

    #[test]
    fn test_csv_escaping() {
        let formatter = OutputFormatter::new(OutputFormat::Csv, false);
        let value = JsonValue::String("hello, world".into());
        assert_eq!(formatter.format_csv_value(&value), "\"hello, world\"");
    }

    #[test]
    fn test_truncate_value() {
        // No truncation needed
        assert_eq!(OutputFormatter::truncate_value("short", 10), "short");

        // Truncation with ellipsis
        assert_eq!(
            OutputFormatter::truncate_value("this is a very long string that needs truncation", 20),
            "this is a very lo..."
        );

        // Edge case: max_width = 3 (can't fit ellipsis, just truncate)
        assert_eq!(OutputFormatter::truncate_value("test", 3), "tes");

        // Edge case: max_width < 3 (just truncate)
        assert_eq!(OutputFormatter::truncate_value("test", 2), "te");

        // Edge case: exactly at max_width = 4
        assert_eq!(OutputFormatter::truncate_value("test", 4), "test");

        // Edge case: one over max_width with ellipsis
        assert_eq!(OutputFormatter::truncate_value("hello", 4), "h...");
    }

    #[test]
    fn test_table_shows_columns_and_paging() {
        let formatter = OutputFormatter::new(OutputFormat::Table, false);
        let page = page_of(vec![product(1, "Desk", 250.0), product(2, "Chair", 120.0)]);

        let output = formatter.format_page(&page, &HashSet::new()).unwrap();

        assert!(output.contains("name"));
        assert!(output.contains("Desk"));
        assert!(output.contains("(2 rows)"));
        assert!(output.contains("Page 1 of 1 (2 total)"));
    }

    #[test]
    fn test_table_marks_selected_rows() {
        let formatter = OutputFormatter::new(OutputFormat::Table, false);
        let page = page_of(vec![product(1, "Desk", 250.0), product(2, "Chair", 120.0)]);
        let selection: HashSet<u64> = [2].into_iter().collect();

        let output = formatter.format_page(&page, &selection).unwrap();

        assert!(output.contains("[1 selected]"));
        let chair_line = output.lines().find(|l| l.contains("Chair")).unwrap();
        assert!(chair_line.starts_with("│ *"));
        let desk_line = output.lines().find(|l| l.contains("Desk")).unwrap();
        assert!(!desk_line.contains('*'));
    }

    #[test]
    fn test_empty_page_message() {
        let formatter = OutputFormatter::new(OutputFormat::Table, false);
        let page = page_of(vec![]);

        let output = formatter.format_page(&page, &HashSet::new()).unwrap();

        assert_eq!(output, "No products found\n");
    }

    #[test]
    fn test_csv_header_and_rows() {
        let formatter = OutputFormatter::new(OutputFormat::Csv, false);
        let page = page_of(vec![product(1, "Desk, oak", 250.0)]);

        let output = formatter.format_page(&page, &HashSet::new()).unwrap();
        let mut lines = output.lines();

        assert_eq!(
            lines.next(),
            Some("id,name,sku,unit_price,quantity_on_hand,category,active")
        );
        let row = lines.next().unwrap();
        assert!(row.starts_with("1,\"Desk, oak\""));
    }

    #[test]
    fn test_json_includes_paging_metadata() {
        let formatter = OutputFormatter::new(OutputFormat::Json, false);
        let page = page_of(vec![product(7, "Lamp", 35.5)]);

        let output = formatter.format_page(&page, &HashSet::new()).unwrap();
        let value: JsonValue = serde_json::from_str(&output).unwrap();

        assert_eq!(value["total_count"], 1);
        assert_eq!(value["items"][0]["name"], "Lamp");
    }

    #[test]
    fn test_record_lists_fields_in_column_order() {
        let formatter = OutputFormatter::new(OutputFormat::Table, false);
        let record = product(9, "Screen", 410.0);

        let output = formatter.format_record(&record).unwrap();
        let first = output.lines().next().unwrap();

        assert!(first.starts_with("id"));
        assert!(output.contains("Screen"));
    }
}
