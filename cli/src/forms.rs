//! Record forms for `add` and `edit`
//!
//! Field input is `key=value` tokens, with double quotes around values that
//! contain spaces. Every builder validates locally (required fields, numbers,
//! dates, enum values) and returns a [`CliError::Validation`] before any
//! request is made; a form that fails here never reaches the server.
//!
//! On `edit`, the current record is passed as `base` and untouched fields
//! keep their values. Giving an optional field an empty value (`note=`)
//! clears it.

use moneta_link::{
    Account, AccountDraft, ApiResource, Customer, CustomerDraft, Invoice, InvoiceDraft, LineItem,
    Order, OrderDraft, PaymentMethod, Product, ProductDraft, Receipt, ReceiptDraft, Role,
    RoleDraft, Transaction, TransactionDraft, TransactionKind,
};

use crate::error::{CliError, Result};

/// Parsed `key=value` form fields, in input order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormValues {
    values: Vec<(String, String)>,
}

impl FormValues {
    /// Tokenize a form field string
    ///
    /// `name="Office chair" sku=CH-01 unit_price=120`
    pub fn parse(input: &str) -> Result<Self> {
        let mut values: Vec<(String, String)> = Vec::new();
        let mut chars = input.chars().peekable();

        while let Some(&c) = chars.peek() {
            if c.is_whitespace() {
                chars.next();
                continue;
            }

            let mut key = String::new();
            let mut saw_eq = false;
            for c in chars.by_ref() {
                if c == '=' {
                    saw_eq = true;
                    break;
                }
                if c.is_whitespace() {
                    break;
                }
                key.push(c);
            }
            if !saw_eq || key.is_empty() {
                return Err(CliError::Validation(format!(
                    "expected field=value, got '{}'",
                    key
                )));
            }

            let mut value = String::new();
            if chars.peek() == Some(&'"') {
                chars.next();
                let mut closed = false;
                for c in chars.by_ref() {
                    if c == '"' {
                        closed = true;
                        break;
                    }
                    value.push(c);
                }
                if !closed {
                    return Err(CliError::Validation(format!(
                        "unterminated quote in value for '{}'",
                        key
                    )));
                }
            } else {
                while let Some(&c) = chars.peek() {
                    if c.is_whitespace() {
                        break;
                    }
                    value.push(c);
                    chars.next();
                }
            }

            if values.iter().any(|(k, _)| *k == key) {
                return Err(CliError::Validation(format!("duplicate field '{}'", key)));
            }
            values.push((key, value));
        }

        Ok(Self { values })
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Reject fields no builder knows about, catching typos locally
    fn ensure_known(&self, label: &str, allowed: &[&str]) -> Result<()> {
        for (key, _) in &self.values {
            if !allowed.contains(&key.as_str()) {
                return Err(CliError::Validation(format!(
                    "unknown field '{}' for {}; expected one of: {}",
                    key,
                    label,
                    allowed.join(", ")
                )));
            }
        }
        Ok(())
    }
}

/// A resource whose drafts can be built from form fields
pub trait FormResource: ApiResource {
    /// Build a draft; `base` carries the current record on edit
    fn draft_from(values: &FormValues, base: Option<&Self>) -> Result<Self::Draft>;
}

// ==================== Field helpers ====================

fn req_text(values: &FormValues, key: &str, base: Option<&str>) -> Result<String> {
    match values.get(key) {
        Some(v) if !v.trim().is_empty() => Ok(v.trim().to_string()),
        Some(_) => Err(CliError::Validation(format!("{} must not be empty", key))),
        None => base
            .map(str::to_string)
            .ok_or_else(|| CliError::Validation(format!("{} is required", key))),
    }
}

fn opt_text(values: &FormValues, key: &str, base: Option<&str>) -> Option<String> {
    match values.get(key) {
        Some(v) if v.trim().is_empty() => None,
        Some(v) => Some(v.trim().to_string()),
        None => base.map(str::to_string),
    }
}

fn req_f64(values: &FormValues, key: &str, base: Option<f64>) -> Result<f64> {
    match values.get(key) {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| CliError::Validation(format!("'{}' is not a number for {}", v, key))),
        None => base.ok_or_else(|| CliError::Validation(format!("{} is required", key))),
    }
}

fn req_i64(values: &FormValues, key: &str, base: Option<i64>) -> Result<i64> {
    match values.get(key) {
        Some(v) => v.trim().parse().map_err(|_| {
            CliError::Validation(format!("'{}' is not a whole number for {}", v, key))
        }),
        None => base.ok_or_else(|| CliError::Validation(format!("{} is required", key))),
    }
}

fn req_u64(values: &FormValues, key: &str, base: Option<u64>) -> Result<u64> {
    match values.get(key) {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| CliError::Validation(format!("'{}' is not an id for {}", v, key))),
        None => base.ok_or_else(|| CliError::Validation(format!("{} is required", key))),
    }
}

fn opt_u64(values: &FormValues, key: &str, base: Option<u64>) -> Result<Option<u64>> {
    match values.get(key) {
        Some(v) if v.trim().is_empty() => Ok(None),
        Some(v) => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| CliError::Validation(format!("'{}' is not an id for {}", v, key))),
        None => Ok(base),
    }
}

fn req_bool(values: &FormValues, key: &str, base: bool) -> Result<bool> {
    match values.get(key) {
        Some(v) => match v.trim().to_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(true),
            "false" | "no" | "0" => Ok(false),
            _ => Err(CliError::Validation(format!(
                "'{}' is not true/false for {}",
                v, key
            ))),
        },
        None => Ok(base),
    }
}

/// Dates are passed through as strings but must look like YYYY-MM-DD
fn req_date(values: &FormValues, key: &str, base: Option<&str>) -> Result<String> {
    match values.get(key) {
        Some(v) => {
            let v = v.trim();
            chrono::NaiveDate::parse_from_str(v, "%Y-%m-%d").map_err(|_| {
                CliError::Validation(format!("{} must be a date (YYYY-MM-DD), got '{}'", key, v))
            })?;
            Ok(v.to_string())
        }
        None => base
            .map(str::to_string)
            .ok_or_else(|| CliError::Validation(format!("{} is required", key))),
    }
}

/// Parse invoice/order lines: `desc:qty:price` entries joined with `;`
///
/// `lines="Consulting:2:100; Hosting:1:50"`. Descriptions may contain colons;
/// the last two segments are always quantity and price.
fn parse_lines(input: &str) -> Result<Vec<LineItem>> {
    let mut lines = Vec::new();
    for (idx, entry) in input.split(';').enumerate() {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let mut parts = entry.rsplitn(3, ':');
        let price = parts.next().unwrap_or_default().trim();
        let quantity = parts.next().unwrap_or_default().trim();
        let description = parts.next().unwrap_or_default().trim();

        if description.is_empty() {
            return Err(CliError::Validation(format!(
                "line {}: expected description:quantity:price",
                idx + 1
            )));
        }
        let quantity: f64 = quantity.parse().map_err(|_| {
            CliError::Validation(format!("line {}: '{}' is not a quantity", idx + 1, quantity))
        })?;
        let unit_price: f64 = price.parse().map_err(|_| {
            CliError::Validation(format!("line {}: '{}' is not a price", idx + 1, price))
        })?;

        lines.push(LineItem {
            description: description.to_string(),
            quantity,
            unit_price,
        });
    }
    if lines.is_empty() {
        return Err(CliError::Validation(
            "lines must contain at least one description:quantity:price entry".to_string(),
        ));
    }
    Ok(lines)
}

fn lines_field(
    values: &FormValues,
    key: &str,
    base: Option<&Vec<LineItem>>,
) -> Result<Vec<LineItem>> {
    match values.get(key) {
        Some(v) => parse_lines(v),
        None => base
            .cloned()
            .ok_or_else(|| CliError::Validation(format!("{} is required", key))),
    }
}

// ==================== Per-resource builders ====================

impl FormResource for Product {
    fn draft_from(values: &FormValues, base: Option<&Self>) -> Result<ProductDraft> {
        values.ensure_known(
            Self::LABEL,
            &[
                "name",
                "sku",
                "description",
                "unit_price",
                "quantity_on_hand",
                "category",
            ],
        )?;
        Ok(ProductDraft {
            name: req_text(values, "name", base.map(|b| b.name.as_str()))?,
            sku: req_text(values, "sku", base.map(|b| b.sku.as_str()))?,
            description: opt_text(
                values,
                "description",
                base.and_then(|b| b.description.as_deref()),
            ),
            unit_price: req_f64(values, "unit_price", base.map(|b| b.unit_price))?,
            quantity_on_hand: req_i64(
                values,
                "quantity_on_hand",
                base.map(|b| b.quantity_on_hand),
            )?,
            category: opt_text(values, "category", base.and_then(|b| b.category.as_deref())),
        })
    }
}

impl FormResource for Customer {
    fn draft_from(values: &FormValues, base: Option<&Self>) -> Result<CustomerDraft> {
        values.ensure_known(Self::LABEL, &["name", "email", "phone", "address"])?;
        Ok(CustomerDraft {
            name: req_text(values, "name", base.map(|b| b.name.as_str()))?,
            email: opt_text(values, "email", base.and_then(|b| b.email.as_deref())),
            phone: opt_text(values, "phone", base.and_then(|b| b.phone.as_deref())),
            address: opt_text(values, "address", base.and_then(|b| b.address.as_deref())),
        })
    }
}

impl FormResource for Transaction {
    fn draft_from(values: &FormValues, base: Option<&Self>) -> Result<TransactionDraft> {
        values.ensure_known(
            Self::LABEL,
            &[
                "occurred_on",
                "description",
                "amount",
                "kind",
                "category",
                "customer_id",
            ],
        )?;
        let kind = match values.get("kind") {
            Some(v) => TransactionKind::parse(v).ok_or_else(|| {
                CliError::Validation(format!("kind must be income or expense, got '{}'", v))
            })?,
            None => base
                .map(|b| b.kind)
                .ok_or_else(|| CliError::Validation("kind is required".to_string()))?,
        };
        let amount = req_f64(values, "amount", base.map(|b| b.amount))?;
        if amount <= 0.0 {
            return Err(CliError::Validation(
                "amount must be positive; kind carries the direction".to_string(),
            ));
        }
        Ok(TransactionDraft {
            occurred_on: req_date(values, "occurred_on", base.map(|b| b.occurred_on.as_str()))?,
            description: req_text(values, "description", base.map(|b| b.description.as_str()))?,
            amount,
            kind,
            category: opt_text(values, "category", base.and_then(|b| b.category.as_deref())),
            customer_id: opt_u64(values, "customer_id", base.and_then(|b| b.customer_id))?,
        })
    }
}

impl FormResource for Invoice {
    fn draft_from(values: &FormValues, base: Option<&Self>) -> Result<InvoiceDraft> {
        values.ensure_known(Self::LABEL, &["customer_id", "issued_on", "due_on", "lines"])?;
        Ok(InvoiceDraft {
            customer_id: req_u64(values, "customer_id", base.map(|b| b.customer_id))?,
            issued_on: req_date(values, "issued_on", base.map(|b| b.issued_on.as_str()))?,
            due_on: req_date(values, "due_on", base.map(|b| b.due_on.as_str()))?,
            lines: lines_field(values, "lines", base.map(|b| &b.lines))?,
        })
    }
}

impl FormResource for Receipt {
    fn draft_from(values: &FormValues, base: Option<&Self>) -> Result<ReceiptDraft> {
        values.ensure_known(
            Self::LABEL,
            &[
                "invoice_id",
                "customer_id",
                "amount",
                "method",
                "received_on",
                "note",
            ],
        )?;
        let method = match values.get("method") {
            Some(v) => PaymentMethod::parse(v).ok_or_else(|| {
                CliError::Validation(format!(
                    "method must be cash, card, transfer or other, got '{}'",
                    v
                ))
            })?,
            None => base
                .map(|b| b.method)
                .ok_or_else(|| CliError::Validation("method is required".to_string()))?,
        };
        Ok(ReceiptDraft {
            invoice_id: opt_u64(values, "invoice_id", base.and_then(|b| b.invoice_id))?,
            customer_id: opt_u64(values, "customer_id", base.and_then(|b| b.customer_id))?,
            amount: req_f64(values, "amount", base.map(|b| b.amount))?,
            method,
            received_on: req_date(values, "received_on", base.map(|b| b.received_on.as_str()))?,
            note: opt_text(values, "note", base.and_then(|b| b.note.as_deref())),
        })
    }
}

impl FormResource for Order {
    fn draft_from(values: &FormValues, base: Option<&Self>) -> Result<OrderDraft> {
        values.ensure_known(Self::LABEL, &["customer_id", "placed_on", "lines"])?;
        Ok(OrderDraft {
            customer_id: req_u64(values, "customer_id", base.map(|b| b.customer_id))?,
            placed_on: req_date(values, "placed_on", base.map(|b| b.placed_on.as_str()))?,
            lines: lines_field(values, "lines", base.map(|b| &b.lines))?,
        })
    }
}

impl FormResource for Account {
    fn draft_from(values: &FormValues, base: Option<&Self>) -> Result<AccountDraft> {
        values.ensure_known(
            Self::LABEL,
            &["username", "email", "role", "password", "active"],
        )?;
        // Password is required on create and optional on edit; an untouched
        // password field keeps the current one server-side.
        let password = match values.get("password") {
            Some(v) if !v.is_empty() => Some(v.to_string()),
            Some(_) => None,
            None if base.is_none() => {
                return Err(CliError::Validation("password is required".to_string()));
            }
            None => None,
        };
        Ok(AccountDraft {
            username: req_text(values, "username", base.map(|b| b.username.as_str()))?,
            email: req_text(values, "email", base.map(|b| b.email.as_str()))?,
            role: req_text(values, "role", base.map(|b| b.role.as_str()))?,
            password,
            active: req_bool(values, "active", base.map(|b| b.active).unwrap_or(true))?,
        })
    }
}

impl FormResource for Role {
    fn draft_from(values: &FormValues, base: Option<&Self>) -> Result<RoleDraft> {
        values.ensure_known(Self::LABEL, &["name", "description", "permissions"])?;
        let permissions = match values.get("permissions") {
            Some(v) => v
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string)
                .collect(),
            None => base.map(|b| b.permissions.clone()).unwrap_or_default(),
        };
        Ok(RoleDraft {
            name: req_text(values, "name", base.map(|b| b.name.as_str()))?,
            description: opt_text(
                values,
                "description",
                base.and_then(|b| b.description.as_deref()),
            ),
            permissions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(input: &str) -> FormValues {
        FormValues::parse(input).unwrap()
    }

    // ==================== Tokenizer ====================

    #[test]
    fn test_parse_plain_and_quoted_values() {
        let v = values("name=\"Office chair\" sku=CH-01 unit_price=120");
        assert_eq!(v.get("name"), Some("Office chair"));
        assert_eq!(v.get("sku"), Some("CH-01"));
        assert_eq!(v.get("unit_price"), Some("120"));
        assert_eq!(v.get("missing"), None);
    }

    #[test]
    fn test_parse_empty_value_is_kept() {
        let v = values("note= amount=5");
        assert_eq!(v.get("note"), Some(""));
        assert_eq!(v.get("amount"), Some("5"));
    }

    #[test]
    fn test_parse_rejects_bare_words() {
        assert!(matches!(
            FormValues::parse("name chair"),
            Err(CliError::Validation(_))
        ));
    }

    #[test]
    fn test_parse_rejects_duplicates_and_unterminated_quotes() {
        assert!(matches!(
            FormValues::parse("name=a name=b"),
            Err(CliError::Validation(_))
        ));
        assert!(matches!(
            FormValues::parse("name=\"unclosed"),
            Err(CliError::Validation(_))
        ));
    }

    // ==================== Product ====================

    #[test]
    fn test_product_create_requires_core_fields() {
        let err = Product::draft_from(&values("name=Desk"), None).unwrap_err();
        assert!(err.to_string().contains("sku is required"));

        let draft = Product::draft_from(
            &values("name=Desk sku=DK-1 unit_price=250 quantity_on_hand=4"),
            None,
        )
        .unwrap();
        assert_eq!(draft.name, "Desk");
        assert_eq!(draft.unit_price, 250.0);
        assert_eq!(draft.description, None);
    }

    #[test]
    fn test_product_rejects_bad_number() {
        let err = Product::draft_from(
            &values("name=Desk sku=DK-1 unit_price=cheap quantity_on_hand=4"),
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("not a number"));
    }

    #[test]
    fn test_product_rejects_unknown_field() {
        let err = Product::draft_from(&values("nmae=Desk"), None).unwrap_err();
        assert!(err.to_string().contains("unknown field 'nmae'"));
    }

    fn base_product() -> Product {
        serde_json::from_value(serde_json::json!({
            "id": 5,
            "name": "Desk",
            "sku": "DK-1",
            "description": "Oak desk",
            "unit_price": 250.0,
            "quantity_on_hand": 4,
            "category": "furniture",
            "created_at": "2026-01-05T09:00:00Z",
            "updated_at": "2026-01-05T09:00:00Z",
        }))
        .unwrap()
    }

    #[test]
    fn test_product_edit_merges_with_base() {
        let draft = Product::draft_from(&values("unit_price=199.5"), Some(&base_product())).unwrap();
        assert_eq!(draft.unit_price, 199.5);
        assert_eq!(draft.name, "Desk");
        assert_eq!(draft.category.as_deref(), Some("furniture"));
    }

    #[test]
    fn test_product_edit_empty_value_clears_optional() {
        let draft = Product::draft_from(&values("category="), Some(&base_product())).unwrap();
        assert_eq!(draft.category, None);
        assert_eq!(draft.description.as_deref(), Some("Oak desk"));
    }

    // ==================== Transaction ====================

    #[test]
    fn test_transaction_kind_and_date_validation() {
        let ok = Transaction::draft_from(
            &values("occurred_on=2026-03-14 description=Rent amount=900 kind=expense"),
            None,
        )
        .unwrap();
        assert_eq!(ok.kind, TransactionKind::Expense);

        let err = Transaction::draft_from(
            &values("occurred_on=14/03/2026 description=Rent amount=900 kind=expense"),
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("YYYY-MM-DD"));

        let err = Transaction::draft_from(
            &values("occurred_on=2026-03-14 description=Rent amount=900 kind=sideways"),
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("income or expense"));
    }

    #[test]
    fn test_transaction_amount_must_be_positive() {
        let err = Transaction::draft_from(
            &values("occurred_on=2026-03-14 description=Rent amount=-900 kind=expense"),
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("positive"));
    }

    // ==================== Invoice / Order lines ====================

    #[test]
    fn test_invoice_lines_mini_format() {
        let draft = Invoice::draft_from(
            &values(
                "customer_id=3 issued_on=2026-08-01 due_on=2026-08-31 \
                 lines=\"Consulting:2:100; Hosting:1:50\"",
            ),
            None,
        )
        .unwrap();
        assert_eq!(draft.lines.len(), 2);
        assert_eq!(draft.lines[0].description, "Consulting");
        assert_eq!(draft.lines[0].quantity, 2.0);
        assert_eq!(draft.lines[1].unit_price, 50.0);
    }

    #[test]
    fn test_invoice_line_errors_name_the_line() {
        let err = Invoice::draft_from(
            &values("customer_id=3 issued_on=2026-08-01 due_on=2026-08-31 lines=Consulting:x:100"),
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_line_description_may_contain_colons() {
        let lines = parse_lines("Support: retainer:1:400").unwrap();
        assert_eq!(lines[0].description, "Support: retainer");
        assert_eq!(lines[0].unit_price, 400.0);
    }

    #[test]
    fn test_order_requires_lines() {
        let err =
            Order::draft_from(&values("customer_id=3 placed_on=2026-08-01"), None).unwrap_err();
        assert!(err.to_string().contains("lines is required"));
    }

    // ==================== Receipt ====================

    #[test]
    fn test_receipt_method_validation() {
        let ok = Receipt::draft_from(
            &values("amount=120 method=card received_on=2026-08-05 invoice_id=9"),
            None,
        )
        .unwrap();
        assert_eq!(ok.method, PaymentMethod::Card);
        assert_eq!(ok.invoice_id, Some(9));

        let err = Receipt::draft_from(
            &values("amount=120 method=barter received_on=2026-08-05"),
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("method must be"));
    }

    // ==================== Account ====================

    #[test]
    fn test_account_password_required_on_create_only() {
        let err = Account::draft_from(
            &values("username=amina email=a@example.com role=admin"),
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("password is required"));

        let base: Account = serde_json::from_value(serde_json::json!({
            "id": 2,
            "username": "amina",
            "email": "a@example.com",
            "role": "admin",
            "active": true,
            "created_at": "2026-01-05T09:00:00Z",
        }))
        .unwrap();

        let draft = Account::draft_from(&values("email=new@example.com"), Some(&base)).unwrap();
        assert_eq!(draft.email, "new@example.com");
        assert_eq!(draft.password, None);
        assert!(draft.active);
    }

    #[test]
    fn test_account_active_flag_parses() {
        let draft = Account::draft_from(
            &values("username=b email=b@example.com role=viewer password=pw active=no"),
            None,
        )
        .unwrap();
        assert!(!draft.active);
    }

    // ==================== Role ====================

    #[test]
    fn test_role_permissions_comma_list() {
        let draft = Role::draft_from(
            &values("name=bookkeeper permissions=\"invoices.read, invoices.write\""),
            None,
        )
        .unwrap();
        assert_eq!(draft.permissions, vec!["invoices.read", "invoices.write"]);
    }
}
