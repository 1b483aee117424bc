//! TAB completion for screen commands and meta-commands.
//!
//! Completes command verbs at the start of the line, screen names after
//! `open`, and field names after `filter`, `sort`, `add` and `edit` using
//! the active screen's columns. The session updates the screen context as
//! the user navigates.

use colored::*;
use rustyline::completion::{Completer, Pair};

use crate::guard::Screen;
use moneta_link::{
    Account, ApiResource, Customer, Invoice, Order, Product, Receipt, Role, Transaction,
};

/// Commands that start a line on any screen.
pub(crate) const COMMAND_VERBS: &[&str] = &[
    "open", "list", "next", "prev", "goto", "filter", "sort", "select", "show", "add", "edit",
    "delete", "bulk-delete", "export", "refresh", "login", "2fa", "logout", "forgot", "reset",
    "say", "history", "status", "summary", "permissions",
];

const META_COMMANDS: &[&str] = &[
    "\\quit",
    "\\q",
    "\\help",
    "\\?",
    "\\config",
    "\\format",
    "\\nav",
    "\\chat-rows",
    "\\whoami",
    "\\show-credentials",
    "\\delete-credentials",
];

/// Display columns for filter/sort completion on a screen.
fn screen_columns(screen: Screen) -> &'static [&'static str] {
    match screen {
        Screen::Products => Product::COLUMNS,
        Screen::Customers => Customer::COLUMNS,
        Screen::Transactions => Transaction::COLUMNS,
        Screen::Invoices => Invoice::COLUMNS,
        Screen::Receipts => Receipt::COLUMNS,
        Screen::Orders => Order::COLUMNS,
        Screen::Users => Account::COLUMNS,
        Screen::Roles => Role::COLUMNS,
        _ => &[],
    }
}

/// Form fields accepted by `add`/`edit` on a screen.
fn screen_form_fields(screen: Screen) -> &'static [&'static str] {
    match screen {
        Screen::Products => &[
            "name",
            "sku",
            "description",
            "unit_price",
            "quantity_on_hand",
            "category",
        ],
        Screen::Customers => &["name", "email", "phone", "address"],
        Screen::Transactions => &[
            "occurred_on",
            "description",
            "amount",
            "kind",
            "category",
            "customer_id",
        ],
        Screen::Invoices => &["customer_id", "issued_on", "due_on", "lines"],
        Screen::Receipts => &[
            "invoice_id",
            "customer_id",
            "amount",
            "method",
            "received_on",
            "note",
        ],
        Screen::Orders => &["customer_id", "placed_on", "lines"],
        Screen::Users => &["username", "email", "role", "password", "active"],
        Screen::Roles => &["name", "description", "permissions"],
        _ => &[],
    }
}

/// Styled completion candidate
#[derive(Debug, Clone)]
pub struct StyledPair {
    /// Display text (with styling)
    display: String,
    /// Replacement text (plain)
    replacement: String,
}

impl StyledPair {
    fn new(text: String, category: CompletionCategory) -> Self {
        let display = match category {
            CompletionCategory::Command => {
                format!("{}  {}", text.blue().bold(), "command".dimmed())
            }
            CompletionCategory::Screen => format!("{}  {}", text.green(), "screen".dimmed()),
            CompletionCategory::Field => format!("{}  {}", text.yellow(), "field".dimmed()),
            CompletionCategory::MetaCommand => {
                format!("{}  {}", text.cyan().bold(), "command".dimmed())
            }
            CompletionCategory::Value => format!("{}  {}", text.magenta(), "value".dimmed()),
        };

        Self {
            display,
            replacement: text,
        }
    }
}

/// Category of completion for styling
#[derive(Debug, Clone, Copy)]
enum CompletionCategory {
    Command,
    Screen,
    Field,
    MetaCommand,
    Value,
}

/// Completion context derived from the words before the cursor
#[derive(Debug, PartialEq)]
enum CompletionContext {
    /// First word of the line
    Verb,
    /// After `open`
    ScreenName,
    /// After `filter` or `sort`
    Column,
    /// After `add` or `edit <id>`
    FormField,
    /// After `export`
    ExportFormat,
    /// After `\format`
    OutputFormat,
    /// After `\nav`
    NavAction,
    /// Nothing sensible to suggest
    None,
}

/// Auto-completer for screen commands
pub struct CommandCompleter {
    /// Active screen, drives field suggestions
    screen: Screen,
}

impl CommandCompleter {
    pub fn new() -> Self {
        Self {
            screen: Screen::Login,
        }
    }

    /// Follow the session onto another screen.
    pub fn set_screen(&mut self, screen: Screen) {
        self.screen = screen;
    }

    fn detect_context(line: &str, start: usize) -> CompletionContext {
        let prefix = line[..start].trim_start();
        if prefix.is_empty() {
            return CompletionContext::Verb;
        }

        let mut words = prefix.split_whitespace();
        let first = words.next().unwrap_or("").to_lowercase();
        let word_count = 1 + words.count();

        match first.as_str() {
            "open" | "o" if word_count == 1 => CompletionContext::ScreenName,
            "filter" | "f" | "sort" => CompletionContext::Column,
            "add" | "new" => CompletionContext::FormField,
            // First argument of edit is the record id
            "edit" if word_count >= 2 => CompletionContext::FormField,
            "export" if word_count == 1 => CompletionContext::ExportFormat,
            "\\format" if word_count == 1 => CompletionContext::OutputFormat,
            "\\nav" if word_count == 1 => CompletionContext::NavAction,
            _ => CompletionContext::None,
        }
    }

    fn get_styled_completions(&self, input: &str, line: &str, start: usize) -> Vec<StyledPair> {
        let input_lower = input.to_lowercase();
        let mut results = Vec::new();

        let context = Self::detect_context(line, start);

        match context {
            CompletionContext::Verb => {
                if input.starts_with('\\') {
                    for cmd in META_COMMANDS {
                        if cmd.starts_with(&input_lower) {
                            results
                                .push(StyledPair::new(cmd.to_string(), CompletionCategory::MetaCommand));
                        }
                    }
                } else {
                    for verb in COMMAND_VERBS {
                        if verb.starts_with(&input_lower) {
                            results.push(StyledPair::new(verb.to_string(), CompletionCategory::Command));
                        }
                    }
                }
            }
            CompletionContext::ScreenName => {
                for screen in crate::guard::ALL_SCREENS {
                    let name = screen.name();
                    if name.starts_with(&input_lower) {
                        results.push(StyledPair::new(name.to_string(), CompletionCategory::Screen));
                    }
                }
            }
            CompletionContext::Column => {
                for col in screen_columns(self.screen) {
                    if col.starts_with(&input_lower) {
                        results.push(StyledPair::new(col.to_string(), CompletionCategory::Field));
                    }
                }
            }
            CompletionContext::FormField => {
                for field in screen_form_fields(self.screen) {
                    if field.starts_with(&input_lower) {
                        results
                            .push(StyledPair::new(format!("{}=", field), CompletionCategory::Field));
                    }
                }
            }
            CompletionContext::ExportFormat => {
                for fmt in ["csv", "pdf"] {
                    if fmt.starts_with(&input_lower) {
                        results.push(StyledPair::new(fmt.to_string(), CompletionCategory::Value));
                    }
                }
            }
            CompletionContext::OutputFormat => {
                for fmt in ["table", "json", "csv"] {
                    if fmt.starts_with(&input_lower) {
                        results.push(StyledPair::new(fmt.to_string(), CompletionCategory::Value));
                    }
                }
            }
            CompletionContext::NavAction => {
                for action in ["show", "collapse", "expand", "move"] {
                    if action.starts_with(&input_lower) {
                        results.push(StyledPair::new(action.to_string(), CompletionCategory::Value));
                    }
                }
            }
            CompletionContext::None => {}
        }

        results.sort_by(|a, b| a.replacement.cmp(&b.replacement));
        results.dedup_by(|a, b| a.replacement == b.replacement);
        results
    }
}

impl Default for CommandCompleter {
    fn default() -> Self {
        Self::new()
    }
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        // Current word starts after the last whitespace before the cursor
        let start = line[..pos]
            .rfind(|c: char| c.is_whitespace())
            .map(|i| i + 1)
            .unwrap_or(0);

        let word = &line[start..pos];
        let styled_completions = self.get_styled_completions(word, line, start);

        let pairs: Vec<Pair> = styled_completions
            .into_iter()
            .map(|s| Pair {
                display: s.display,
                replacement: s.replacement,
            })
            .collect();

        Ok((start, pairs))
    }
}
