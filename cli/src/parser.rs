//! Command parser for screen and backslash commands
//!
//! Two families of input: screen commands (`open`, `filter`, `add`, ...) that
//! act on whatever screen is current, and backslash meta commands (`\help`,
//! `\format`, `\nav`, ...) that act on the shell itself. Parsing is pure; the
//! session decides what a screen command means on the current screen.

use moneta_link::{ExportFormat, SortOrder};

use crate::error::{CliError, Result};

/// Bulk-select targets for the `select` command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectTarget {
    Id(u64),
    All,
    None,
}

/// Sidebar actions for the `\nav` meta command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Show,
    Collapse,
    Expand,
    Move { from: usize, to: usize },
}

/// Parsed command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Switch to another screen
    Open(String),

    // List screen commands
    List,
    Next,
    Prev,
    Goto(u32),
    Filter(Option<String>),
    Sort {
        field: Option<String>,
        order: SortOrder,
    },
    Select(SelectTarget),
    Show(u64),
    Add(String),
    Edit {
        id: u64,
        rest: String,
    },
    Delete(u64),
    BulkDelete,
    Export(ExportFormat),
    Refresh,

    // Auth flow
    Login {
        username: Option<String>,
        remember: bool,
    },
    TwoFactor {
        code: String,
        backup: bool,
    },
    Logout,
    ForgotPassword(String),
    ResetPassword {
        token: String,
        new_password: String,
    },

    // Chat screen
    Send(String),
    History,
    Status,

    // Reports screen
    Summary {
        from: String,
        to: String,
    },

    /// List the permission catalog
    Permissions,

    // Meta-commands (backslash commands)
    Quit,
    Help,
    Config,
    SetFormat(String),
    Nav(NavAction),
    ChatRows(u16),
    WhoAmI,
    ShowCredentials,
    DeleteCredentials,
    Unknown(String),
}

/// Command parser
pub struct CommandParser;

impl CommandParser {
    /// Create a new parser
    pub fn new() -> Self {
        Self
    }

    /// Parse a command line
    pub fn parse(&self, line: &str) -> Result<Command> {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            return Err(CliError::Parse("Empty command".into()));
        }

        // Check for backslash commands
        if trimmed.starts_with('\\') {
            return self.parse_meta_command(trimmed);
        }

        self.parse_screen_command(trimmed)
    }

    /// Parse screen commands (first word selects the verb)
    fn parse_screen_command(&self, line: &str) -> Result<Command> {
        let (word, rest) = split_word(line);

        match word.to_lowercase().as_str() {
            "open" | "o" => {
                let target = required(rest, "usage: open <screen>")?;
                Ok(Command::Open(target.to_string()))
            }
            "list" | "ls" => Ok(Command::List),
            "next" | "n" => Ok(Command::Next),
            "prev" | "p" => Ok(Command::Prev),
            "goto" | "g" => {
                let target = required(rest, "usage: goto <page>")?;
                let page: u32 = target
                    .parse()
                    .map_err(|_| CliError::Parse(format!("'{}' is not a page number", target)))?;
                Ok(Command::Goto(page))
            }
            "filter" | "f" => {
                if rest.is_empty() {
                    Ok(Command::Filter(None))
                } else {
                    Ok(Command::Filter(Some(rest.to_string())))
                }
            }
            "sort" => {
                let mut parts = rest.split_whitespace();
                match parts.next() {
                    None => Ok(Command::Sort {
                        field: None,
                        order: SortOrder::Asc,
                    }),
                    Some(field) => {
                        let order = parts
                            .next()
                            .map(SortOrder::parse)
                            .unwrap_or(SortOrder::Asc);
                        if parts.next().is_some() {
                            return Err(CliError::Parse(
                                "usage: sort [<field> [asc|desc]]".to_string(),
                            ));
                        }
                        Ok(Command::Sort {
                            field: Some(field.to_string()),
                            order,
                        })
                    }
                }
            }
            "select" | "sel" => {
                let target = required(rest, "usage: select <id>|all|none")?;
                match target.to_lowercase().as_str() {
                    "all" => Ok(Command::Select(SelectTarget::All)),
                    "none" => Ok(Command::Select(SelectTarget::None)),
                    _ => {
                        let id: u64 = target.parse().map_err(|_| {
                            CliError::Parse(format!("'{}' is not a record id", target))
                        })?;
                        Ok(Command::Select(SelectTarget::Id(id)))
                    }
                }
            }
            "show" => Ok(Command::Show(parse_id(rest, "usage: show <id>")?)),
            "add" | "new" => {
                let fields = required(rest, "usage: add <field>=<value> ...")?;
                Ok(Command::Add(fields.to_string()))
            }
            "edit" => {
                let (id_str, fields) = split_word(rest);
                let id = parse_id(id_str, "usage: edit <id> <field>=<value> ...")?;
                let fields = required(fields, "usage: edit <id> <field>=<value> ...")?;
                Ok(Command::Edit {
                    id,
                    rest: fields.to_string(),
                })
            }
            "delete" | "del" | "rm" => Ok(Command::Delete(parse_id(rest, "usage: delete <id>")?)),
            "bulk-delete" | "bd" => Ok(Command::BulkDelete),
            "export" => {
                let target = required(rest, "usage: export csv|pdf")?;
                let format = ExportFormat::parse(target).ok_or_else(|| {
                    CliError::Parse(format!("unknown export format '{}'", target))
                })?;
                Ok(Command::Export(format))
            }
            "refresh" | "r" => Ok(Command::Refresh),
            "login" => {
                let mut username = None;
                let mut remember = false;
                for part in rest.split_whitespace() {
                    match part {
                        "--remember" | "remember" => remember = true,
                        other if username.is_none() => username = Some(other.to_string()),
                        other => {
                            return Err(CliError::Parse(format!(
                                "unexpected argument '{}'; usage: login [username] [remember]",
                                other
                            )));
                        }
                    }
                }
                Ok(Command::Login { username, remember })
            }
            "2fa" | "verify" => {
                let mut parts = rest.split_whitespace();
                let first = parts
                    .next()
                    .ok_or_else(|| CliError::Parse("usage: 2fa [backup] <code>".to_string()))?;
                let (backup, code) = if first.eq_ignore_ascii_case("backup") {
                    let code = parts
                        .next()
                        .ok_or_else(|| CliError::Parse("usage: 2fa backup <code>".to_string()))?;
                    (true, code)
                } else {
                    (false, first)
                };
                if parts.next().is_some() {
                    return Err(CliError::Parse("usage: 2fa [backup] <code>".to_string()));
                }
                Ok(Command::TwoFactor {
                    code: code.to_string(),
                    backup,
                })
            }
            "logout" => Ok(Command::Logout),
            "forgot" => {
                let email = required(rest, "usage: forgot <email>")?;
                Ok(Command::ForgotPassword(email.to_string()))
            }
            "reset" => {
                let (token, new_password) = split_word(rest);
                if token.is_empty() || new_password.is_empty() {
                    return Err(CliError::Parse(
                        "usage: reset <token> <new-password>".to_string(),
                    ));
                }
                Ok(Command::ResetPassword {
                    token: token.to_string(),
                    new_password: new_password.to_string(),
                })
            }
            "send" | "say" => {
                let body = required(rest, "usage: send <message>")?;
                Ok(Command::Send(body.to_string()))
            }
            "history" => Ok(Command::History),
            "status" => Ok(Command::Status),
            "summary" => {
                let mut parts = rest.split_whitespace();
                let (from, to) = match (parts.next(), parts.next(), parts.next()) {
                    (Some(from), Some(to), None) => (from, to),
                    _ => {
                        return Err(CliError::Parse(
                            "usage: summary <from> <to> (dates as YYYY-MM-DD)".to_string(),
                        ));
                    }
                };
                Ok(Command::Summary {
                    from: from.to_string(),
                    to: to.to_string(),
                })
            }
            "permissions" | "perms" => Ok(Command::Permissions),
            "quit" | "exit" => Ok(Command::Quit),
            "help" => Ok(Command::Help),
            other => Err(CliError::Parse(format!(
                "unknown command '{}'; try \\help",
                other
            ))),
        }
    }

    /// Parse meta-commands (backslash commands)
    fn parse_meta_command(&self, line: &str) -> Result<Command> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let command = parts[0];
        let args = parts.get(1..).unwrap_or(&[]);

        match command {
            "\\quit" | "\\q" => Ok(Command::Quit),
            "\\help" | "\\h" | "\\?" => Ok(Command::Help),
            "\\config" => Ok(Command::Config),
            "\\format" => {
                if args.is_empty() {
                    Err(CliError::Parse(
                        "\\format requires: table, json, or csv".into(),
                    ))
                } else {
                    Ok(Command::SetFormat(args[0].to_string()))
                }
            }
            "\\nav" => self.parse_nav_command(args),
            "\\chat-rows" => {
                let rows = args
                    .first()
                    .ok_or_else(|| CliError::Parse("\\chat-rows requires a row count".into()))?;
                let rows: u16 = rows
                    .parse()
                    .map_err(|_| CliError::Parse(format!("'{}' is not a row count", rows)))?;
                if rows == 0 {
                    return Err(CliError::Parse("row count must be at least 1".into()));
                }
                Ok(Command::ChatRows(rows))
            }
            "\\whoami" | "\\info" => Ok(Command::WhoAmI),
            "\\show-credentials" | "\\credentials" => Ok(Command::ShowCredentials),
            "\\delete-credentials" => Ok(Command::DeleteCredentials),
            _ => Ok(Command::Unknown(command.to_string())),
        }
    }

    /// Parse `\nav` subcommands
    fn parse_nav_command(&self, args: &[&str]) -> Result<Command> {
        match args.first() {
            None => Ok(Command::Nav(NavAction::Show)),
            Some(&"collapse") => Ok(Command::Nav(NavAction::Collapse)),
            Some(&"expand") => Ok(Command::Nav(NavAction::Expand)),
            Some(&"move") => {
                let (from, to) = match (args.get(1), args.get(2), args.get(3)) {
                    (Some(from), Some(to), None) => (from, to),
                    _ => {
                        return Err(CliError::Parse("usage: \\nav move <from> <to>".to_string()));
                    }
                };
                let from: usize = from
                    .parse()
                    .map_err(|_| CliError::Parse(format!("'{}' is not a position", from)))?;
                let to: usize = to
                    .parse()
                    .map_err(|_| CliError::Parse(format!("'{}' is not a position", to)))?;
                Ok(Command::Nav(NavAction::Move { from, to }))
            }
            Some(other) => Err(CliError::Parse(format!(
                "unknown nav action '{}'; usage: \\nav [collapse|expand|move <from> <to>]",
                other
            ))),
        }
    }
}

impl Default for CommandParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Split off the first whitespace-delimited word; the rest keeps its spacing
fn split_word(input: &str) -> (&str, &str) {
    let input = input.trim();
    match input.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (input, ""),
    }
}

fn required<'a>(value: &'a str, usage: &str) -> Result<&'a str> {
    if value.is_empty() {
        Err(CliError::Parse(usage.to_string()))
    } else {
        Ok(value)
    }
}

fn parse_id(value: &str, usage: &str) -> Result<u64> {
    let value = required(value, usage)?;
    value
        .parse()
        .map_err(|_| CliError::Parse(format!("'{}' is not a record id", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Command> {
        CommandParser::new().parse(line)
    }

    #[test]
    fn test_empty_command() {
        assert!(parse("").is_err());
        assert!(parse("   ").is_err());
    }

    #[test]
    fn test_open_and_aliases() {
        assert_eq!(
            parse("open products").unwrap(),
            Command::Open("products".into())
        );
        assert_eq!(
            parse("o invoices").unwrap(),
            Command::Open("invoices".into())
        );
        assert!(matches!(parse("open"), Err(CliError::Parse(_))));
    }

    #[test]
    fn test_paging_commands() {
        assert_eq!(parse("next").unwrap(), Command::Next);
        assert_eq!(parse("p").unwrap(), Command::Prev);
        assert_eq!(parse("goto 4").unwrap(), Command::Goto(4));
        assert!(matches!(parse("goto four"), Err(CliError::Parse(_))));
    }

    #[test]
    fn test_filter_with_and_without_argument() {
        assert_eq!(parse("filter").unwrap(), Command::Filter(None));
        assert_eq!(
            parse("filter category=furniture").unwrap(),
            Command::Filter(Some("category=furniture".into()))
        );
        assert_eq!(
            parse("filter office chair").unwrap(),
            Command::Filter(Some("office chair".into()))
        );
    }

    #[test]
    fn test_sort_variants() {
        assert_eq!(
            parse("sort").unwrap(),
            Command::Sort {
                field: None,
                order: SortOrder::Asc
            }
        );
        assert_eq!(
            parse("sort name").unwrap(),
            Command::Sort {
                field: Some("name".into()),
                order: SortOrder::Asc
            }
        );
        assert_eq!(
            parse("sort unit_price desc").unwrap(),
            Command::Sort {
                field: Some("unit_price".into()),
                order: SortOrder::Desc
            }
        );
        assert!(matches!(parse("sort a b c"), Err(CliError::Parse(_))));
    }

    #[test]
    fn test_select_targets() {
        assert_eq!(
            parse("select 7").unwrap(),
            Command::Select(SelectTarget::Id(7))
        );
        assert_eq!(
            parse("select all").unwrap(),
            Command::Select(SelectTarget::All)
        );
        assert_eq!(
            parse("select none").unwrap(),
            Command::Select(SelectTarget::None)
        );
        assert!(matches!(parse("select x"), Err(CliError::Parse(_))));
    }

    #[test]
    fn test_add_and_edit_keep_raw_fields() {
        assert_eq!(
            parse("add name=\"Office chair\" sku=CH-01").unwrap(),
            Command::Add("name=\"Office chair\" sku=CH-01".into())
        );
        assert_eq!(
            parse("edit 12 unit_price=99.5").unwrap(),
            Command::Edit {
                id: 12,
                rest: "unit_price=99.5".into()
            }
        );
        assert!(matches!(parse("edit 12"), Err(CliError::Parse(_))));
        assert!(matches!(parse("edit nope x=1"), Err(CliError::Parse(_))));
    }

    #[test]
    fn test_delete_and_bulk_delete() {
        assert_eq!(parse("delete 3").unwrap(), Command::Delete(3));
        assert_eq!(parse("rm 3").unwrap(), Command::Delete(3));
        assert_eq!(parse("bulk-delete").unwrap(), Command::BulkDelete);
        assert_eq!(parse("bd").unwrap(), Command::BulkDelete);
    }

    #[test]
    fn test_export_formats() {
        assert_eq!(
            parse("export csv").unwrap(),
            Command::Export(ExportFormat::Csv)
        );
        assert_eq!(
            parse("export PDF").unwrap(),
            Command::Export(ExportFormat::Pdf)
        );
        assert!(matches!(parse("export xlsx"), Err(CliError::Parse(_))));
    }

    #[test]
    fn test_login_variants() {
        assert_eq!(
            parse("login").unwrap(),
            Command::Login {
                username: None,
                remember: false
            }
        );
        assert_eq!(
            parse("login amina").unwrap(),
            Command::Login {
                username: Some("amina".into()),
                remember: false
            }
        );
        assert_eq!(
            parse("login amina remember").unwrap(),
            Command::Login {
                username: Some("amina".into()),
                remember: true
            }
        );
        assert_eq!(
            parse("login --remember amina").unwrap(),
            Command::Login {
                username: Some("amina".into()),
                remember: true
            }
        );
        assert!(matches!(parse("login a b"), Err(CliError::Parse(_))));
    }

    #[test]
    fn test_two_factor_code_and_backup() {
        assert_eq!(
            parse("2fa 123456").unwrap(),
            Command::TwoFactor {
                code: "123456".into(),
                backup: false
            }
        );
        assert_eq!(
            parse("2fa backup 9f3a-11bc").unwrap(),
            Command::TwoFactor {
                code: "9f3a-11bc".into(),
                backup: true
            }
        );
        assert!(matches!(parse("2fa"), Err(CliError::Parse(_))));
        assert!(matches!(parse("2fa backup"), Err(CliError::Parse(_))));
    }

    #[test]
    fn test_password_reset_flow() {
        assert_eq!(
            parse("forgot amina@example.com").unwrap(),
            Command::ForgotPassword("amina@example.com".into())
        );
        assert_eq!(
            parse("reset tok-123 s3cret!").unwrap(),
            Command::ResetPassword {
                token: "tok-123".into(),
                new_password: "s3cret!".into()
            }
        );
        assert!(matches!(parse("reset tok-123"), Err(CliError::Parse(_))));
    }

    #[test]
    fn test_chat_commands() {
        assert_eq!(
            parse("send is my invoice overdue?").unwrap(),
            Command::Send("is my invoice overdue?".into())
        );
        assert_eq!(parse("history").unwrap(), Command::History);
        assert_eq!(parse("status").unwrap(), Command::Status);
    }

    #[test]
    fn test_summary_needs_two_dates() {
        assert_eq!(
            parse("summary 2026-01-01 2026-06-30").unwrap(),
            Command::Summary {
                from: "2026-01-01".into(),
                to: "2026-06-30".into()
            }
        );
        assert!(matches!(
            parse("summary 2026-01-01"),
            Err(CliError::Parse(_))
        ));
    }

    #[test]
    fn test_permissions_and_alias() {
        assert_eq!(parse("permissions").unwrap(), Command::Permissions);
        assert_eq!(parse("perms").unwrap(), Command::Permissions);
    }

    #[test]
    fn test_meta_commands() {
        assert_eq!(parse("\\q").unwrap(), Command::Quit);
        assert_eq!(parse("\\help").unwrap(), Command::Help);
        assert_eq!(
            parse("\\format json").unwrap(),
            Command::SetFormat("json".into())
        );
        assert_eq!(parse("\\whoami").unwrap(), Command::WhoAmI);
        assert_eq!(parse("\\chat-rows 12").unwrap(), Command::ChatRows(12));
        assert!(matches!(parse("\\chat-rows 0"), Err(CliError::Parse(_))));
    }

    #[test]
    fn test_nav_meta_actions() {
        assert_eq!(parse("\\nav").unwrap(), Command::Nav(NavAction::Show));
        assert_eq!(
            parse("\\nav collapse").unwrap(),
            Command::Nav(NavAction::Collapse)
        );
        assert_eq!(
            parse("\\nav expand").unwrap(),
            Command::Nav(NavAction::Expand)
        );
        assert_eq!(
            parse("\\nav move 3 1").unwrap(),
            Command::Nav(NavAction::Move { from: 3, to: 1 })
        );
        assert!(matches!(parse("\\nav move 3"), Err(CliError::Parse(_))));
    }

    #[test]
    fn test_parse_unknown_meta() {
        let cmd = parse("\\unknown").unwrap();
        assert_eq!(cmd, Command::Unknown("\\unknown".to_string()));
    }

    #[test]
    fn test_unknown_command_mentions_help() {
        let err = parse("frobnicate").unwrap_err();
        assert!(err.to_string().contains("\\help"));
    }
}
