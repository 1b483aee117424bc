//! Interactive shell session
//!
//! Owns the session store, the current screen, the per-screen list state,
//! the sidebar, and the support chat, and drives the readline loop that
//! dispatches parsed commands against them. Screen-specific handlers live
//! in the submodules.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use log::warn;
use moneta_link::{
    Account, ChatClient, Customer, Invoice, LoginOutcome, Order, PresenceSim, Product, Receipt,
    ReportSummary, Role, SessionState, SessionStore, Transaction,
};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Cmd, CompletionType, Config, EditMode, Editor, Helper, KeyEvent};

use crate::{
    completer::CommandCompleter,
    config::CliConfiguration,
    credentials::FileCredentialStore,
    error::{CliError, Result},
    formatter::{OutputFormat, OutputFormatter},
    guard::{Access, RouteGuard, Screen, ALL_SCREENS},
    history::{CommandHistory, DEFAULT_HISTORY_SIZE},
    nav::NavMenu,
    pages::PageState,
    parser::{Command, CommandParser, NavAction},
    prefs::UiPrefs,
    CLI_VERSION,
};

mod chat;
mod info;
mod reports;
mod resources;

/// Pause before an expired session lands back on the sign-in screen, long
/// enough to read the message
const LOGIN_REDIRECT_DELAY: Duration = Duration::from_millis(1500);

/// Interactive shell state
pub struct CliSession {
    /// Session store owning the API client and the auth state machine
    session: SessionStore<FileCredentialStore>,
    /// Screen currently shown
    screen: Screen,
    /// Sidebar order and collapsed state
    nav: NavMenu,
    /// Durable UI preferences backing the sidebar and the chat panel
    prefs: UiPrefs,
    /// Where preferences are persisted
    prefs_path: PathBuf,
    /// Command parser
    parser: CommandParser,
    /// Record formatter
    formatter: OutputFormatter,
    /// Whether colors are enabled
    color: bool,
    /// Whether spinners are shown while requests run
    animations: bool,
    /// Loaded configuration
    config: CliConfiguration,
    /// Path the configuration was loaded from
    config_path: PathBuf,
    /// Host portion of the server URL, for the prompt
    server_host: String,

    // One list state per resource screen; pagination, filters, sort, and
    // bulk selection survive screen switches.
    products: PageState<Product>,
    customers: PageState<Customer>,
    transactions: PageState<Transaction>,
    invoices: PageState<Invoice>,
    receipts: PageState<Receipt>,
    orders: PageState<Order>,
    accounts: PageState<Account>,
    roles: PageState<Role>,

    /// Chat origin override; the API origin is used when unset
    chat_url: Option<String>,
    /// Lazily created chat client
    chat: Option<ChatClient>,
    /// When the chat was first opened, for the presence simulation
    chat_opened_at: Option<Instant>,
    /// Simulated agent presence
    presence: PresenceSim,
    /// Newest chat message already rendered
    last_seen_chat_id: Option<u64>,

    /// Summary shown on the reports screen, kept for exports
    last_summary: Option<ReportSummary>,

    /// Pause before bouncing an expired session to the sign-in screen
    login_redirect_delay: Duration,
    /// Session start, for `\whoami` uptime
    connected_at: Instant,
    /// Commands executed this session
    commands_executed: u64,
}

impl CliSession {
    /// Create a session shell around an already-resolved session store
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        session: SessionStore<FileCredentialStore>,
        format: OutputFormat,
        color: bool,
        animations: bool,
        page_size: u32,
        chat_url: Option<String>,
        config: CliConfiguration,
        config_path: PathBuf,
        prefs_path: PathBuf,
    ) -> Self {
        let prefs = UiPrefs::load(&prefs_path);
        let nav = NavMenu::from_prefs(&prefs);
        let screen = Self::initial_screen(session.state());
        let server_host = Self::extract_host(session.client().base_url());

        Self {
            formatter: OutputFormatter::new(format, color),
            parser: CommandParser::new(),
            products: PageState::new(page_size),
            customers: PageState::new(page_size),
            transactions: PageState::new(page_size),
            invoices: PageState::new(page_size),
            receipts: PageState::new(page_size),
            orders: PageState::new(page_size),
            accounts: PageState::new(page_size),
            roles: PageState::new(page_size),
            chat: None,
            chat_opened_at: None,
            presence: PresenceSim::new(PresenceSim::DEFAULT_PERIOD),
            last_seen_chat_id: None,
            last_summary: None,
            login_redirect_delay: LOGIN_REDIRECT_DELAY,
            connected_at: Instant::now(),
            commands_executed: 0,
            session,
            screen,
            nav,
            prefs,
            prefs_path,
            color,
            animations,
            chat_url,
            config,
            config_path,
            server_host,
        }
    }

    /// Screen to land on given the session state at startup
    fn initial_screen(state: &SessionState) -> Screen {
        match state {
            SessionState::Authenticated { .. } => Screen::Home,
            SessionState::TwoFactorPending { .. } => Screen::TwoFactor,
            SessionState::Anonymous => Screen::Login,
        }
    }

    /// Host portion of a URL, for the prompt
    fn extract_host(url: &str) -> String {
        let stripped = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"))
            .unwrap_or(url);
        stripped.trim_end_matches('/').to_string()
    }

    /// Screen currently shown
    pub fn screen(&self) -> Screen {
        self.screen
    }

    /// The underlying session store
    pub fn session(&self) -> &SessionStore<FileCredentialStore> {
        &self.session
    }

    /// Execute a `;`-separated batch, as passed to `--command`
    ///
    /// Separators inside quotes are left alone so form values like
    /// `add name="a;b"` survive. The batch stops at the first error.
    pub async fn execute_batch(&mut self, commands: &str) -> Result<()> {
        for piece in split_commands(commands) {
            let piece = piece.trim();
            if piece.is_empty() {
                continue;
            }
            let command = self.parser.parse(piece)?;
            if matches!(command, Command::Quit) {
                break;
            }
            self.execute_command(command).await?;
        }
        Ok(())
    }

    /// Run the interactive readline loop with autocomplete
    pub async fn run_interactive(&mut self) -> Result<()> {
        self.print_banner();
        if self.session.is_authenticated() {
            self.print_nav();
        }

        let helper = CliHelper::new(CommandCompleter::new());

        let config = Config::builder()
            .completion_type(CompletionType::List)
            .completion_prompt_limit(100)
            .edit_mode(EditMode::Emacs)
            .auto_add_history(false)
            .build();

        let mut rl = Editor::<CliHelper, DefaultHistory>::with_config(config)?;
        rl.set_helper(Some(helper));
        rl.bind_sequence(KeyEvent::from('\t'), Cmd::Complete);

        let history = CommandHistory::new(DEFAULT_HISTORY_SIZE);
        if let Ok(entries) = history.load() {
            for entry in entries {
                let _ = rl.add_history_entry(&entry);
            }
        }

        match self.screen {
            Screen::Login => {
                println!("{}", "Sign in with: login <username> [remember]".dimmed());
            }
            Screen::TwoFactor => {
                println!("{}", "Enter the one-time code with: 2fa <code>".dimmed());
            }
            _ => {}
        }

        loop {
            // Completion candidates depend on the screen (column names,
            // form fields), so resync before every line.
            if let Some(helper) = rl.helper_mut() {
                helper.completer.set_screen(self.screen);
            }

            match rl.readline(&self.primary_prompt()) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }

                    // 2fa codes and reset tokens never reach the history file
                    if crate::history::should_persist_command(line) {
                        let _ = rl.add_history_entry(line);
                        let _ = history.append(line);
                    }

                    match self.parser.parse(line) {
                        Ok(Command::Quit) => {
                            println!("{}", "Goodbye!".cyan());
                            break;
                        }
                        Ok(command) => {
                            if let Err(e) = self.execute_command(command).await {
                                eprintln!("{}", format!("✗ {}", e).red());
                            }
                        }
                        Err(e) => {
                            eprintln!("{}", format!("✗ {}", e).red());
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("{}", "Use \\quit or \\q to exit".dimmed());
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!("\n{}", "Goodbye!".cyan());
                    break;
                }
                Err(err) => {
                    eprintln!("{}", format!("✗ {}", err).red());
                    break;
                }
            }
        }

        Ok(())
    }

    /// Execute one parsed command
    ///
    /// When a request on an authenticated session comes back with an auth
    /// error the token has expired server-side; the session is dropped and
    /// the shell lands on the sign-in screen after a short pause. A failed
    /// sign-in attempt is an ordinary error, not an expiry.
    pub async fn execute_command(&mut self, command: Command) -> Result<()> {
        self.commands_executed += 1;
        let was_authenticated = self.session.is_authenticated();

        match self.dispatch(command).await {
            Err(e) if e.is_auth_error() && was_authenticated => {
                self.expire_session(&e).await;
                Ok(())
            }
            other => other,
        }
    }

    /// Route a command to its handler
    async fn dispatch(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Open(name) => self.open_screen(&name).await,
            Command::Login { username, remember } => self.handle_login(username, remember).await,
            Command::TwoFactor { code, backup } => self.handle_two_factor(&code, backup).await,
            Command::Logout => self.handle_logout().await,
            Command::ForgotPassword(email) => self.handle_forgot_password(&email).await,
            Command::ResetPassword {
                token,
                new_password,
            } => self.handle_reset_password(&token, &new_password).await,
            Command::Send(body) => self.chat_send(&body).await,
            Command::History => self.chat_history().await,
            Command::Status => self.chat_status(),
            Command::Summary { from, to } => self.run_summary(&from, &to).await,
            Command::Permissions => self.show_permissions().await,
            Command::Quit => {
                println!("{}", "Goodbye!".cyan());
                std::process::exit(0);
            }
            Command::Help => {
                self.show_help();
                Ok(())
            }
            Command::Config => {
                self.show_config();
                Ok(())
            }
            Command::SetFormat(format) => {
                self.switch_format(&format);
                Ok(())
            }
            Command::Nav(action) => self.handle_nav(action),
            Command::ChatRows(rows) => self.set_chat_rows(rows),
            Command::WhoAmI => {
                self.show_whoami();
                Ok(())
            }
            Command::ShowCredentials => self.show_credentials(),
            Command::DeleteCredentials => self.delete_stored_credentials(),
            Command::Unknown(cmd) => {
                eprintln!("Unknown command: {}. Type \\help for help.", cmd);
                Ok(())
            }
            other => self.run_screen_command(other).await,
        }
    }

    /// An authenticated request came back unauthorized: the token is dead.
    /// Drop the session and land on the sign-in screen, the way the browser
    /// shell bounces to the login route.
    async fn expire_session(&mut self, error: &CliError) {
        eprintln!("{}", format!("✗ {}", error).red());
        println!("{}", "Session expired. Redirecting to sign-in...".yellow());
        tokio::time::sleep(self.login_redirect_delay).await;
        self.session.invalidate();
        self.screen = Screen::Login;
    }

    /// Dispatch a list-screen command against the current screen
    async fn run_screen_command(&mut self, command: Command) -> Result<()> {
        // The reports screen exports the last summary, not a collection
        if self.screen == Screen::Reports {
            if let Command::Export(format) = command {
                return self.export_report(format).await;
            }
            return Err(CliError::Parse(
                "reports commands: summary <from> <to>, export csv|pdf".to_string(),
            ));
        }

        match self.screen {
            Screen::Products => self.resource_command::<Product>(command).await,
            Screen::Customers => self.resource_command::<Customer>(command).await,
            Screen::Transactions => self.resource_command::<Transaction>(command).await,
            Screen::Invoices => self.resource_command::<Invoice>(command).await,
            Screen::Receipts => self.resource_command::<Receipt>(command).await,
            Screen::Orders => self.resource_command::<Order>(command).await,
            Screen::Users => self.resource_command::<Account>(command).await,
            Screen::Roles => self.resource_command::<Role>(command).await,
            Screen::Chat => Err(CliError::Parse(
                "chat commands: say <message>, history, status".to_string(),
            )),
            _ => Err(CliError::Parse(format!(
                "the {} screen has no record list; open one of the list screens first",
                self.screen.label()
            ))),
        }
    }

    /// Sign in with a password, prompting for anything not on the line
    async fn handle_login(&mut self, username: Option<String>, remember: bool) -> Result<()> {
        if self.session.is_authenticated() {
            println!(
                "{}",
                "Already signed in. Use logout first to switch accounts.".yellow()
            );
            return Ok(());
        }

        let username = match username {
            Some(u) => u,
            None => {
                print!("Username: ");
                std::io::Write::flush(&mut std::io::stdout())?;
                let mut buf = String::new();
                std::io::stdin().read_line(&mut buf)?;
                let trimmed = buf.trim().to_string();
                if trimmed.is_empty() {
                    return Err(CliError::Validation("a username is required".to_string()));
                }
                trimmed
            }
        };

        let password = rpassword::prompt_password("Password: ")
            .map_err(|e| CliError::Readline(e.to_string()))?;

        let pb = self.spinner("Signing in...");
        let result = self.session.login(&username, &password, remember).await;
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }

        match result? {
            LoginOutcome::Authenticated => {
                println!("{}", format!("✓ Signed in as {}", username).green());
                self.screen = Screen::Home;
                self.print_nav();
                Ok(())
            }
            LoginOutcome::TwoFactorRequired => {
                self.screen = Screen::TwoFactor;
                println!(
                    "{}",
                    "A one-time code is required. Enter it with: 2fa <code>".yellow()
                );
                println!(
                    "{}",
                    "Lost your device? Use a backup code: 2fa backup <code>".dimmed()
                );
                Ok(())
            }
        }
    }

    /// Finish a pending two-factor sign-in
    async fn handle_two_factor(&mut self, code: &str, backup: bool) -> Result<()> {
        if !self.session.is_two_factor_pending() {
            return Err(CliError::Validation(
                "no two-factor challenge is pending; sign in first".to_string(),
            ));
        }

        let pb = self.spinner("Verifying code...");
        let result = self.session.complete_two_factor(code, backup).await;
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
        result?;

        let username = self.session.current_username().unwrap_or("?").to_string();
        println!("{}", format!("✓ Signed in as {}", username).green());
        self.screen = Screen::Home;
        self.print_nav();
        Ok(())
    }

    /// Sign out and clear stored credentials
    async fn handle_logout(&mut self) -> Result<()> {
        if !self.session.is_authenticated() && !self.session.is_two_factor_pending() {
            println!("{}", "Not signed in.".dimmed());
            return Ok(());
        }
        self.session.logout().await;
        self.screen = Screen::Login;
        println!("{}", "Signed out.".green());
        Ok(())
    }

    /// Request a password reset link
    async fn handle_forgot_password(&mut self, email: &str) -> Result<()> {
        let pb = self.spinner("Requesting reset...");
        let result = self.session.client().request_password_reset(email).await;
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
        result?;
        // Same wording whether the address exists or not
        println!("If the address exists, a reset link is on its way to {}", email);
        Ok(())
    }

    /// Set a new password with a reset token
    async fn handle_reset_password(&mut self, token: &str, new_password: &str) -> Result<()> {
        let pb = self.spinner("Resetting password...");
        let result = self
            .session
            .client()
            .confirm_password_reset(token, new_password)
            .await;
        if let Some(pb) = pb {
            pb.finish_and_clear();
        }
        result?;
        println!(
            "{}",
            "✓ Password updated. Sign in with the new password.".green()
        );
        self.screen = Screen::Login;
        Ok(())
    }

    /// Switch screens by name, running the route guard first
    async fn open_screen(&mut self, name: &str) -> Result<()> {
        let screen = Screen::parse(name).ok_or_else(|| {
            CliError::Parse(format!(
                "unknown screen '{}'. Screens: {}",
                name,
                ALL_SCREENS
                    .iter()
                    .map(|s| s.name())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })?;
        self.goto_screen(screen).await
    }

    /// Enter a screen the guard allows; protected screens bounce anonymous
    /// sessions to the sign-in screen before any state is touched
    async fn goto_screen(&mut self, screen: Screen) -> Result<()> {
        match RouteGuard::check(screen, &self.session) {
            Access::Granted => {}
            Access::Redirect(target) => {
                println!("{}", format!("Sign in to view {}.", screen.label()).yellow());
                self.screen = target;
                return Ok(());
            }
        }

        self.screen = screen;
        if self.session.is_authenticated() {
            self.print_nav();
        }

        match screen {
            Screen::Home => {
                self.show_home();
                Ok(())
            }
            Screen::Products => self.refetch::<Product>(true).await,
            Screen::Customers => self.refetch::<Customer>(true).await,
            Screen::Transactions => self.refetch::<Transaction>(true).await,
            Screen::Invoices => self.refetch::<Invoice>(true).await,
            Screen::Receipts => self.refetch::<Receipt>(true).await,
            Screen::Orders => self.refetch::<Order>(true).await,
            Screen::Users => self.refetch::<Account>(true).await,
            Screen::Roles => self.refetch::<Role>(true).await,
            Screen::Reports => {
                println!(
                    "{}",
                    "Pick a period: summary <from> <to> (dates as YYYY-MM-DD)".dimmed()
                );
                Ok(())
            }
            Screen::Chat => self.open_chat().await,
            Screen::Help => {
                self.show_help();
                Ok(())
            }
            Screen::Login => {
                if self.session.is_authenticated() {
                    println!("{}", "Already signed in.".dimmed());
                } else {
                    println!("{}", "Sign in with: login <username> [remember]".dimmed());
                }
                Ok(())
            }
            Screen::TwoFactor => {
                if self.session.is_two_factor_pending() {
                    println!("{}", "Enter the one-time code with: 2fa <code>".dimmed());
                } else {
                    println!(
                        "{}",
                        "No code is pending. Sign in first with: login <username>".dimmed()
                    );
                }
                Ok(())
            }
        }
    }

    /// Greeting shown on the home screen
    fn show_home(&self) {
        let username = self.session.current_username().unwrap_or("there");
        println!("Welcome back, {}.", username);
        println!(
            "{}",
            "Open a screen with: open <name> (tab completes names)".dimmed()
        );
    }

    /// Apply a sidebar action; everything but `show` is persisted
    fn handle_nav(&mut self, action: NavAction) -> Result<()> {
        match action {
            NavAction::Show => {}
            NavAction::Collapse => {
                self.nav.set_collapsed(true);
                self.persist_prefs();
            }
            NavAction::Expand => {
                self.nav.set_collapsed(false);
                self.persist_prefs();
            }
            NavAction::Move { from, to } => {
                if !self.nav.move_item(from, to) {
                    return Err(CliError::Validation(format!(
                        "positions must be between 1 and {}",
                        self.nav.items().len()
                    )));
                }
                self.persist_prefs();
            }
        }
        self.print_nav();
        Ok(())
    }

    /// Resize the chat panel and persist the new height
    fn set_chat_rows(&mut self, rows: u16) -> Result<()> {
        if rows == 0 {
            return Err(CliError::Validation(
                "the chat panel needs at least one row".to_string(),
            ));
        }
        self.prefs.chat_panel_rows = rows;
        self.persist_prefs();
        println!("Chat panel height set to {} rows", rows);
        Ok(())
    }

    /// Write sidebar state and panel sizes to the preferences file
    fn persist_prefs(&mut self) {
        self.nav.store(&mut self.prefs);
        if let Err(e) = self.prefs.save(&self.prefs_path) {
            warn!("[PREFS] Failed to save preferences: {}", e);
        }
    }

    /// Switch the output format for list screens
    fn switch_format(&mut self, format: &str) {
        match format.to_lowercase().as_str() {
            "table" => {
                self.formatter.set_format(OutputFormat::Table);
                println!("Output format set to: table");
            }
            "json" => {
                self.formatter.set_format(OutputFormat::Json);
                println!("Output format set to: json");
            }
            "csv" => {
                self.formatter.set_format(OutputFormat::Csv);
                println!("Output format set to: csv");
            }
            other => {
                println!("Unknown format: {}. Use: table, json, or csv", other);
            }
        }
    }

    /// Render the sidebar with the current screen marked
    fn print_nav(&self) {
        print!("{}", self.nav.render(self.screen));
    }

    /// Fail commands that need a signed-in session with a uniform message
    pub(crate) fn require_signed_in(&self) -> Result<()> {
        if self.session.is_authenticated() {
            Ok(())
        } else {
            Err(CliError::Validation(
                "sign in first with: login <username>".to_string(),
            ))
        }
    }

    fn primary_prompt(&self) -> String {
        // On Windows, rustyline has critical issues with ANSI color codes in prompts
        // The terminal cannot properly calculate display width, causing cursor misalignment
        // Disable colors entirely in the prompt on Windows (colors still work in output)
        #[cfg(target_os = "windows")]
        let use_colors_in_prompt = false;
        #[cfg(not(target_os = "windows"))]
        let use_colors_in_prompt = self.color;

        #[cfg(target_os = "windows")]
        let use_unicode = false;
        #[cfg(not(target_os = "windows"))]
        let use_unicode = true;

        let authenticated = self.session.is_authenticated();
        let status = if use_colors_in_prompt {
            if authenticated {
                if use_unicode {
                    "●".green().bold().to_string()
                } else {
                    "*".green().bold().to_string()
                }
            } else if use_unicode {
                "○".yellow().bold().to_string()
            } else {
                "o".yellow().bold().to_string()
            }
        } else if authenticated {
            "*".to_string()
        } else {
            "o".to_string()
        };

        let brand = if use_colors_in_prompt {
            "Moneta".bright_blue().bold().to_string()
        } else {
            "Moneta".to_string()
        };

        let brand_with_screen = if use_colors_in_prompt {
            format!("{}{}", brand, format!("[{}]", self.screen.name()).dimmed())
        } else {
            format!("{}[{}]", brand, self.screen.name())
        };

        let username = self.session.current_username().unwrap_or("guest");
        let identity = if use_colors_in_prompt {
            format!(
                "{}{}",
                username.cyan(),
                format!("@{}", self.server_host).dimmed()
            )
        } else {
            format!("{}@{}", username, self.server_host)
        };

        let arrow = if use_colors_in_prompt {
            if use_unicode {
                "❯".bright_blue().bold().to_string()
            } else {
                ">".bright_blue().bold().to_string()
            }
        } else {
            ">".to_string()
        };

        let parts = [status, brand_with_screen, identity];
        let body = parts.join(" ");
        format!("{} {} ", body, arrow)
    }

    /// Create a spinner for long-running requests, when animations are on
    fn spinner(&self, message: &str) -> Option<ProgressBar> {
        if !self.animations {
            return None;
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
                .template("{spinner:.cyan} {msg}")
                .unwrap(),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(80));
        Some(pb)
    }

    /// Print welcome banner
    fn print_banner(&self) {
        println!();
        println!(
            "{}",
            "╔═══════════════════════════════════════════════════════════╗"
                .bright_blue()
                .bold()
        );
        println!(
            "{}",
            "║                                                           ║"
                .bright_blue()
                .bold()
        );
        println!(
            "{}{}{}",
            "║       ".bright_blue().bold(),
            "💼  Moneta - Accounting & Inventory Terminal".white().bold(),
            "        ║".bright_blue().bold()
        );
        println!(
            "{}",
            "║                                                           ║"
                .bright_blue()
                .bold()
        );
        println!(
            "{}",
            "╚═══════════════════════════════════════════════════════════╝"
                .bright_blue()
                .bold()
        );
        println!();
        println!(
            "  {}  {}",
            "📡".dimmed(),
            format!("Server: {}", self.session.client().base_url()).cyan()
        );
        if let Some(ref chat_url) = self.chat_url {
            println!("  {}  {}", "💬".dimmed(), format!("Chat: {}", chat_url).cyan());
        }
        match self.session.current_username() {
            Some(username) => println!(
                "  {}  {}",
                "👤".dimmed(),
                format!("Signed in as: {}", username).cyan()
            ),
            None => println!("  {}  {}", "👤".dimmed(), "Signed out".dimmed()),
        }
        println!(
            "  {}  {}",
            "📚".dimmed(),
            format!("CLI version: {} (built: {})", CLI_VERSION, env!("BUILD_DATE")).dimmed()
        );
        println!(
            "  {}  Type {} for help, {} for session info, {} to exit",
            "💡".dimmed(),
            "\\help".cyan().bold(),
            "\\whoami".cyan().bold(),
            "\\quit".cyan().bold()
        );
        println!();
    }

    /// Print command help
    fn show_help(&self) {
        println!();
        println!("{}", "Screens".cyan().bold());
        println!("  open <screen>                 Switch screens (tab completes names)");
        println!("  \\nav [collapse|expand]        Show or fold the sidebar");
        println!("  \\nav move <from> <to>         Reorder the sidebar");
        println!();
        println!("{}", "List screens".cyan().bold());
        println!("  list                          Show the current page");
        println!("  next / prev / goto <n>        Page through records");
        println!("  filter <text>                 Free-text search; filter <field>=<value> toggles a field filter");
        println!("  filter                        Clear the search and all filters");
        println!("  sort <field> [asc|desc]       Sort server-side; sort alone clears it");
        println!("  select <id> | all | none      Build a selection for bulk-delete");
        println!("  show <id>                     Show one record in full");
        println!("  add <field>=<value> ...       Create a record");
        println!("  edit <id> <field>=<value> ..  Update fields on a record");
        println!("  delete <id>                   Delete one record");
        println!("  bulk-delete                   Delete every selected record");
        println!("  export csv|pdf                Export the filtered collection");
        println!("  refresh                       Refetch the current page");
        println!();
        println!("{}", "Account".cyan().bold());
        println!("  login [username] [remember]   Sign in; the password is prompted");
        println!("  2fa [backup] <code>           Finish a two-factor sign-in");
        println!("  logout                        Sign out and clear stored credentials");
        println!("  forgot <email>                Request a password reset link");
        println!("  reset <token> <password>      Set a new password with a reset token");
        println!("  permissions                   List the permission catalog");
        println!();
        println!("{}", "Support chat".cyan().bold());
        println!("  say <message>                 Send a message to support");
        println!("  history                       Show the conversation");
        println!("  status                        Show whether an agent is around");
        println!("  \\chat-rows <n>                Chat panel height");
        println!();
        println!("{}", "Reports".cyan().bold());
        println!("  summary <from> <to>           Financial summary for a period (YYYY-MM-DD)");
        println!("  export csv|pdf                Export the last summary (reports screen)");
        println!();
        println!("{}", "Meta".cyan().bold());
        println!("  \\format table|json|csv        Switch the output format");
        println!("  \\whoami                       Session and connection info");
        println!("  \\config                       Show the loaded configuration");
        println!("  \\show-credentials             Show stored credentials");
        println!("  \\delete-credentials           Delete stored credentials");
        println!("  \\quit                         Exit");
        println!();
    }
}

/// Split a batch on `;`, leaving separators inside quotes alone
fn split_commands(input: &str) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in input.chars() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
                current.push(c);
            }
            None => match c {
                '\'' | '"' => {
                    quote = Some(c);
                    current.push(c);
                }
                ';' => pieces.push(std::mem::take(&mut current)),
                _ => current.push(c),
            },
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    pieces
}

/// Rustyline helper wiring in the screen-aware completer
struct CliHelper {
    completer: CommandCompleter,
}

impl CliHelper {
    fn new(completer: CommandCompleter) -> Self {
        Self { completer }
    }
}

impl Completer for CliHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        self.completer.complete(line, pos, ctx)
    }
}

impl Hinter for CliHelper {
    type Hint = String;

    fn hint(&self, _line: &str, _pos: usize, _ctx: &rustyline::Context<'_>) -> Option<String> {
        None
    }
}

impl Highlighter for CliHelper {}

impl Validator for CliHelper {}

impl Helper for CliHelper {}

#[cfg(test)]
mod tests {
    use super::*;
    use moneta_link::MonetaClient;
    use tempfile::TempDir;

    fn session_with(dir: &TempDir) -> SessionStore<FileCredentialStore> {
        let client = MonetaClient::builder()
            .base_url("http://127.0.0.1:9")
            .build()
            .unwrap();
        let store =
            FileCredentialStore::with_path(dir.path().join("credentials.toml")).unwrap();
        SessionStore::new(client, store, "default")
    }

    fn shell(session: SessionStore<FileCredentialStore>, dir: &TempDir) -> CliSession {
        CliSession::new(
            session,
            OutputFormat::Table,
            false,
            false,
            10,
            None,
            CliConfiguration::default(),
            dir.path().join("config.toml"),
            dir.path().join("prefs.toml"),
        )
    }

    #[test]
    fn test_initial_screen_follows_session_state() {
        assert_eq!(
            CliSession::initial_screen(&SessionState::Anonymous),
            Screen::Login
        );
        assert_eq!(
            CliSession::initial_screen(&SessionState::TwoFactorPending {
                challenge_token: "challenge".into(),
                username: "amina".into(),
                remember_me: false,
            }),
            Screen::TwoFactor
        );
        assert_eq!(
            CliSession::initial_screen(&SessionState::Authenticated {
                username: "amina".into(),
                user: None,
                access_token: "tok".into(),
            }),
            Screen::Home
        );
    }

    #[test]
    fn test_extract_host_strips_scheme_and_slash() {
        assert_eq!(
            CliSession::extract_host("http://localhost:8080/"),
            "localhost:8080"
        );
        assert_eq!(
            CliSession::extract_host("https://api.moneta.example"),
            "api.moneta.example"
        );
    }

    #[test]
    fn test_split_commands_respects_quotes() {
        let pieces = split_commands("open products; add name=\"a;b\" price=2; list");
        assert_eq!(pieces.len(), 3);
        assert_eq!(pieces[1].trim(), "add name=\"a;b\" price=2");
    }

    #[tokio::test]
    async fn test_protected_screen_redirects_to_login_when_anonymous() {
        let dir = TempDir::new().unwrap();
        let mut shell = shell(session_with(&dir), &dir);

        shell
            .execute_command(Command::Open("products".into()))
            .await
            .unwrap();

        assert_eq!(shell.screen(), Screen::Login);
    }

    #[tokio::test]
    async fn test_open_help_is_always_granted() {
        let dir = TempDir::new().unwrap();
        let mut shell = shell(session_with(&dir), &dir);

        shell
            .execute_command(Command::Open("help".into()))
            .await
            .unwrap();

        assert_eq!(shell.screen(), Screen::Help);
    }

    #[tokio::test]
    async fn test_open_unknown_screen_errors() {
        let dir = TempDir::new().unwrap();
        let mut shell = shell(session_with(&dir), &dir);

        let err = shell
            .execute_command(Command::Open("warehouse".into()))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("unknown screen"));
    }

    #[tokio::test]
    async fn test_authenticated_open_switches_screen_even_when_fetch_fails() {
        let dir = TempDir::new().unwrap();
        let mut session = session_with(&dir);
        session.adopt_token("amina", "tok");
        let mut shell = shell(session, &dir);

        // Nothing listens on the client's port, so the list fetch errors,
        // but the guard granted the switch before the request went out.
        let result = shell.execute_command(Command::Open("products".into())).await;

        assert!(result.is_err());
        assert_eq!(shell.screen(), Screen::Products);
    }

    #[tokio::test]
    async fn test_format_meta_command_switches_formatter() {
        let dir = TempDir::new().unwrap();
        let mut shell = shell(session_with(&dir), &dir);

        shell
            .execute_command(Command::SetFormat("json".into()))
            .await
            .unwrap();

        assert_eq!(shell.formatter.format(), OutputFormat::Json);
    }

    #[tokio::test]
    async fn test_nav_collapse_persists_to_prefs_file() {
        let dir = TempDir::new().unwrap();
        let mut shell = shell(session_with(&dir), &dir);

        shell
            .execute_command(Command::Nav(NavAction::Collapse))
            .await
            .unwrap();

        let prefs = UiPrefs::load(&dir.path().join("prefs.toml"));
        assert!(prefs.sidebar_collapsed);
    }

    #[tokio::test]
    async fn test_chat_rows_meta_updates_prefs() {
        let dir = TempDir::new().unwrap();
        let mut shell = shell(session_with(&dir), &dir);

        shell.execute_command(Command::ChatRows(12)).await.unwrap();

        let prefs = UiPrefs::load(&dir.path().join("prefs.toml"));
        assert_eq!(prefs.chat_panel_rows, 12);
        assert!(shell.execute_command(Command::ChatRows(0)).await.is_err());
    }

    #[tokio::test]
    async fn test_chat_commands_require_sign_in() {
        let dir = TempDir::new().unwrap();
        let mut shell = shell(session_with(&dir), &dir);

        let err = shell
            .execute_command(Command::Send("hello".into()))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("sign in"));
    }
}
