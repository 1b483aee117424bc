//! Screen registry and route guard
//!
//! Every screen the shell can show is either public (reachable while signed
//! out) or protected. The guard is checked on every `open` before any screen
//! state is touched, so a signed-out user never sees half a protected screen.

use moneta_link::credentials::CredentialStore;
use moneta_link::SessionStore;

/// Screens the shell can display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    // Public
    Login,
    TwoFactor,
    Help,
    // Protected
    Home,
    Products,
    Customers,
    Transactions,
    Invoices,
    Receipts,
    Orders,
    Reports,
    Users,
    Roles,
    Chat,
}

/// Every screen, public ones first
pub const ALL_SCREENS: &[Screen] = &[
    Screen::Login,
    Screen::TwoFactor,
    Screen::Help,
    Screen::Home,
    Screen::Products,
    Screen::Customers,
    Screen::Transactions,
    Screen::Invoices,
    Screen::Receipts,
    Screen::Orders,
    Screen::Reports,
    Screen::Users,
    Screen::Roles,
    Screen::Chat,
];

/// Sidebar order when no stored preference overrides it
pub const DEFAULT_MENU: &[Screen] = &[
    Screen::Home,
    Screen::Products,
    Screen::Customers,
    Screen::Transactions,
    Screen::Invoices,
    Screen::Receipts,
    Screen::Orders,
    Screen::Reports,
    Screen::Users,
    Screen::Roles,
    Screen::Chat,
];

impl Screen {
    /// Stable name used in commands and stored preferences
    pub fn name(&self) -> &'static str {
        match self {
            Screen::Login => "login",
            Screen::TwoFactor => "2fa",
            Screen::Help => "help",
            Screen::Home => "home",
            Screen::Products => "products",
            Screen::Customers => "customers",
            Screen::Transactions => "transactions",
            Screen::Invoices => "invoices",
            Screen::Receipts => "receipts",
            Screen::Orders => "orders",
            Screen::Reports => "reports",
            Screen::Users => "users",
            Screen::Roles => "roles",
            Screen::Chat => "chat",
        }
    }

    /// Label shown in the sidebar
    pub fn label(&self) -> &'static str {
        match self {
            Screen::Login => "Sign in",
            Screen::TwoFactor => "Two-factor",
            Screen::Help => "Help",
            Screen::Home => "Home",
            Screen::Products => "Products",
            Screen::Customers => "Customers",
            Screen::Transactions => "Transactions",
            Screen::Invoices => "Invoices",
            Screen::Receipts => "Receipts",
            Screen::Orders => "Orders",
            Screen::Reports => "Reports",
            Screen::Users => "Users",
            Screen::Roles => "Roles",
            Screen::Chat => "Support chat",
        }
    }

    /// True for screens reachable while signed out
    pub fn is_public(&self) -> bool {
        matches!(self, Screen::Login | Screen::TwoFactor | Screen::Help)
    }

    /// Parse a screen name as typed in an `open` command
    pub fn parse(value: &str) -> Option<Screen> {
        match value.trim().to_lowercase().as_str() {
            "login" | "signin" => Some(Screen::Login),
            "2fa" | "two-factor" => Some(Screen::TwoFactor),
            "help" => Some(Screen::Help),
            "home" | "dashboard" => Some(Screen::Home),
            "products" | "product" => Some(Screen::Products),
            "customers" | "customer" => Some(Screen::Customers),
            "transactions" | "transaction" => Some(Screen::Transactions),
            "invoices" | "invoice" => Some(Screen::Invoices),
            "receipts" | "receipt" => Some(Screen::Receipts),
            "orders" | "order" => Some(Screen::Orders),
            "reports" | "report" => Some(Screen::Reports),
            "users" | "user" => Some(Screen::Users),
            "roles" | "role" => Some(Screen::Roles),
            "chat" | "support" => Some(Screen::Chat),
            _ => None,
        }
    }
}

/// Outcome of a guard check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// The screen may be shown
    Granted,
    /// The session is not allowed there; show this screen instead
    Redirect(Screen),
}

/// Decides whether the current session may enter a screen
pub struct RouteGuard;

impl RouteGuard {
    /// Check a screen against the session before entering it
    ///
    /// Protected screens require an authenticated session and otherwise
    /// redirect to the login screen. Public screens are always granted, so
    /// a signed-in user can still read the help screen.
    pub fn check<S: CredentialStore>(screen: Screen, session: &SessionStore<S>) -> Access {
        if screen.is_public() || session.is_authenticated() {
            Access::Granted
        } else {
            Access::Redirect(Screen::Login)
        }
    }
}
