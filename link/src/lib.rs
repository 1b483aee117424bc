//! Client library for the Moneta accounting and inventory server.
//!
//! Covers the full browser-equivalent client surface: the authentication
//! flow (password login, optional second factor, logout, password reset),
//! typed CRUD over the business collections with pagination, filtering and
//! sorting, CSV/PDF exports, report summaries, and the support chat widget
//! on its separate origin.
//!
//! # Example
//!
//! ```rust,no_run
//! use moneta_link::{ListQuery, MonetaClient, Product};
//!
//! # async fn example() -> moneta_link::Result<()> {
//! let client = MonetaClient::builder()
//!     .base_url("http://localhost:8080")
//!     .bearer_token("tok-abc")
//!     .build()?;
//!
//! let page = client.list::<Product>(&ListQuery::default()).await?;
//! println!("{} products ({} pages)", page.total_count, page.total_pages());
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod chat;
pub mod client;
pub mod credentials;
pub mod error;
pub mod models;
pub mod pagination;
pub mod resources;
pub mod session;

pub use auth::AuthProvider;
pub use chat::{AgentPresence, ChatClient, PresenceSim};
pub use client::{MonetaClient, MonetaClientBuilder};
pub use credentials::{CredentialStore, Credentials, MemoryCredentialStore};
pub use error::{LinkError, Result};
pub use models::{
    Account, AccountDraft, ApiError, ChatMessage, ChatSender, Customer, CustomerDraft, Export,
    ExportFormat, Invoice, InvoiceDraft, InvoiceStatus, LineItem, LoginRequest, LoginResponse,
    Order, OrderDraft, OrderStatus, PaymentMethod, Permission, Product, ProductDraft, Receipt,
    ReceiptDraft, ReportSummary, Role, RoleDraft, Transaction, TransactionDraft, TransactionKind,
    TwoFactorRequest, UserInfo,
};
pub use pagination::{ListQuery, Page, SortOrder, DEFAULT_PAGE_SIZE};
pub use resources::ApiResource;
pub use session::{LoginOutcome, SessionState, SessionStore};
