//! Data models for the moneta-link client library.
//!
//! Request and response structures for the auth flow plus the business
//! resources served by the collection endpoints.

pub mod account;
pub mod api_error;
pub mod chat_message;
pub mod customer;
pub mod export;
pub mod invoice;
pub mod line_item;
pub mod login_request;
pub mod login_response;
pub mod order;
pub mod password_reset;
pub mod permission;
pub mod product;
pub mod receipt;
pub mod report;
pub mod role;
pub mod transaction;
pub mod two_factor_request;
pub mod user_info;


pub use account::{Account, AccountDraft};
pub use api_error::ApiError;
pub use chat_message::{ChatMessage, ChatSender};
pub use customer::{Customer, CustomerDraft};
pub use export::{Export, ExportFormat};
pub use invoice::{Invoice, InvoiceDraft, InvoiceStatus};
pub use line_item::LineItem;
pub use login_request::LoginRequest;
pub use login_response::LoginResponse;
pub use order::{Order, OrderDraft, OrderStatus};
pub use password_reset::{PasswordResetConfirm, PasswordResetRequest};
pub use permission::Permission;
pub use product::{Product, ProductDraft};
pub use receipt::{PaymentMethod, Receipt, ReceiptDraft};
pub use report::{ProductSales, ReportSummary};
pub use role::{Role, RoleDraft};
pub use transaction::{Transaction, TransactionDraft, TransactionKind};
pub use two_factor_request::TwoFactorRequest;
pub use user_info::UserInfo;
