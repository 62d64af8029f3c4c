// Belegzuordnung - Core Library
// Data model, mock data and page logic shared by the TUI, the API server and tests

pub mod error;
pub mod config;
pub mod logging;
pub mod format;
pub mod entities;
pub mod mock_data;
pub mod filters;
pub mod selection;
pub mod requests;
pub mod activity;
pub mod role;
pub mod routes;
pub mod pages;

#[cfg(feature = "server")]
pub mod api;

// Re-export commonly used types
pub use error::{Error, Result};
pub use config::Settings;
pub use entities::{
    Client, ClientStatus, VatCadence, VatPeriod,
    Transaction, Receipt, MatchStatus, Resolution, ClientRequest,
    InboxItem,
    MandantTransaction, MandantReceipt, MandantStatus, ReceiptStatus,
    VatPeriodStatus, Message,
};
pub use filters::{
    ClientFilter, ClientSort, TransactionFilter, InboxFilter, DateRange,
    MandantTransactionFilter, MandantStatusFilter, MonthFilter,
    ReceiptFilter, ReceiptListFilter,
};
pub use selection::Selection;
pub use requests::{request_receipts, ReceiptRequest};
pub use activity::{ActivityLog, Notice, NoticeLevel};
pub use role::{RoleContext, User, UserRole, NavItem};
pub use routes::Route;
pub use pages::{Page, PageContext};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application title shown in both front ends
pub const APP_TITLE: &str = "Belegzuordnung Assistent";
