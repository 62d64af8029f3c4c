use thiserror::Error;

use crate::role::UserRole;

/// Errors surfaced by the library.
///
/// Page logic itself never fails; these cover lookups that the front ends
/// turn into fallback pages or HTTP status codes.
#[derive(Error, Debug)]
pub enum Error {
    /// Client id that is not part of the mock data
    #[error("Client not found: {0}")]
    ClientNotFound(String),

    /// Transaction id that is not part of the current page
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    /// Receipt id that is not part of the current page
    #[error("Receipt not found: {0}")]
    ReceiptNotFound(String),

    /// Route exists but the active persona may not open it
    #[error("Route {path} is not available for role {role}")]
    Forbidden { path: String, role: UserRole },

    /// Filter or enum value that could not be parsed
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl Error {
    pub fn invalid(field: &'static str, value: impl Into<String>) -> Self {
        Error::InvalidValue {
            field,
            value: value.into(),
        }
    }

    /// True for the lookup failures the front ends render as "not found"
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::ClientNotFound(_) | Error::TransactionNotFound(_) | Error::ReceiptNotFound(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
