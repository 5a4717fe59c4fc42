use crate::model::EntryId;
use std::fmt::{Display, Formatter};

pub type Error = anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by user actions against the ledger. None of these are fatal: each leaves the
/// ledger in its last good state and the action can be retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A form field was missing or could not be parsed. Nothing was changed.
    Validation(String),
    /// An update or delete named an entry that is no longer in the store.
    NotFound(EntryId),
    /// Edit or delete was requested without a selected entry.
    NothingSelected,
    /// The form was submitted or edited while it was not open.
    FormClosed,
    /// An edit was requested while the form was already open.
    FormOpen,
    /// The storage layer reported a failure.
    Gateway(GatewayError),
}

impl Display for LedgerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LedgerError::Validation(message) => write!(f, "Invalid input: {message}"),
            LedgerError::NotFound(id) => write!(f, "Entry '{id}' no longer exists"),
            LedgerError::NothingSelected => write!(f, "No entry is selected"),
            LedgerError::FormClosed => write!(f, "The entry form is not open"),
            LedgerError::FormOpen => {
                write!(f, "The entry form is already open, submit or cancel it first")
            }
            LedgerError::Gateway(e) => Display::fmt(e, f),
        }
    }
}

impl std::error::Error for LedgerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LedgerError::Gateway(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GatewayError> for LedgerError {
    fn from(value: GatewayError) -> Self {
        LedgerError::Gateway(value)
    }
}

/// Failures reported by the password-gated storage layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// An empty password was offered to `set_password`.
    EmptyPassword,
    /// The password did not match the stored credential.
    WrongPassword,
    /// Another storage call was still pending.
    Busy,
    /// Reading, writing or decoding failed.
    Failed(String),
}

impl GatewayError {
    /// Flattens an `anyhow` error chain into a `Failed` message.
    pub(crate) fn failed(e: anyhow::Error) -> Self {
        GatewayError::Failed(format!("{e:#}"))
    }
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            GatewayError::EmptyPassword => write!(f, "The password must not be empty"),
            GatewayError::WrongPassword => write!(f, "The password is incorrect"),
            GatewayError::Busy => write!(f, "Another load or save is still in progress"),
            GatewayError::Failed(message) => write!(f, "Storage failure: {message}"),
        }
    }
}

impl std::error::Error for GatewayError {}
