//! budget-book: a password-protected personal ledger.
//!
//! The ledger is a date-ordered list of income and expense entries. It is viewed one year at a
//! time, as a table and as daily income, expense and running-balance series, and it is read from
//! and written to storage only through the `api::Gateway` trait.

pub mod api;
pub mod app;
pub mod args;
pub mod commands;
mod config;
mod error;
pub mod ledger;
pub mod model;
mod render;
mod utils;

#[cfg(test)]
mod test;

pub use api::Mode;
pub use app::App;
pub use config::Config;
pub use error::{Error, GatewayError, LedgerError, Result};
