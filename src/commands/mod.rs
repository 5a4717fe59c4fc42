//! Command handlers for the budget-book CLI.
//!
//! This module contains implementations for all CLI subcommands.

mod edit;
mod init;
mod shell;
mod terminal;
mod view;

use crate::api::{open_session, PasswordSource, Persistence};
use crate::app::App;
use crate::ledger::EntryStore;
use crate::model::SequentialIds;
use crate::{Config, Result};
use anyhow::Context;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

pub use edit::{add, delete, edit};
pub use init::init;
pub use shell::shell;
pub use terminal::{LineEditor, LineSource, PasswordPrompt};
pub use view::{chart, list};

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    /// Get the `message`.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the structured data stored in `structure`.
    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// An unlocked ledger: the application state together with the storage it came from and the
/// password that opened it.
struct Book<'p> {
    app: App,
    persistence: &'p Persistence,
    password: String,
}

impl<'p> Book<'p> {
    /// Runs startup against `persistence` and loads the ledger, showing `year` if given, else the
    /// configured default year, else the current year.
    async fn open(
        config: &Config,
        persistence: &'p Persistence,
        passwords: &mut dyn PasswordSource,
        year: Option<i32>,
    ) -> Result<Book<'p>> {
        let session = open_session(persistence, passwords).await?;
        let store = EntryStore::from_raw(&session.entries, Box::new(SequentialIds::new()))
            .context("The stored ledger could not be read")?;
        let year = year
            .or(config.default_year())
            .unwrap_or_else(App::current_year);
        debug!("Opened a ledger of {} entries at {year}", store.len());
        Ok(Self {
            app: App::new(store, year),
            persistence,
            password: session.password,
        })
    }

    /// Writes the ledger back to storage.
    async fn save(&mut self) -> Result<String> {
        let message = self.app.save(self.persistence, &self.password).await?;
        Ok(message)
    }
}
