//! Startup: make sure a password exists, check it, then load the stored entries.

use crate::api::Persistence;
use crate::error::GatewayError;
use crate::model::RawEntry;
use crate::Result;
use anyhow::{bail, Context};
use tracing::{debug, info, warn};

/// Supplies passwords during startup. Returning `None` aborts startup.
#[async_trait::async_trait]
pub trait PasswordSource: Send {
    /// Asked when no password has been stored yet, again after an empty answer.
    async fn new_password(&mut self) -> Option<String>;

    /// Asked for the stored password. `attempt` starts at 1 and grows with each wrong answer.
    async fn password(&mut self, attempt: u32) -> Option<String>;
}

/// A `PasswordSource` that offers one password, once.
#[derive(Debug, Clone)]
pub struct FixedPassword {
    password: Option<String>,
}

impl FixedPassword {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: Some(password.into()),
        }
    }
}

#[async_trait::async_trait]
impl PasswordSource for FixedPassword {
    async fn new_password(&mut self) -> Option<String> {
        self.password.take()
    }

    async fn password(&mut self, _attempt: u32) -> Option<String> {
        self.password.take()
    }
}

/// Where startup currently is.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum StartupState {
    /// Asking whether a password exists.
    Checking,
    /// No password exists, one is being created.
    Creating,
    /// Checking a password against the stored one.
    Verifying { attempt: u32 },
    /// Loading the entries.
    Loading,
    /// Startup finished.
    Ready,
}

/// The result of a successful startup: the accepted password and the entries as stored.
#[derive(Debug, Clone)]
pub struct Session {
    pub password: String,
    pub entries: Vec<RawEntry>,
}

/// Runs startup to completion, asking `passwords` for credentials as needed.
///
/// # Errors
/// - The password source gave up.
/// - Any gateway call failed, including the final load. No entries are returned in that case.
pub async fn open_session(
    persistence: &Persistence,
    passwords: &mut dyn PasswordSource,
) -> Result<Session> {
    let mut state = StartupState::Checking;
    let mut password = String::new();
    let mut entries = Vec::new();
    loop {
        debug!("Startup state: {state:?}");
        state = match state {
            StartupState::Checking => {
                if persistence.is_password_set().await? {
                    StartupState::Verifying { attempt: 1 }
                } else {
                    StartupState::Creating
                }
            }
            StartupState::Creating => {
                let Some(candidate) = passwords.new_password().await else {
                    bail!("No password was provided");
                };
                match persistence.set_password(&candidate).await {
                    Ok(message) => {
                        info!("{message}");
                        password = candidate;
                        StartupState::Loading
                    }
                    Err(GatewayError::EmptyPassword) => {
                        warn!("{}", GatewayError::EmptyPassword);
                        StartupState::Creating
                    }
                    Err(e) => return Err(e).context("Unable to set the password"),
                }
            }
            StartupState::Verifying { attempt } => {
                let Some(candidate) = passwords.password(attempt).await else {
                    bail!("No password was provided");
                };
                if persistence.verify_password(&candidate).await? {
                    password = candidate;
                    StartupState::Loading
                } else {
                    warn!("{}", GatewayError::WrongPassword);
                    StartupState::Verifying {
                        attempt: attempt + 1,
                    }
                }
            }
            StartupState::Loading => {
                entries = persistence
                    .load_data(&password)
                    .await
                    .context("Unable to load the stored entries")?;
                StartupState::Ready
            }
            StartupState::Ready => return Ok(Session { password, entries }),
        };
    }
}
