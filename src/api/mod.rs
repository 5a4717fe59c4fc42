//! The boundary to the password-gated storage layer.
//!
//! The ledger only ever talks to storage through the `Gateway` trait, wrapped in a `Persistence`
//! that keeps calls from overlapping.

mod file_gateway;
mod persistence;
mod session;
mod test_gateway;

use crate::error::GatewayError;
use crate::model::RawEntry;
use crate::Config;
use serde::{Deserialize, Serialize};

pub use file_gateway::FileGateway;
pub use persistence::Persistence;
pub use session::{open_session, FixedPassword, PasswordSource, Session, StartupState};
pub use test_gateway::{TestGateway, SEED_PASSWORD};

/// When this environment variable is set and non-empty the program stores nothing on disk and
/// works against a seeded in-memory gateway instead.
pub const TEST_MODE_ENV: &str = "BUDGET_BOOK_IN_TEST_MODE";

/// The four storage operations the ledger relies on, plus the password check.
#[async_trait::async_trait]
pub trait Gateway: Send + Sync {
    /// `false` when no credential has been stored yet.
    async fn is_password_set(&self) -> Result<bool, GatewayError>;

    /// Stores the credential, replacing any existing one. Fails if `password` is empty.
    async fn set_password(&self, password: &str) -> Result<String, GatewayError>;

    /// Checks `password` against the stored credential.
    async fn verify_password(&self, password: &str) -> Result<bool, GatewayError>;

    /// Returns the stored entries.
    async fn load_data(&self, password: &str) -> Result<Vec<RawEntry>, GatewayError>;

    /// Replaces the stored entries with `entries`.
    async fn save_data(&self, entries: &[RawEntry], password: &str)
        -> Result<String, GatewayError>;
}

/// Selects which `Gateway` implementation backs the program.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Password hash and data live in files under the home directory.
    #[default]
    Files,
    /// Everything is held in memory, seeded with sample data.
    Testing,
}

serde_plain::derive_display_from_serialize!(Mode);

impl Mode {
    /// `Mode::Testing` when `BUDGET_BOOK_IN_TEST_MODE` is set and non-empty, `Mode::Files`
    /// otherwise.
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_ENV) {
            Ok(value) if !value.is_empty() => Mode::Testing,
            _ => Mode::Files,
        }
    }
}

/// Creates the gateway for `mode`.
pub fn gateway(config: &Config, mode: Mode) -> Box<dyn Gateway> {
    match mode {
        Mode::Files => Box::new(FileGateway::new(config)),
        Mode::Testing => Box::new(TestGateway::seeded()),
    }
}
