//! Implements the `Gateway` trait using in-memory data.
//!
//! Note: this is compiled even in the "production" version of this app so that we can run the whole
//! app, top-to-bottom, without touching the file system (see `BUDGET_BOOK_IN_TEST_MODE`).

use crate::api::Gateway;
use crate::error::GatewayError;
use crate::model::{RawAmount, RawEntry};
use std::sync::{Arc, Mutex, MutexGuard};

/// The password of the seeded in-memory ledger.
pub const SEED_PASSWORD: &str = "password";

#[derive(Debug, Default)]
struct State {
    password: Option<String>,
    data: Vec<RawEntry>,
    saved: Vec<RawEntry>,
    fail_saves: bool,
}

/// An implementation of the `Gateway` trait that keeps everything in memory. Clones share the
/// same state, so a test can keep a handle to inspect what was saved.
#[derive(Debug, Default, Clone)]
pub struct TestGateway {
    state: Arc<Mutex<State>>,
}

impl TestGateway {
    /// A gateway with `password` set and no data.
    pub fn with_password(password: &str) -> Self {
        Self::with_data(password, Vec::new())
    }

    /// A gateway with `password` set that loads `data`.
    pub fn with_data(password: &str, data: Vec<RawEntry>) -> Self {
        let gateway = Self::default();
        {
            let mut state = gateway.lock();
            state.password = Some(password.to_string());
            state.data = data;
        }
        gateway
    }

    /// A gateway seeded with a couple of years of sample entries, protected by `SEED_PASSWORD`.
    pub fn seeded() -> Self {
        Self::with_data(SEED_PASSWORD, seed_data())
    }

    /// The entries passed to the most recent successful `save_data`.
    pub fn saved(&self) -> Vec<RawEntry> {
        self.lock().saved.clone()
    }

    /// Makes every following `save_data` fail as if the disk were full.
    pub fn fail_saves(&self) {
        self.lock().fail_saves = true;
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        // A poisoned lock only means another test thread panicked; the data is still usable.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn check(&self, password: &str) -> Result<(), GatewayError> {
        match &self.lock().password {
            Some(stored) if stored == password => Ok(()),
            Some(_) => Err(GatewayError::WrongPassword),
            None => Err(GatewayError::Failed("no password has been set".to_string())),
        }
    }
}

#[async_trait::async_trait]
impl Gateway for TestGateway {
    async fn is_password_set(&self) -> Result<bool, GatewayError> {
        Ok(self.lock().password.is_some())
    }

    async fn set_password(&self, password: &str) -> Result<String, GatewayError> {
        if password.is_empty() {
            return Err(GatewayError::EmptyPassword);
        }
        self.lock().password = Some(password.to_string());
        Ok("The password has been set.".to_string())
    }

    async fn verify_password(&self, password: &str) -> Result<bool, GatewayError> {
        match self.check(password) {
            Ok(()) => Ok(true),
            Err(GatewayError::WrongPassword) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn load_data(&self, password: &str) -> Result<Vec<RawEntry>, GatewayError> {
        self.check(password)?;
        Ok(self.lock().data.clone())
    }

    async fn save_data(
        &self,
        entries: &[RawEntry],
        password: &str,
    ) -> Result<String, GatewayError> {
        self.check(password)?;
        let mut state = self.lock();
        if state.fail_saves {
            return Err(GatewayError::Failed("no space left on device".to_string()));
        }
        state.saved = entries.to_vec();
        state.data = entries.to_vec();
        Ok(format!("Saved {} entries.", entries.len()))
    }
}

/// Seed entries for the in-memory ledger. Amounts come in both of the shapes storage may hold.
fn seed_data() -> Vec<RawEntry> {
    let rows: [(&str, &str, RawAmount); 10] = [
        ("2024-11-25", "income", RawAmount::Unsigned(250_000)),
        ("2024-12-01", "expense", RawAmount::Unsigned(85_000)),
        ("2024-12-10", "expense", RawAmount::Text("12400".to_string())),
        ("2024-12-25", "income", RawAmount::Unsigned(250_000)),
        ("2025-01-01", "expense", RawAmount::Unsigned(85_000)),
        ("2025-01-05", "expense", RawAmount::Text("3980".to_string())),
        ("2025-01-05", "expense", RawAmount::Unsigned(1_200)),
        ("2025-01-24", "income", RawAmount::Unsigned(250_000)),
        ("2025-02-01", "expense", RawAmount::Unsigned(85_000)),
        ("2025-02-14", "income", RawAmount::Text("30000".to_string())),
    ];
    rows.into_iter()
        .map(|(date, kind, amount)| RawEntry::new(date, kind, amount))
        .collect()
}
