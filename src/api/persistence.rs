use crate::api::Gateway;
use crate::error::GatewayError;
use crate::model::RawEntry;
use tokio::sync::{Mutex, MutexGuard};
use tracing::debug;

/// Wraps a `Gateway` so that at most one call is in flight. A call made while another is still
/// pending is rejected with `GatewayError::Busy` rather than queued.
pub struct Persistence {
    gateway: Box<dyn Gateway>,
    in_flight: Mutex<()>,
}

impl Persistence {
    pub fn new(gateway: Box<dyn Gateway>) -> Self {
        Self {
            gateway,
            in_flight: Mutex::new(()),
        }
    }

    fn begin(&self, call: &str) -> Result<MutexGuard<'_, ()>, GatewayError> {
        debug!("Gateway call: {call}");
        self.in_flight.try_lock().map_err(|_| {
            debug!("Rejected {call}: another call is pending");
            GatewayError::Busy
        })
    }

    pub async fn is_password_set(&self) -> Result<bool, GatewayError> {
        let _guard = self.begin("is_password_set")?;
        self.gateway.is_password_set().await
    }

    pub async fn set_password(&self, password: &str) -> Result<String, GatewayError> {
        let _guard = self.begin("set_password")?;
        self.gateway.set_password(password).await
    }

    pub async fn verify_password(&self, password: &str) -> Result<bool, GatewayError> {
        let _guard = self.begin("verify_password")?;
        self.gateway.verify_password(password).await
    }

    pub async fn load_data(&self, password: &str) -> Result<Vec<RawEntry>, GatewayError> {
        let _guard = self.begin("load_data")?;
        let entries = self.gateway.load_data(password).await?;
        debug!("Loaded {} entries", entries.len());
        Ok(entries)
    }

    pub async fn save_data(
        &self,
        entries: &[RawEntry],
        password: &str,
    ) -> Result<String, GatewayError> {
        let _guard = self.begin("save_data")?;
        self.gateway.save_data(entries, password).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::TestGateway;
    use std::sync::Arc;
    use tokio::sync::Notify;

    /// Holds every `save_data` call open until released.
    struct StallingGateway {
        inner: TestGateway,
        release: Arc<Notify>,
    }

    #[async_trait::async_trait]
    impl Gateway for StallingGateway {
        async fn is_password_set(&self) -> Result<bool, GatewayError> {
            self.inner.is_password_set().await
        }

        async fn set_password(&self, password: &str) -> Result<String, GatewayError> {
            self.inner.set_password(password).await
        }

        async fn verify_password(&self, password: &str) -> Result<bool, GatewayError> {
            self.inner.verify_password(password).await
        }

        async fn load_data(&self, password: &str) -> Result<Vec<RawEntry>, GatewayError> {
            self.inner.load_data(password).await
        }

        async fn save_data(
            &self,
            entries: &[RawEntry],
            password: &str,
        ) -> Result<String, GatewayError> {
            self.release.notified().await;
            self.inner.save_data(entries, password).await
        }
    }

    #[tokio::test]
    async fn test_overlapping_call_is_rejected() {
        let release = Arc::new(Notify::new());
        let persistence = Persistence::new(Box::new(StallingGateway {
            inner: TestGateway::with_password("pw"),
            release: release.clone(),
        }));

        let (saved, loaded) = tokio::join!(persistence.save_data(&[], "pw"), async {
            let loaded = persistence.load_data("pw").await;
            release.notify_one();
            loaded
        });
        assert!(saved.is_ok());
        assert_eq!(loaded.unwrap_err(), GatewayError::Busy);

        // Once the save has finished the gateway is free again.
        assert!(persistence.load_data("pw").await.is_ok());
    }

    #[tokio::test]
    async fn test_sequential_calls_succeed() {
        let persistence = Persistence::new(Box::new(TestGateway::default()));
        assert!(!persistence.is_password_set().await.unwrap());
        persistence.set_password("pw").await.unwrap();
        assert!(persistence.verify_password("pw").await.unwrap());
        assert!(persistence.load_data("pw").await.unwrap().is_empty());
    }
}
