//! Implements the `Gateway` trait with two files in the home directory: a SHA-256 digest of the
//! password and a JSON document holding the entries.

use crate::api::Gateway;
use crate::error::GatewayError;
use crate::model::RawEntry;
use crate::{utils, Config, Result};
use anyhow::Context;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use tracing::{debug, trace};

/// Stores the password digest at `password_path` and the entries at `data_path`.
#[derive(Debug, Clone)]
pub struct FileGateway {
    password_path: PathBuf,
    data_path: PathBuf,
}

impl FileGateway {
    pub fn new(config: &Config) -> Self {
        Self::with_paths(config.password_path(), config.data_path())
    }

    pub fn with_paths(password_path: impl Into<PathBuf>, data_path: impl Into<PathBuf>) -> Self {
        Self {
            password_path: password_path.into(),
            data_path: data_path.into(),
        }
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    async fn stored_digest(&self) -> Result<String> {
        let digest = utils::read(&self.password_path)
            .await
            .context("Unable to read the stored password")?;
        Ok(digest.trim().to_string())
    }

    async fn check(&self, password: &str) -> std::result::Result<(), GatewayError> {
        let stored = self.stored_digest().await.map_err(GatewayError::failed)?;
        if stored == digest(password) {
            Ok(())
        } else {
            Err(GatewayError::WrongPassword)
        }
    }

    async fn read_entries(&self) -> Result<Vec<RawEntry>> {
        if !utils::exists(&self.data_path).await? {
            debug!(
                "No data file at {}, starting empty",
                self.data_path.display()
            );
            return Ok(Vec::new());
        }
        let content = utils::read(&self.data_path).await?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content)
            .with_context(|| format!("Unable to parse {}", self.data_path.display()))
    }

    async fn write_entries(&self, entries: &[RawEntry]) -> Result<()> {
        let json =
            serde_json::to_string_pretty(entries).context("Unable to serialize the entries")?;
        utils::replace(&self.data_path, json).await
    }
}

/// The lowercase hex SHA-256 digest of `password`.
fn digest(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

#[async_trait::async_trait]
impl Gateway for FileGateway {
    async fn is_password_set(&self) -> std::result::Result<bool, GatewayError> {
        utils::exists(&self.password_path)
            .await
            .map_err(GatewayError::failed)
    }

    async fn set_password(&self, password: &str) -> std::result::Result<String, GatewayError> {
        if password.is_empty() {
            return Err(GatewayError::EmptyPassword);
        }
        utils::write(&self.password_path, digest(password))
            .await
            .context("Unable to store the password")
            .map_err(GatewayError::failed)?;
        trace!("Wrote password digest to {}", self.password_path.display());
        Ok("The password has been set.".to_string())
    }

    async fn verify_password(&self, password: &str) -> std::result::Result<bool, GatewayError> {
        match self.check(password).await {
            Ok(()) => Ok(true),
            Err(GatewayError::WrongPassword) => Ok(false),
            Err(e) => Err(e),
        }
    }

    async fn load_data(&self, password: &str) -> std::result::Result<Vec<RawEntry>, GatewayError> {
        self.check(password).await?;
        self.read_entries().await.map_err(GatewayError::failed)
    }

    async fn save_data(
        &self,
        entries: &[RawEntry],
        password: &str,
    ) -> std::result::Result<String, GatewayError> {
        self.check(password).await?;
        self.write_entries(entries)
            .await
            .map_err(GatewayError::failed)?;
        debug!(
            "Saved {} entries to {}",
            entries.len(),
            self.data_path.display()
        );
        Ok(format!("Saved {} entries.", entries.len()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RawAmount;
    use tempfile::TempDir;

    fn gateway(dir: &TempDir) -> FileGateway {
        FileGateway::with_paths(
            dir.path().join("password.hash"),
            dir.path().join("data.json"),
        )
    }

    #[test]
    fn test_digest() {
        assert_eq!(
            digest("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[tokio::test]
    async fn test_password_lifecycle() {
        let dir = TempDir::new().unwrap();
        let gateway = gateway(&dir);
        assert!(!gateway.is_password_set().await.unwrap());
        assert_eq!(
            gateway.set_password("").await.unwrap_err(),
            GatewayError::EmptyPassword
        );
        gateway.set_password("hunter2").await.unwrap();
        assert!(gateway.is_password_set().await.unwrap());
        assert!(gateway.verify_password("hunter2").await.unwrap());
        assert!(!gateway.verify_password("hunter3").await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_without_password_fails() {
        let dir = TempDir::new().unwrap();
        let gateway = gateway(&dir);
        assert!(matches!(
            gateway.verify_password("x").await,
            Err(GatewayError::Failed(_))
        ));
    }

    #[tokio::test]
    async fn test_load_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let gateway = gateway(&dir);
        gateway.set_password("pw").await.unwrap();
        assert!(gateway.load_data("pw").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let gateway = gateway(&dir);
        gateway.set_password("pw").await.unwrap();
        let entries = vec![
            RawEntry::new("2024-01-05", "Income", RawAmount::Unsigned(1000)),
            RawEntry::new("2024-01-10", "expense", RawAmount::Text("300".into())),
        ];
        let message = gateway.save_data(&entries, "pw").await.unwrap();
        assert_eq!(message, "Saved 2 entries.");

        let loaded = gateway.load_data("pw").await.unwrap();
        assert_eq!(loaded, entries);
        assert!(!dir.path().join("data.json.tmp").exists());
    }

    #[tokio::test]
    async fn test_failed_save_keeps_previous_data() {
        let dir = TempDir::new().unwrap();
        let gateway = gateway(&dir);
        gateway.set_password("pw").await.unwrap();
        let entries = vec![RawEntry::new("2024-01-05", "income", RawAmount::Unsigned(1000))];
        gateway.save_data(&entries, "pw").await.unwrap();

        // A directory in the way of the temporary file makes the next write fail.
        std::fs::create_dir(dir.path().join("data.json.tmp")).unwrap();
        assert!(matches!(
            gateway.save_data(&[], "pw").await,
            Err(GatewayError::Failed(_))
        ));
        assert_eq!(gateway.load_data("pw").await.unwrap(), entries);
    }

    #[tokio::test]
    async fn test_wrong_password_does_not_touch_data() {
        let dir = TempDir::new().unwrap();
        let gateway = gateway(&dir);
        gateway.set_password("pw").await.unwrap();
        assert_eq!(
            gateway.save_data(&[], "nope").await.unwrap_err(),
            GatewayError::WrongPassword
        );
        assert!(!gateway.data_path().exists());
        assert_eq!(
            gateway.load_data("nope").await.unwrap_err(),
            GatewayError::WrongPassword
        );
    }

    #[tokio::test]
    async fn test_load_accepts_string_amounts() {
        let dir = TempDir::new().unwrap();
        let gateway = gateway(&dir);
        gateway.set_password("pw").await.unwrap();
        utils::write(
            gateway.data_path(),
            r#"[{"date": "2023-04-01", "type": "expense", "amount": "42"}]"#,
        )
        .await
        .unwrap();
        let loaded = gateway.load_data("pw").await.unwrap();
        assert_eq!(loaded[0].amount, RawAmount::Text("42".to_string()));
    }

    #[tokio::test]
    async fn test_load_corrupt_file_fails() {
        let dir = TempDir::new().unwrap();
        let gateway = gateway(&dir);
        gateway.set_password("pw").await.unwrap();
        utils::write(gateway.data_path(), "{not json").await.unwrap();
        assert!(matches!(
            gateway.load_data("pw").await,
            Err(GatewayError::Failed(_))
        ));
    }
}
