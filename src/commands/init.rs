use crate::api::{gateway, open_session, Mode, PasswordSource, Persistence};
use crate::commands::Out;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the home directory and `config.json`, then asks for a password and stores it.
///
/// # Arguments
/// - `home` - The directory that will hold the configuration and the ledger, e.g.
///   `$HOME/budget-book`
/// - `mode` - Which gateway stores the password
/// - `passwords` - Where the new password comes from
///
/// # Errors
/// - Returns an error if any file operations fail or the home directory is already set up.
/// - Returns an error if no password is provided.
pub async fn init(
    home: &Path,
    mode: Mode,
    passwords: &mut dyn PasswordSource,
) -> Result<Out<()>> {
    let config = Config::create(home)
        .await
        .context("Unable to create the home directory and config")?;
    let persistence = Persistence::new(gateway(&config, mode));
    let session = open_session(&persistence, passwords).await?;
    Ok(format!(
        "Successfully created the budget-book directory at {} ({} entries)",
        config.root().display(),
        session.entries.len()
    )
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{FileGateway, FixedPassword, Gateway};
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_sets_password() {
        let dir = TempDir::new().unwrap();
        let home = dir.path().join("budget-book");
        let out = init(&home, Mode::Files, &mut FixedPassword::new("pw"))
            .await
            .unwrap();
        assert!(out.message().contains("Successfully created"));

        let config = Config::load(&home).await.unwrap();
        assert!(config.password_path().is_file());
        let gateway = FileGateway::new(&config);
        assert!(gateway.verify_password("pw").await.unwrap());
    }

    #[tokio::test]
    async fn test_init_twice_fails() {
        let dir = TempDir::new().unwrap();
        init(dir.path(), Mode::Files, &mut FixedPassword::new("pw"))
            .await
            .unwrap();
        assert!(init(dir.path(), Mode::Files, &mut FixedPassword::new("pw"))
            .await
            .is_err());
    }
}
