//! Configuration file handling for budget-book.
//!
//! The configuration file is stored at `$BUDGET_BOOK_HOME/config.json` and names the files that
//! hold the password digest and the entries, plus the year shown by default.

use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "budget-book";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";
const DATA_JSON: &str = "budget_book_data.json";
const PASSWORD_HASH: &str = "password.hash";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$BUDGET_BOOK_HOME` and from there it loads `$BUDGET_BOOK_HOME/config.json`. It
/// provides the paths of the files the file gateway reads and writes.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the home directory, if needed, and an initial `config.json` with default settings.
    ///
    /// # Errors
    /// - Returns an error if any file operations fail.
    /// - Returns an error if `config.json` already exists, so an existing setup is never
    ///   overwritten.
    pub async fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the budget-book home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if utils::exists(&config_path).await? {
            bail!(
                "A config file already exists at '{}'",
                config_path.display()
            );
        }

        let config_file = ConfigFile::default();
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    /// This will
    /// - validate that the home directory exists and that the config file exists
    /// - load and validate the config file
    /// - return the loaded configuration object
    pub async fn load(home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The budget-book home directory is missing, run 'budget-book init'")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!("The config file is missing '{}'", config_path.display())
        }
        let config_file = ConfigFile::load(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// The year to show when none is given on the command line.
    pub fn default_year(&self) -> Option<i32> {
        self.config_file.default_year
    }

    /// Returns the stored `data_file` if it is absolute, otherwise resolves the relative path.
    pub fn data_path(&self) -> PathBuf {
        self.resolve(self.config_file.data_file())
    }

    /// Returns the stored `password_file` if it is absolute, otherwise resolves the relative path.
    pub fn password_path(&self) -> PathBuf {
        self.resolve(self.config_file.password_file())
    }

    fn resolve(&self, p: PathBuf) -> PathBuf {
        if p.is_absolute() {
            return p;
        }
        self.root.join(p)
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "budget-book",
///   "config_version": 1,
///   "data_file": "budget_book_data.json",
///   "password_file": "password.hash",
///   "default_year": null
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "budget-book"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Path to the entries file (relative to the home directory or absolute)
    #[serde(default)]
    data_file: Option<PathBuf>,

    /// Path to the password digest (relative to the home directory or absolute)
    #[serde(default)]
    password_file: Option<PathBuf>,

    /// The year shown when none is requested; the current year when null
    #[serde(default)]
    default_year: Option<i32>,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            data_file: Some(PathBuf::from(DATA_JSON)),
            password_file: Some(PathBuf::from(PASSWORD_HASH)),
            default_year: None,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from `path` and checks that it belongs to this app.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let config: ConfigFile = utils::deserialize(path.as_ref()).await?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(path, data)
            .await
            .context("Unable to write config file")
    }

    fn data_file(&self) -> PathBuf {
        self.data_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(DATA_JSON))
    }

    fn password_file(&self) -> PathBuf {
        self.password_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(PASSWORD_HASH))
    }
}
