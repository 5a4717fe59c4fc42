//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::commands::LineSource;
use crate::{utils, Config, Result};
use std::collections::VecDeque;
use tempfile::TempDir;

/// Test environment that sets up a budget-book home directory with a Config.
/// Holds TempDir to keep the directory alive for the duration of the test.
pub struct TestEnv {
    _temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    /// Creates a test environment with a freshly created Config.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("budget-book");
        let config = Config::create(&root).await.unwrap();
        Self {
            _temp_dir: temp_dir,
            config,
        }
    }

    /// Creates a test environment whose config sets `default_year`.
    pub async fn with_default_year(year: i32) -> Self {
        let env = Self::new().await;
        let path = env.config.config_path().to_path_buf();
        let mut json: serde_json::Value = utils::deserialize(&path).await.unwrap();
        json["default_year"] = year.into();
        utils::write(&path, serde_json::to_string_pretty(&json).unwrap())
            .await
            .unwrap();
        let config = Config::load(env.config.root()).await.unwrap();
        Self { config, ..env }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

/// Feeds the shell a fixed script and records the prompts it showed.
pub struct ScriptedLines {
    lines: VecDeque<String>,
    pub prompts: Vec<String>,
}

impl ScriptedLines {
    pub fn new(script: &str) -> Self {
        Self {
            lines: script.lines().map(str::to_string).collect(),
            prompts: Vec::new(),
        }
    }
}

impl LineSource for ScriptedLines {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        self.prompts.push(prompt.to_string());
        Ok(self.lines.pop_front())
    }
}
