//! Terminal input: hidden password prompts and the shell's line editor.

use crate::api::PasswordSource;
use crate::Result;
use anyhow::Context;
use dialoguer::Password;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::warn;

const MAX_ATTEMPTS: u32 = 3;

/// Asks for passwords on the terminal without echoing them. Gives up after three wrong answers.
#[derive(Debug, Default, Clone, Copy)]
pub struct PasswordPrompt;

impl PasswordPrompt {
    pub fn new() -> Self {
        Self
    }
}

fn ask(prompt: Password<'static>) -> Option<String> {
    match tokio::task::block_in_place(move || prompt.interact()) {
        Ok(password) => Some(password),
        Err(e) => {
            warn!("Unable to read the password: {e}");
            None
        }
    }
}

#[async_trait::async_trait]
impl PasswordSource for PasswordPrompt {
    async fn new_password(&mut self) -> Option<String> {
        ask(Password::new()
            .with_prompt("Choose a password")
            .with_confirmation("Repeat the password", "The passwords do not match"))
    }

    async fn password(&mut self, attempt: u32) -> Option<String> {
        if attempt > MAX_ATTEMPTS {
            return None;
        }
        ask(Password::new().with_prompt("Password"))
    }
}

/// Where the shell gets its input from.
pub trait LineSource {
    /// Shows `prompt` and reads one line. `None` means the input has ended.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Reads shell lines from the terminal with line editing and history.
pub struct LineEditor {
    editor: DefaultEditor,
}

impl LineEditor {
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new().context("Unable to set up the line editor")?;
        Ok(Self { editor })
    }
}

impl LineSource for LineEditor {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>> {
        match tokio::task::block_in_place(|| self.editor.readline(prompt)) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    self.editor.add_history_entry(line.as_str()).ok();
                }
                Ok(Some(line))
            }
            // Ctrl-C goes through the same unsaved-changes check as `quit`.
            Err(ReadlineError::Interrupted) => Ok(Some("quit".to_string())),
            Err(ReadlineError::Eof) => Ok(None),
            Err(e) => Err(e).context("Unable to read from the terminal"),
        }
    }
}
