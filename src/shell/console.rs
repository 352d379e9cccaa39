//! Terminal input and colored output for the shell.

use crate::error::{DeskError, Result};
use crate::session::Operator;
use dialoguer::{Confirm, Input};
use owo_colors::OwoColorize;
use std::io::{self, Write};

/// Everything the shell reads from the operator.
pub trait Terminal: Operator {
    /// Show `prompt` and read one command line. `None` at end of input.
    fn read_command(&mut self, prompt: &str) -> Result<Option<String>>;
}

/// Interactive terminal on stdin/stdout.
///
/// Command lines are read from stdin, but the credential and overwrite
/// prompts go through `dialoguer`, which needs a real terminal. With piped
/// input those prompts fail with a `PromptError`; use `deskscript compose`
/// for non-interactive runs.
#[derive(Debug, Default)]
pub struct Console;

impl Operator for Console {
    fn confirm(&mut self, prompt: &str) -> Result<bool> {
        Confirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|e| DeskError::PromptError(format!("failed to get user input: {}", e)))
    }

    fn input(&mut self, prompt: &str) -> Result<String> {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| DeskError::PromptError(format!("failed to get user input: {}", e)))
    }
}

impl Terminal for Console {
    fn read_command(&mut self, prompt: &str) -> Result<Option<String>> {
        let mut stdout = io::stdout();
        write!(stdout, "{}", prompt)
            .and_then(|_| stdout.flush())
            .map_err(|e| DeskError::IoError(format!("failed to write prompt: {}", e)))?;

        let mut line = String::new();
        let read = io::stdin()
            .read_line(&mut line)
            .map_err(|e| DeskError::PromptError(format!("failed to read command: {}", e)))?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }
}

/// Colors used for operator messages. Disabled palettes return plain text.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn green(&self, text: &str) -> String {
        self.paint(text, |t| t.green().to_string())
    }

    pub fn red(&self, text: &str) -> String {
        self.paint(text, |t| t.red().to_string())
    }

    pub fn yellow(&self, text: &str) -> String {
        self.paint(text, |t| t.yellow().to_string())
    }

    pub fn blue(&self, text: &str) -> String {
        self.paint(text, |t| t.blue().to_string())
    }

    fn paint(&self, text: &str, color: impl Fn(&str) -> String) -> String {
        if self.enabled {
            color(text)
        } else {
            text.to_string()
        }
    }
}
