//! # SDA Confirmation Prompts
//!
//! File: cli/src/common/ui/prompt.rs
//!
//! The orchestrator asks yes/no questions through `Prompter`, so tests can
//! script the answers. `DialoguerPrompter` is the terminal implementation.
//!
use crate::core::error::Result;
use anyhow::Context;
use dialoguer::{theme::ColorfulTheme, Confirm};
use std::io::IsTerminal;
use tracing::debug;

pub trait Prompter {
    /// Asks `question`; `true` means proceed.
    fn confirm(&self, question: &str) -> Result<bool>;
}

/// Interactive yes/no on the controlling terminal. Defaults to "no".
pub struct DialoguerPrompter;

impl Prompter for DialoguerPrompter {
    fn confirm(&self, question: &str) -> Result<bool> {
        if !std::io::stdin().is_terminal() {
            // No one to ask; treat as declined so nothing destructive runs unattended.
            debug!("stdin is not a terminal, declining: {}", question);
            return Ok(false);
        }
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(question)
            .default(false)
            .interact()
            .context("Failed to read confirmation")
    }
}
