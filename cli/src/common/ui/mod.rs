//! # SDA UI Utilities Module (`common::ui`)
//!
//! File: cli/src/common/ui/mod.rs
//!
//! ## Overview
//!
//! Terminal-facing pieces the command handlers use to talk to the user:
//!
//! - **`prompt`**: the `Prompter` trait and its `dialoguer` implementation.
//! - **`table`**: `tabled` renderings of service lists and details.
//! - **`output`**: text/JSON switching, error printing and action reports.
//!
//! The orchestrator only sees `Prompter`; everything else is applied to the
//! plain data it returns.
//!

pub mod output;
pub mod prompt;
pub mod table;
