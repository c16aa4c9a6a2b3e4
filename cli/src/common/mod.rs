//! # SDA Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//!
//! ## Overview
//!
//! Infrastructure shared by the command handlers and the orchestrator:
//!
//! - **`docker`**: container engine and compose access.
//! - **`process`**: running external programs (`docker exec`, `docker compose`,
//!   URL openers).
//! - **`ui`**: confirmation prompts, tables and JSON output.
//!
//! Nothing in here decides *what* to do with a service; that belongs to
//! `core::orchestrator`.
//!

pub mod docker;
pub mod process;
pub mod ui;
