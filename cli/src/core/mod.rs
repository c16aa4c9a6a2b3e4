//! # SDA Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//!
//! ## Overview
//!
//! The core holds the pieces every command depends on:
//! - `config`: the service catalog, loaded from `sda.toml`
//! - `error`: the `SdaError` taxonomy and the `Result` alias
//! - `templating`: `{{.KEY}}` placeholder expansion
//! - `orchestrator`: the lifecycle decision layer between commands and engines
//!
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod templating;
