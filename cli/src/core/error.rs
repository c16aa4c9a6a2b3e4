//! # SDA Error Types
//!
//! File: cli/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error taxonomy shared by every layer of `sda`.
//! Errors are raised as `SdaError` variants and carried through the
//! application inside `anyhow::Error`, which lets call sites attach context
//! ("Failed to start container 'sda-postgres'") while callers further up can
//! still recover the variant with `downcast_ref`.
//!
//! ## Architecture
//!
//! - `SdaError`: the `thiserror` enum covering catalog and engine lookup failures, identity
//!   conflicts, input validation, engine failures and user aborts.
//! - `Result<T>`: alias for `anyhow::Result<T>`.
//! - `SdaError::find`: walks an `anyhow` chain and returns the first `SdaError`.
//!
//! ## Examples
//!
//! ```rust
//! return Err(anyhow!(SdaError::NotFound {
//!     kind: "Service",
//!     name: name.to_string(),
//! }));
//!
//! match SdaError::find(&err) {
//!     Some(SdaError::Aborted) => println!("Aborted."),
//!     _ => eprintln!("Error: {:#}", err),
//! }
//! ```
//!
use thiserror::Error;

/// Custom error type for the sda application.
#[derive(Error, Debug)]
pub enum SdaError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// A service unknown to the configuration, or an engine resource that is absent.
    #[error("{kind} '{name}' not found.")]
    NotFound { kind: &'static str, name: String },

    /// A name that is not in the service catalog.
    #[error("Service '{name}' not found. Available services: {}.", .available.join(", "))]
    UnknownService {
        name: String,
        available: Vec<String>,
    },

    #[error("Service '{name}' already exists, use --recreate to replace it.")]
    AlreadyExists { name: String },

    /// Malformed override flags, conflicting bulk flags, compose path mismatches.
    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Docker API interaction failed: {source}")]
    DockerApi {
        #[from]
        source: bollard::errors::Error,
    },

    #[error("External command failed: {cmd}, Status: {status}, Output:\n{output}")]
    ExternalCommand {
        cmd: String,
        status: String,
        output: String,
    },

    /// A confirmation prompt was declined. Not treated as a failure.
    #[error("Aborted by user.")]
    Aborted,

    #[error("{} service(s) failed: {}", .failed.len(), .failed.join(", "))]
    PartialFailure { failed: Vec<String> },
}

impl SdaError {
    /// Returns the first `SdaError` found anywhere in the error chain.
    pub fn find(err: &anyhow::Error) -> Option<&SdaError> {
        err.chain().find_map(|cause| cause.downcast_ref::<SdaError>())
    }

    /// True when the error chain carries `SdaError::Aborted`.
    pub fn is_aborted(err: &anyhow::Error) -> bool {
        matches!(Self::find(err), Some(SdaError::Aborted))
    }
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
