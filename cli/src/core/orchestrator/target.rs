//! # Lifecycle Targets
//!
//! File: cli/src/core/orchestrator/target.rs
//!
//! `start`, `stop` and `remove` act on one named service or on a set picked
//! by a bulk flag. Exactly one of the two must be given.
//!
use crate::core::error::{Result, SdaError};
use anyhow::anyhow;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    One(String),
    /// Every container in the prefix namespace.
    All,
    Running,
    Stopped,
}

impl Target {
    pub fn from_flags(name: Option<String>, all: bool, running: bool, stopped: bool) -> Result<Self> {
        let bulk = [(all, Target::All), (running, Target::Running), (stopped, Target::Stopped)]
            .into_iter()
            .filter(|(set, _)| *set)
            .map(|(_, t)| t)
            .collect::<Vec<_>>();
        match (name, bulk.as_slice()) {
            (Some(name), []) => Ok(Target::One(name)),
            (None, [target]) => Ok(target.clone()),
            (None, []) => Err(anyhow!(SdaError::Validation(
                "name a service or pass one of --all, --running, --stopped".to_string()
            ))),
            (Some(_), _) => Err(anyhow!(SdaError::Validation(
                "a service name cannot be combined with --all, --running or --stopped".to_string()
            ))),
            (None, _) => Err(anyhow!(SdaError::Validation(
                "--all, --running and --stopped are mutually exclusive".to_string()
            ))),
        }
    }
}
