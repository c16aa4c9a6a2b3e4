//! # SDA Command Handlers (`commands`)
//!
//! File: cli/src/commands/mod.rs
//!
//! ## Overview
//!
//! One module per top-level verb. Each defines its clap argument struct and
//! a `handle_*` function that:
//!
//! 1. opens a `Session` (configuration plus Docker-backed engines that
//!    connect on their first call),
//! 2. turns its arguments into an orchestrator call,
//! 3. renders the returned data through `common::ui::output`.
//!
//! Handlers never talk to bollard directly.
//!
use crate::common::docker::connect::LazyDocker;
use crate::common::docker::{ComposeCli, DockerEngine};
use crate::common::ui::output::OutputMode;
use crate::common::ui::prompt::DialoguerPrompter;
use crate::core::config::{self, Config};
use crate::core::error::Result;
use crate::core::orchestrator::{Orchestrator, Target};
use clap::Args;
use std::rc::Rc;
use tracing::debug;

pub mod connect;
pub mod create;
pub mod list;
pub mod logs;
pub mod remove;
pub mod show;
pub mod start;
pub mod stop;

/// Flags shared by every command.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub config: Option<String>,
    pub assume_yes: bool,
    pub output: OutputMode,
}

/// `[service]` or one of the bulk flags, for start/stop/remove.
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Service name from the configuration
    pub service: Option<String>,
    /// Every sda container, in any state
    #[arg(long)]
    pub all: bool,
    /// Every running sda container
    #[arg(long)]
    pub running: bool,
    /// Every stopped sda container
    #[arg(long)]
    pub stopped: bool,
}

impl TargetArgs {
    pub fn into_target(self) -> Result<Target> {
        Target::from_flags(self.service, self.all, self.running, self.stopped)
    }
}

/// Configuration and engines for one invocation.
pub struct Session {
    config: Config,
    engine: DockerEngine,
    compose: ComposeCli,
    prompter: DialoguerPrompter,
    assume_yes: bool,
}

impl Session {
    pub fn open(globals: &GlobalOptions) -> Result<Self> {
        let config = config::load_config(globals.config.as_deref())?;
        debug!("Session opened with prefix '{}'", config.prefix);
        let docker = Rc::new(LazyDocker::new());
        Ok(Self {
            config,
            engine: DockerEngine::new(Rc::clone(&docker)),
            compose: ComposeCli::new(docker),
            prompter: DialoguerPrompter,
            assume_yes: globals.assume_yes,
        })
    }

    pub fn orchestrator(&self) -> Orchestrator<'_> {
        Orchestrator::new(
            self.config.clone(),
            &self.engine,
            &self.compose,
            &self.prompter,
            self.assume_yes,
        )
    }
}
