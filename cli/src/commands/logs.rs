//! # `sda logs`
//!
//! File: cli/src/commands/logs.rs
//!
//! Streams container logs. For compose services every container of the
//! project is streamed, each line prefixed with its container name.
//! With `--follow`, Ctrl-C ends the stream and exits cleanly.
//!
use super::{GlobalOptions, Session};
use crate::common::docker::LogOptions;
use crate::core::error::{Result, SdaError};
use anyhow::anyhow;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(about = "Show the logs of a service")]
pub struct LogsArgs {
    /// Service name from the configuration
    service: String,

    /// Keep streaming new output
    #[arg(short, long)]
    follow: bool,

    /// Number of lines to show from the end, or `all`
    #[arg(long, default_value = "100")]
    tail: String,

    /// Prefix lines with timestamps
    #[arg(short, long)]
    timestamps: bool,
}

impl LogsArgs {
    fn options(&self) -> Result<LogOptions> {
        if self.tail != "all" && self.tail.parse::<u64>().is_err() {
            return Err(anyhow!(SdaError::Validation(format!(
                "--tail must be a number or 'all', got '{}'",
                self.tail
            ))));
        }
        Ok(LogOptions {
            follow: self.follow,
            tail: self.tail.clone(),
            timestamps: self.timestamps,
        })
    }
}

pub async fn handle_logs(args: LogsArgs, globals: &GlobalOptions) -> Result<()> {
    let options = args.options()?;
    let session = Session::open(globals)?;
    session.orchestrator().logs(&args.service, &options).await
}
