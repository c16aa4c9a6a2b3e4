//! # `sda start`
//!
//! File: cli/src/commands/start.rs
//!
//! Starts one service, or every created/stopped one with a bulk flag.
//!
use super::{GlobalOptions, Session, TargetArgs};
use crate::common::ui::output;
use crate::core::error::Result;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(about = "Start a service, or several with --all/--running/--stopped")]
pub struct StartArgs {
    #[command(flatten)]
    target: TargetArgs,
}

pub async fn handle_start(args: StartArgs, globals: &GlobalOptions) -> Result<()> {
    let target = args.target.into_target()?;
    let session = Session::open(globals)?;
    let report = session.orchestrator().start(target).await?;
    output::render_action(&report, globals.output)
}
