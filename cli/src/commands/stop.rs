//! # `sda stop`
//!
//! File: cli/src/commands/stop.rs
//!
use super::{GlobalOptions, Session, TargetArgs};
use crate::common::ui::output;
use crate::core::error::Result;
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(about = "Stop a service, or several with --all/--running/--stopped")]
pub struct StopArgs {
    #[command(flatten)]
    target: TargetArgs,
}

pub async fn handle_stop(args: StopArgs, globals: &GlobalOptions) -> Result<()> {
    let target = args.target.into_target()?;
    info!("Handling stop for {:?}", target);
    let session = Session::open(globals)?;
    let report = session.orchestrator().stop(target).await?;
    output::render_action(&report, globals.output)
}
