//! # `sda show`
//!
//! File: cli/src/commands/show.rs
//!
use super::{GlobalOptions, Session};
use crate::common::ui::output;
use crate::core::error::Result;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(about = "Show details of a service container")]
pub struct ShowArgs {
    /// Service name from the configuration
    service: String,
}

pub async fn handle_show(args: ShowArgs, globals: &GlobalOptions) -> Result<()> {
    let session = Session::open(globals)?;
    let info = session.orchestrator().show(&args.service).await?;
    output::render_info(&info, globals.output)
}
