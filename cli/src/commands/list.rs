//! # `sda list`
//!
//! File: cli/src/commands/list.rs
//!
//! Lists running services by default. `--available` shows the catalog,
//! `--created` every sda container, `--stopped` exited ones.
//!
use super::{GlobalOptions, Session};
use crate::common::ui::output;
use crate::core::error::Result;
use crate::core::orchestrator::ListFilter;
use clap::{ArgGroup, Parser};

#[derive(Parser, Debug)]
#[command(about = "List services")]
#[command(group(ArgGroup::new("filter").args(["available", "created", "running", "stopped"])))]
pub struct ListArgs {
    /// Services defined in the configuration
    #[arg(short, long)]
    available: bool,
    /// All sda containers, in any state
    #[arg(short, long)]
    created: bool,
    /// Running containers (default)
    #[arg(short, long)]
    running: bool,
    /// Stopped containers
    #[arg(short, long)]
    stopped: bool,
}

impl ListArgs {
    fn filter(&self) -> ListFilter {
        if self.available {
            ListFilter::Available
        } else if self.created {
            ListFilter::Created
        } else if self.stopped {
            ListFilter::Stopped
        } else {
            ListFilter::Running
        }
    }
}

pub async fn handle_list(args: ListArgs, globals: &GlobalOptions) -> Result<()> {
    let filter = args.filter();
    let session = Session::open(globals)?;
    let services = session.orchestrator().list(filter).await?;
    output::render_list(&services, filter == ListFilter::Available, globals.output)
}
