//! # `sda remove`
//!
//! File: cli/src/commands/remove.rs
//!
//! Force-removes service containers, or runs `docker compose down` for
//! compose services. `--volumes` also removes the configured named volumes
//! (best effort; bind mounts are never touched).
//!
use super::{GlobalOptions, Session, TargetArgs};
use crate::common::ui::output;
use crate::core::error::Result;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(about = "Remove a service, or several with --all/--running/--stopped")]
pub struct RemoveArgs {
    #[command(flatten)]
    target: TargetArgs,

    /// Also remove the service's named volumes
    #[arg(long)]
    volumes: bool,
}

pub async fn handle_remove(args: RemoveArgs, globals: &GlobalOptions) -> Result<()> {
    let target = args.target.into_target()?;
    let session = Session::open(globals)?;
    let report = session.orchestrator().remove(target, args.volumes).await?;
    output::render_action(&report, globals.output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::orchestrator::Target;

    #[test]
    fn test_remove_args() {
        let args = RemoveArgs::try_parse_from(["remove", "--all", "--volumes"]).unwrap();
        assert!(args.volumes);
        assert_eq!(args.target.into_target().unwrap(), Target::All);
    }
}
