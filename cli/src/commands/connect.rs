//! # `sda connect`
//!
//! File: cli/src/commands/connect.rs
//!
//! Opens the service's CLI client inside its container (`docker exec -it`),
//! or its web interface with `--web`.
//!
use super::{GlobalOptions, Session};
use crate::core::error::Result;
use clap::Parser;

#[derive(Parser, Debug)]
#[command(about = "Connect to a service's CLI client or web interface")]
pub struct ConnectArgs {
    /// Service name from the configuration
    service: String,

    /// Open the web interface instead of the CLI client
    #[arg(short, long)]
    web: bool,

    /// Password to use instead of the configured one
    #[arg(short, long)]
    password: Option<String>,
}

pub async fn handle_connect(args: ConnectArgs, globals: &GlobalOptions) -> Result<()> {
    let session = Session::open(globals)?;
    session
        .orchestrator()
        .connect(&args.service, args.web, args.password.as_deref())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connect_args() {
        let args = ConnectArgs::try_parse_from(["connect", "neo4j", "-w"]).unwrap();
        assert!(args.web);
        assert!(args.password.is_none());
        let args = ConnectArgs::try_parse_from(["connect", "postgres", "-p", "x"]).unwrap();
        assert_eq!(args.password.as_deref(), Some("x"));
    }
}
