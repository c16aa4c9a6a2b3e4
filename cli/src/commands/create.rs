//! # `sda create`
//!
//! File: cli/src/commands/create.rs
//!
//! Creates and starts a service. Plain services get a `{prefix}-{name}`
//! container on the configured network; compose services are brought up with
//! `docker compose up -d`.
//!
//! ```bash
//! sda create postgres
//! sda create postgres --version 16 --port 15432:5432 -e TZ=UTC
//! sda create postgres --recreate --volumes -y
//! sda new stack --build
//! ```
//!
use super::{GlobalOptions, Session};
use crate::common::ui::output;
use crate::core::error::Result;
use crate::core::orchestrator::CreateRequest;
use clap::Parser;
use tracing::info;

#[derive(Parser, Debug)]
#[command(about = "Create and start a service")]
pub struct CreateArgs {
    /// Service name from the configuration
    service: String,

    /// Network to attach the container to
    #[arg(short, long)]
    network: Option<String>,

    /// Password substituted into the service definition
    #[arg(short, long)]
    password: Option<String>,

    /// Image tag to use instead of the configured default
    #[arg(long = "version", value_name = "TAG")]
    image_version: Option<String>,

    /// Port mapping, HOST:CONTAINER or IP:HOST:CONTAINER (repeatable)
    #[arg(long = "port", action = clap::ArgAction::Append)]
    ports: Vec<String>,

    /// Volume, SOURCE:TARGET (repeatable)
    #[arg(long = "volume", action = clap::ArgAction::Append)]
    volumes: Vec<String>,

    /// Environment variable, KEY=VALUE (repeatable)
    #[arg(short, long = "env", action = clap::ArgAction::Append)]
    env: Vec<String>,

    /// Remove an existing container first
    #[arg(long)]
    recreate: bool,

    /// With --recreate, also remove the service's named volumes
    #[arg(long = "volumes")]
    purge_volumes: bool,

    /// Compose services: build images before starting
    #[arg(long)]
    build: bool,

    /// Create the container without starting it
    #[arg(long)]
    no_start: bool,
}

impl From<CreateArgs> for CreateRequest {
    fn from(args: CreateArgs) -> Self {
        CreateRequest {
            name: args.service,
            network: args.network,
            password: args.password,
            version: args.image_version,
            ports: args.ports,
            volumes: args.volumes,
            env: args.env,
            recreate: args.recreate,
            purge_volumes: args.purge_volumes,
            build: args.build,
            no_start: args.no_start,
        }
    }
}

pub async fn handle_create(args: CreateArgs, globals: &GlobalOptions) -> Result<()> {
    info!("Handling create for '{}'", args.service);
    let session = Session::open(globals)?;
    let mut orchestrator = session.orchestrator();
    let outcome = orchestrator.create(args.into()).await?;
    output::render_created(&outcome, globals.output)
}
