//! # SDA Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! Entry point of the `sda` CLI. It handles:
//! - command-line parsing with clap,
//! - logging setup from the verbosity flags,
//! - routing to the command handlers,
//! - turning errors into exit codes.
//!
//! ## Examples
//!
//! ```bash
//! sda list --available
//! sda create postgres -y
//! sda -vv logs postgres -f
//! sda --json list --created
//! ```
//!
//! Exit codes: `0` on success and when a confirmation is declined ("Aborted.",
//! or `{"aborted": true}` with `--json`), `1` for every other error.
//!
use clap::{Parser, ValueEnum};
use crate::common::ui::output::{self, OutputMode};
use crate::core::error::SdaError;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod common;
mod core;
#[cfg(test)]
mod test_support;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Table,
    Json,
}

#[derive(Parser, Debug)]
#[command(
    name = "sda",
    about = "Self-hosted service containers on demand",
    long_about = "Create, start, stop and remove pre-configured service containers \
                  (databases, caches, brokers) and compose stacks on this host.",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (default: the platform config dir, sda/sda.toml)
    #[arg(long, global = true, env = "SDA_CONFIG")]
    config: Option<String>,

    /// Answer yes to every confirmation
    #[arg(short = 'y', long = "yes", global = true)]
    yes: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Output format
    #[arg(long, value_enum, global = true)]
    format: Option<Format>,

    /// Disable coloured output
    #[arg(long, global = true)]
    no_color: bool,
}

impl Cli {
    fn output_mode(&self) -> OutputMode {
        if self.json || self.format == Some(Format::Json) {
            OutputMode::Json
        } else {
            OutputMode::Text
        }
    }
}

#[derive(Parser, Debug)]
enum Commands {
    #[command(alias = "new")]
    Create(commands::create::CreateArgs),
    Start(commands::start::StartArgs),
    Stop(commands::stop::StopArgs),
    #[command(alias = "rm")]
    Remove(commands::remove::RemoveArgs),
    #[command(alias = "ls")]
    List(commands::list::ListArgs),
    Show(commands::show::ShowArgs),
    Logs(commands::logs::LogsArgs),
    Connect(commands::connect::ConnectArgs),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let globals = commands::GlobalOptions {
        config: cli.config.clone(),
        assume_yes: cli.yes,
        output: cli.output_mode(),
    };

    let command_result = match cli.command {
        Commands::Create(args) => commands::create::handle_create(args, &globals).await,
        Commands::Start(args) => commands::start::handle_start(args, &globals).await,
        Commands::Stop(args) => commands::stop::handle_stop(args, &globals).await,
        Commands::Remove(args) => commands::remove::handle_remove(args, &globals).await,
        Commands::List(args) => commands::list::handle_list(args, &globals).await,
        Commands::Show(args) => commands::show::handle_show(args, &globals).await,
        Commands::Logs(args) => commands::logs::handle_logs(args, &globals).await,
        Commands::Connect(args) => commands::connect::handle_connect(args, &globals).await,
    };

    if let Err(e) = command_result {
        if SdaError::is_aborted(&e) {
            println!("{}", output::aborted_message(globals.output));
            return Ok(());
        }
        tracing::debug!("Command execution failed: {:?}", e);
        output::print_error(&e, globals.output);
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["sda", "list", "--json", "-y", "-vv"]).unwrap();
        assert_eq!(cli.output_mode(), OutputMode::Json);
        assert!(cli.yes);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_aliases() {
        for alias in ["new", "rm", "ls"] {
            let argv: Vec<&str> = if alias == "ls" {
                vec!["sda", alias]
            } else {
                vec!["sda", alias, "postgres"]
            };
            assert!(Cli::try_parse_from(argv).is_ok(), "alias {}", alias);
        }
    }

    #[test]
    fn test_format_flag_selects_json() {
        let cli = Cli::try_parse_from(["sda", "--format", "json", "list"]).unwrap();
        assert_eq!(cli.output_mode(), OutputMode::Json);
        let cli = Cli::try_parse_from(["sda", "--format", "table", "list"]).unwrap();
        assert_eq!(cli.output_mode(), OutputMode::Text);
    }
}
