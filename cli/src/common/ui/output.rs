//! # SDA Output Rendering
//!
//! File: cli/src/common/ui/output.rs
//!
//! Result data goes to stdout, either as text or as pretty JSON. Errors always
//! go to stderr; in JSON mode they are an `{"error": "..."}` object.
//!
use crate::common::docker::ServiceInfo;
use crate::common::ui::table;
use crate::core::error::{Result, SdaError};
use crate::core::orchestrator::{ActionReport, CreateOutcome, PasswordNotice};
use anyhow::{anyhow, Context};
use colored::Colorize;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Text,
    Json,
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize output")
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", to_json(value)?);
    Ok(())
}

pub fn error_json(err: &anyhow::Error) -> String {
    serde_json::json!({ "error": format!("{:#}", err) }).to_string()
}

/// Printed on stdout when a confirmation is declined.
pub fn aborted_message(mode: OutputMode) -> String {
    match mode {
        OutputMode::Json => serde_json::json!({ "aborted": true }).to_string(),
        OutputMode::Text => "Aborted.".to_string(),
    }
}

pub fn print_error(err: &anyhow::Error, mode: OutputMode) {
    match mode {
        OutputMode::Json => eprintln!("{}", error_json(err)),
        OutputMode::Text => eprintln!("{} {:#}", "Error:".red().bold(), err),
    }
}

/// Prints a list; `available` selects the catalog layout.
pub fn render_list(services: &[ServiceInfo], available: bool, mode: OutputMode) -> Result<()> {
    match mode {
        OutputMode::Json => print_json(services),
        OutputMode::Text => {
            let text = if available {
                table::render_available(services)
            } else {
                table::render_services(services)
            };
            println!("{}", text);
            Ok(())
        }
    }
}

pub fn render_info(info: &ServiceInfo, mode: OutputMode) -> Result<()> {
    match mode {
        OutputMode::Json => print_json(info),
        OutputMode::Text => {
            println!("{}", table::render_details(info));
            Ok(())
        }
    }
}

pub fn render_created(outcome: &CreateOutcome, mode: OutputMode) -> Result<()> {
    match mode {
        OutputMode::Json => print_json(outcome),
        OutputMode::Text => {
            println!("{}", created_text(outcome));
            Ok(())
        }
    }
}

fn created_text(outcome: &CreateOutcome) -> String {
    let mut lines = Vec::new();
    match &outcome.password {
        Some(PasswordNotice::Custom) => {
            lines.push(format!("Creating '{}' using a custom password.", outcome.display_name));
        }
        Some(PasswordNotice::Default { password }) => {
            lines.push(format!(
                "Creating '{}' using the default password '{}'.",
                outcome.display_name, password
            ));
            lines.push(format!(
                "For a custom password run again with: sda new {} -p <PASSWORD>",
                outcome.service
            ));
        }
        None => {}
    }
    for volume in &outcome.volumes_removed {
        lines.push(format!("  removed volume {}", volume));
    }
    if let Some(network) = &outcome.network_created {
        lines.push(format!("  created network {}", network));
    }
    if let Some(image) = &outcome.image_pulled {
        lines.push(format!("  pulled image {}", image));
    }
    let verb = if outcome.recreated { "recreated" } else { "created" };
    let state = if outcome.started { " and started" } else { "" };
    lines.push(format!(
        "{} Service '{}' {}{}.",
        "✔".green(),
        outcome.display_name,
        verb,
        state
    ));
    lines.join("\n")
}

/// Prints the report, then fails with `PartialFailure` if any item failed.
pub fn render_action(report: &ActionReport, mode: OutputMode) -> Result<()> {
    match mode {
        OutputMode::Json => print_json(report)?,
        OutputMode::Text => {
            if report.succeeded.is_empty() && report.failed.is_empty() {
                println!("{}", table::EMPTY_MESSAGE);
            }
            for name in &report.succeeded {
                println!("{} {} {}", "✔".green(), report.action, name);
            }
            for volume in &report.volumes_removed {
                println!("  removed volume {}", volume);
            }
            for volume in &report.volumes_kept {
                println!("  kept volume {} (pass --volumes to remove it)", volume);
            }
            for failure in &report.failed {
                println!("{} {}: {}", "✘".red(), failure.name, failure.error);
            }
        }
    }
    if report.has_failures() {
        return Err(anyhow!(SdaError::PartialFailure {
            failed: report.failed.iter().map(|f| f.name.clone()).collect()
        }));
    }
    Ok(())
}
