//! # SDA Process Execution Utilities (`common::process`)
//!
//! File: cli/src/common/process.rs
//!
//! ## Overview
//!
//! Thin wrappers around `tokio::process::Command` for the places where sda
//! hands control to another program:
//!
//! - **`run_interactive`**: inherits stdin/stdout/stderr so an interactive
//!   program (a database shell via `docker exec -it`) owns the terminal until
//!   it exits.
//! - **`run_captured`**: runs a command to completion, capturing stdout and
//!   stderr. Used for `docker compose`.
//! - **`open_url`**: opens a URL with the platform's default handler,
//!   including WSL, where the Windows side handles it.
//!
use crate::core::error::{Result, SdaError};
use anyhow::{anyhow, Context};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, instrument};

/// Runs `program args..` attached to the current terminal.
///
/// # Errors
///
/// * The program cannot be spawned (for example `docker` is not installed).
/// * `SdaError::ExternalCommand` when it exits non-zero.
#[instrument(skip(args))]
pub async fn run_interactive(program: &str, args: &[&str]) -> Result<()> {
    debug!("Running interactively: {} {:?}", program, args);
    let status = Command::new(program)
        .args(args)
        .stdin(Stdio::inherit())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .with_context(|| format!("Failed to launch '{}'", program))?;
    if status.success() {
        Ok(())
    } else {
        Err(anyhow!(SdaError::ExternalCommand {
            cmd: format!("{} {}", program, args.join(" ")),
            status: status.to_string(),
            output: String::new(),
        }))
    }
}

/// Runs `program args..`, returning captured stdout on success.
///
/// On a non-zero exit the captured stderr becomes the error's output. On
/// success it is only logged.
#[instrument(skip(args))]
pub async fn run_captured(program: &str, args: &[String]) -> Result<String> {
    debug!("Running: {} {:?}", program, args);
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .with_context(|| format!("Failed to launch '{}'", program))?;
    let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if output.status.success() {
        if !stderr.is_empty() {
            info!("{}: {}", program, stderr);
        }
        Ok(stdout)
    } else {
        Err(anyhow!(SdaError::ExternalCommand {
            cmd: format!("{} {}", program, args.join(" ")),
            status: output.status.to_string(),
            output: stderr,
        }))
    }
}

/// Opens `url` in the default browser or handler.
#[instrument]
pub async fn open_url(url: &str) -> Result<()> {
    let (program, args) = opener_for(std::env::consts::OS, is_wsl().await, url);
    info!("Opening {} with {}", url, program);
    let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
    run_interactive(program, &arg_refs).await
}

/// Chooses the launcher for an OS, as `(program, args)`.
fn opener_for(os: &str, wsl: bool, url: &str) -> (&'static str, Vec<String>) {
    match os {
        "windows" => ("cmd", vec!["/c".into(), "start".into(), String::new(), url.into()]),
        "macos" => ("open", vec![url.into()]),
        _ if wsl => ("cmd.exe", vec!["/c".into(), "start".into(), url.into()]),
        _ => ("xdg-open", vec![url.into()]),
    }
}

/// WSL kernels report "microsoft" in their release string.
async fn is_wsl() -> bool {
    if std::env::consts::OS != "linux" {
        return false;
    }
    match Command::new("uname").arg("-r").output().await {
        Ok(output) => String::from_utf8_lossy(&output.stdout)
            .to_lowercase()
            .contains("microsoft"),
        Err(_) => false,
    }
}
