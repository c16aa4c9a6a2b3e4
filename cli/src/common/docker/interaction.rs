//! # SDA Docker Container Interaction
//!
//! File: cli/src/common/docker/interaction.rs
//!
//! ## Overview
//!
//! Long-lived interactions with running containers:
//!
//! - **`get_container_logs`**: streams one container's logs, stdout frames to
//!   the host stdout and stderr frames to the host stderr.
//! - **`stream_prefixed_logs`**: merges the log streams of several containers
//!   (a compose stack) and prints each line as `[container] line`.
//! - **`exec_interactive`**: runs a command inside a container with the
//!   current terminal attached (`docker exec -it`).
//!
//! Followed streams end when the engine closes them or when the user presses
//! Ctrl-C; there is no timeout.
//!
use crate::common::docker::engine::LogOptions;
use crate::common::process;
use crate::core::error::{Result, SdaError};
use anyhow::anyhow;
use bollard::{
    container::{LogOutput, LogsOptions},
    Docker,
};
use futures_util::{stream, Stream, StreamExt};
use std::future::Future;
use std::pin::Pin;
use tokio::io::{self, AsyncWriteExt};
use tracing::{debug, info, instrument, warn};

/// Streams logs for one container until the stream ends or Ctrl-C.
///
/// # Errors
///
/// * `SdaError::NotFound` - The container does not exist (Docker 404).
/// * `SdaError::DockerApi` - Any other error reading the log stream.
#[instrument(skip(docker, options), fields(container = %name))]
pub async fn get_container_logs(docker: &Docker, name: &str, options: &LogOptions) -> Result<()> {
    info!(
        "Fetching logs for container '{}' (Follow: {}, Tail: {})",
        name, options.follow, options.tail
    );
    let logs_options = LogsOptions::<String> {
        stdout: true,
        stderr: true,
        follow: options.follow,
        tail: options.tail.clone(),
        timestamps: options.timestamps,
        ..Default::default()
    };
    let mut stream = docker.logs(name, Some(logs_options));

    let pump = async {
        let mut out = io::stdout();
        let mut err = io::stderr();
        while let Some(item) = stream.next().await {
            match item {
                Ok(LogOutput::StdErr { message }) => {
                    err.write_all(&message).await?;
                    err.flush().await?;
                }
                Ok(LogOutput::StdOut { message }) | Ok(LogOutput::Console { message }) => {
                    out.write_all(&message).await?;
                    out.flush().await?;
                }
                Ok(LogOutput::StdIn { .. }) => {}
                Err(bollard::errors::Error::DockerResponseServerError {
                    status_code: 404, ..
                }) => {
                    return Err(anyhow!(SdaError::NotFound {
                        kind: "Container",
                        name: name.to_string()
                    }));
                }
                Err(e) => {
                    return Err(anyhow!(SdaError::DockerApi { source: e })
                        .context(format!("Error streaming logs for container '{}'", name)));
                }
            }
        }
        debug!("Log stream for '{}' ended.", name);
        Ok::<(), anyhow::Error>(())
    };

    until_interrupted(pump).await
}

type TaggedLogStream<'a> =
    Pin<Box<dyn Stream<Item = (String, std::result::Result<LogOutput, bollard::errors::Error>)> + 'a>>;

/// Merges the log streams of `containers`, prefixing every line with its
/// container name.
#[instrument(skip(docker, containers))]
pub async fn stream_prefixed_logs(docker: &Docker, containers: &[String], follow: bool) -> Result<()> {
    let streams: Vec<TaggedLogStream<'_>> = containers
        .iter()
        .map(|name| {
            let options = LogsOptions::<String> {
                stdout: true,
                stderr: true,
                follow,
                tail: "all".to_string(),
                ..Default::default()
            };
            let tag = name.clone();
            docker
                .logs(name, Some(options))
                .map(move |item| (tag.clone(), item))
                .boxed_local()
        })
        .collect();
    let mut merged = stream::select_all(streams);

    let pump = async {
        while let Some((container, item)) = merged.next().await {
            match item {
                Ok(LogOutput::StdErr { message }) => {
                    for line in String::from_utf8_lossy(&message).lines() {
                        eprintln!("[{}] {}", container, line);
                    }
                }
                Ok(LogOutput::StdOut { message }) | Ok(LogOutput::Console { message }) => {
                    for line in String::from_utf8_lossy(&message).lines() {
                        println!("[{}] {}", container, line);
                    }
                }
                Ok(LogOutput::StdIn { .. }) => {}
                Err(e) => {
                    // One container going away must not end the others' streams.
                    warn!("Log stream for '{}' failed: {}", container, e);
                }
            }
        }
        Ok::<(), anyhow::Error>(())
    };

    until_interrupted(pump).await
}

/// Runs `command` with `sh -c` inside the container, attached to this terminal.
#[instrument(skip(command), fields(container = %name))]
pub async fn exec_interactive(name: &str, command: &str) -> Result<()> {
    info!("Connecting to '{}' with: {}", name, command);
    process::run_interactive("docker", &["exec", "-it", name, "sh", "-c", command]).await
}

/// Drives `fut` to completion, or returns `Ok(())` early on Ctrl-C.
pub async fn until_interrupted<F>(fut: F) -> Result<()>
where
    F: Future<Output = Result<()>>,
{
    tokio::select! {
        result = fut => result,
        _ = tokio::signal::ctrl_c() => {
            debug!("Interrupted, ending stream.");
            Ok(())
        }
    }
}
