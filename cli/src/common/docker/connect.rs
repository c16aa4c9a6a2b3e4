//! # SDA Docker Connection Utility
//!
//! File: cli/src/common/docker/connect.rs
//!
//! ## Overview
//!
//! Creates the `bollard::Docker` client used by both engine adapters. The
//! client is built with `connect_with_local_defaults`, which honours
//! `DOCKER_HOST` and otherwise targets the platform socket or named pipe.
//!
//! `LazyDocker` defers that until the first engine call, so commands that
//! fail validation or only read the catalog work without a daemon.
//!
use crate::core::error::{Result, SdaError};
use anyhow::{anyhow, Context};
use bollard::Docker;
use tokio::sync::OnceCell;
use tracing::{debug, instrument};

/// Establishes a client for the local Docker daemon using default settings.
///
/// # Errors
///
/// Returns `SdaError::DockerApi` if the client cannot be configured
/// (for example a malformed `DOCKER_HOST`).
#[instrument]
pub async fn connect_docker() -> Result<Docker> {
    Docker::connect_with_local_defaults()
        .map_err(|e| anyhow!(SdaError::DockerApi { source: e }))
        .context("Failed to connect to Docker daemon. Is it running and accessible?")
}

/// A Docker client built on first use and shared afterwards.
#[derive(Default)]
pub struct LazyDocker {
    client: OnceCell<Docker>,
}

impl LazyDocker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the client, connecting on the first call.
    pub async fn get(&self) -> Result<&Docker> {
        self.client
            .get_or_try_init(|| async {
                debug!("Connecting to Docker on first engine call");
                connect_docker().await
            })
            .await
    }
}
