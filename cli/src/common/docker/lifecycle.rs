//! # SDA Docker Container Lifecycle Management
//!
//! File: cli/src/common/docker/lifecycle.rs
//!
//! ## Overview
//!
//! Start, stop and remove containers, and remove named volumes.
//!
//! ## Contracts
//!
//! - **`start_container`** / **`stop_container`**: a 304 from Docker (already
//!   in the requested state) is success; a 404 maps to `SdaError::NotFound`.
//! - **`remove_container`**: always forced, so running containers are removed
//!   too. Anonymous volumes are left alone; named-volume cleanup is a separate
//!   explicit step. Failures are returned.
//! - **`remove_volume`**: removes one named volume and returns failures. The
//!   multi-volume caller decides to log and continue.
//!
use crate::core::error::{Result, SdaError};
use anyhow::anyhow;
use bollard::{
    container::{RemoveContainerOptions, StartContainerOptions, StopContainerOptions},
    volume::RemoveVolumeOptions,
    Docker,
};
use tracing::{error, info, instrument, warn};

#[instrument(skip(docker), fields(container = %name))]
pub async fn start_container(docker: &Docker, name: &str) -> Result<()> {
    info!("Attempting to start container '{}'...", name);
    match docker
        .start_container(name, None::<StartContainerOptions<String>>)
        .await
    {
        Ok(_) => {
            info!("Container '{}' started successfully.", name);
            Ok(())
        }
        Err(bollard::errors::Error::DockerResponseServerError {
            status_code: 304, ..
        }) => {
            info!("Container '{}' was already started.", name);
            Ok(())
        }
        Err(bollard::errors::Error::DockerResponseServerError {
            status_code: 404, ..
        }) => {
            warn!("Start failed because container '{}' was not found.", name);
            Err(anyhow!(SdaError::NotFound {
                kind: "Container",
                name: name.to_string()
            }))
        }
        Err(e) => {
            error!("Failed to start container '{}': {:?}", name, e);
            Err(anyhow!(SdaError::DockerApi { source: e })
                .context(format!("Failed to start container '{}'", name)))
        }
    }
}

/// Stops a container, waiting `timeout_secs` before Docker kills it.
#[instrument(skip(docker, timeout_secs), fields(container = %name))]
pub async fn stop_container(docker: &Docker, name: &str, timeout_secs: Option<u32>) -> Result<()> {
    let options = timeout_secs.map(|t| StopContainerOptions { t: t as i64 });
    info!("Attempting to stop container '{}'...", name);
    match docker.stop_container(name, options).await {
        Ok(_) => {
            info!("Container '{}' stopped successfully.", name);
            Ok(())
        }
        Err(bollard::errors::Error::DockerResponseServerError {
            status_code: 304, ..
        }) => {
            info!("Container '{}' was already stopped.", name);
            Ok(())
        }
        Err(bollard::errors::Error::DockerResponseServerError {
            status_code: 404, ..
        }) => {
            warn!("Stop failed because container '{}' was not found.", name);
            Err(anyhow!(SdaError::NotFound {
                kind: "Container",
                name: name.to_string()
            }))
        }
        Err(e) => {
            error!("Failed to stop container '{}': {:?}", name, e);
            Err(anyhow!(SdaError::DockerApi { source: e })
                .context(format!("Failed to stop container '{}'", name)))
        }
    }
}

/// Force-removes a container.
#[instrument(skip(docker), fields(container = %name))]
pub async fn remove_container(docker: &Docker, name: &str) -> Result<()> {
    info!("Removing container '{}' (forced)...", name);
    let options = Some(RemoveContainerOptions {
        force: true,
        v: false,
        link: false,
    });
    match docker.remove_container(name, options).await {
        Ok(_) => {
            info!("Container '{}' removed successfully.", name);
            Ok(())
        }
        Err(bollard::errors::Error::DockerResponseServerError {
            status_code: 404, ..
        }) => {
            warn!("Remove failed because container '{}' was not found.", name);
            Err(anyhow!(SdaError::NotFound {
                kind: "Container",
                name: name.to_string()
            }))
        }
        Err(e) => {
            error!("Failed to remove container '{}': {:?}", name, e);
            Err(anyhow!(SdaError::DockerApi { source: e })
                .context(format!("Failed to remove container '{}'", name)))
        }
    }
}

#[instrument(skip(docker), fields(volume = %name))]
pub async fn remove_volume(docker: &Docker, name: &str) -> Result<()> {
    info!("Removing volume '{}'...", name);
    docker
        .remove_volume(name, None::<RemoveVolumeOptions>)
        .await
        .map_err(|e| match e {
            bollard::errors::Error::DockerResponseServerError {
                status_code: 404, ..
            } => anyhow!(SdaError::NotFound {
                kind: "Volume",
                name: name.to_string()
            }),
            _ => anyhow!(SdaError::DockerApi { source: e })
                .context(format!("Failed to remove volume '{}'", name)),
        })
}
