//! # SDA Docker Network Utilities
//!
//! File: cli/src/common/docker/network.rs
//!
//! Existence check and creation of the single bridge network plain
//! containers are attached to. Creation is unconditional; asking the user
//! first is the orchestrator's job.
//!
use crate::core::error::{Result, SdaError};
use anyhow::anyhow;
use bollard::{
    network::{CreateNetworkOptions, InspectNetworkOptions},
    Docker,
};
use tracing::{debug, info, instrument};

/// True iff a network with exactly this name exists.
///
/// Docker also resolves IDs and ID prefixes on inspect, so the returned name
/// is compared before reporting a match.
#[instrument(skip(docker), fields(network = %name))]
pub async fn network_exists(docker: &Docker, name: &str) -> Result<bool> {
    match docker
        .inspect_network(name, None::<InspectNetworkOptions<String>>)
        .await
    {
        Ok(network) => Ok(network.name.as_deref() == Some(name)),
        Err(bollard::errors::Error::DockerResponseServerError {
            status_code: 404, ..
        }) => {
            debug!("Network '{}' does not exist.", name);
            Ok(false)
        }
        Err(e) => Err(anyhow!(SdaError::DockerApi { source: e })
            .context(format!("Failed to inspect network '{}'", name))),
    }
}

/// Creates a bridge network.
#[instrument(skip(docker), fields(network = %name))]
pub async fn create_network(docker: &Docker, name: &str) -> Result<()> {
    let options = CreateNetworkOptions {
        name: name.to_string(),
        driver: "bridge".to_string(),
        ..Default::default()
    };
    let response = docker
        .create_network(options)
        .await
        .map_err(|e| {
            anyhow!(SdaError::DockerApi { source: e })
                .context(format!("Failed to create network '{}'", name))
        })?;
    info!("Network '{}' created: {:?}", name, response);
    Ok(())
}
