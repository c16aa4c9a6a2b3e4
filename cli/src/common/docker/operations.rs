//! # SDA Container Creation
//!
//! File: cli/src/common/docker/operations.rs
//!
//! ## Overview
//!
//! Maps a resolved `ContainerSpec` onto the bollard create request and issues
//! it. The container is only created here; starting it is a separate
//! lifecycle step so `create --no-start` can stop after this call.
//!
//! - Ports are published as `{container}/tcp`, bound on `host_ip` when given
//!   and on every interface otherwise.
//! - Volumes are declared by target and mounted through `binds`.
//! - The container joins `spec.network` through `network_mode`.
//!
use super::engine::ContainerSpec;
use crate::core::error::{Result, SdaError};
use anyhow::anyhow;
use bollard::{
    container::{Config as ContainerConfig, CreateContainerOptions},
    models::{HostConfig, PortBinding, ResourcesUlimits},
    Docker,
};
use std::collections::HashMap;
use tracing::{error, info, instrument};

/// Translates the spec into bollard's container configuration.
pub fn to_create_config(spec: &ContainerSpec) -> ContainerConfig<String> {
    let mut exposed_ports: HashMap<String, HashMap<(), ()>> = HashMap::new();
    let mut port_bindings: HashMap<String, Option<Vec<PortBinding>>> = HashMap::new();
    for mapping in &spec.ports {
        let key = format!("{}/tcp", mapping.container);
        exposed_ports.insert(key.clone(), HashMap::new());
        port_bindings
            .entry(key)
            .or_default()
            .get_or_insert_with(Vec::new)
            .push(PortBinding {
                host_ip: Some(mapping.host_ip.clone().unwrap_or_default()),
                host_port: Some(mapping.host.to_string()),
            });
    }

    let volumes: HashMap<String, HashMap<(), ()>> = spec
        .volumes
        .iter()
        .map(|target| (target.clone(), HashMap::new()))
        .collect();

    let ulimits: Vec<ResourcesUlimits> = spec
        .ulimits
        .iter()
        .map(|u| ResourcesUlimits {
            name: Some(u.name.clone()),
            soft: Some(u.soft),
            hard: Some(u.hard),
        })
        .collect();

    let host_config = HostConfig {
        binds: (!spec.binds.is_empty()).then(|| spec.binds.clone()),
        port_bindings: (!port_bindings.is_empty()).then_some(port_bindings),
        ulimits: (!ulimits.is_empty()).then_some(ulimits),
        network_mode: (!spec.network.is_empty()).then(|| spec.network.clone()),
        ..Default::default()
    };

    ContainerConfig {
        image: Some(spec.image_ref()),
        env: (!spec.env.is_empty()).then(|| spec.env.clone()),
        cmd: (!spec.cmd.is_empty()).then(|| spec.cmd.clone()),
        exposed_ports: (!exposed_ports.is_empty()).then_some(exposed_ports),
        volumes: (!volumes.is_empty()).then_some(volumes),
        host_config: Some(host_config),
        ..Default::default()
    }
}

/// Creates (but does not start) the container described by `spec`.
///
/// # Errors
///
/// * `SdaError::AlreadyExists` - Docker reports a name conflict (409).
/// * `SdaError::DockerApi` - Any other create failure, such as a missing image.
#[instrument(skip(docker, spec), fields(container = %spec.name))]
pub async fn create_container(docker: &Docker, spec: &ContainerSpec) -> Result<()> {
    info!("Creating container '{}' from image '{}'", spec.name, spec.image_ref());
    let options = Some(CreateContainerOptions {
        name: spec.name.clone(),
        platform: None,
    });
    match docker.create_container(options, to_create_config(spec)).await {
        Ok(response) => {
            info!("Container '{}' created (ID: {})", spec.name, response.id);
            Ok(())
        }
        Err(bollard::errors::Error::DockerResponseServerError {
            status_code: 409, ..
        }) => Err(anyhow!(SdaError::AlreadyExists {
            name: spec.name.clone()
        })),
        Err(e) => {
            error!("Failed to create container '{}': {:?}", spec.name, e);
            Err(anyhow!(SdaError::DockerApi { source: e })
                .context(format!("Failed to create container '{}'", spec.name)))
        }
    }
}
