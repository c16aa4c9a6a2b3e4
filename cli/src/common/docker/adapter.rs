//! # SDA Container Adapter
//!
//! File: cli/src/common/docker/adapter.rs
//!
//! ## Overview
//!
//! `ContainerAdapter` speaks in service names and turns them into engine
//! calls on `{prefix}-{name}` containers. It is the only place that knows how
//! a plain-container `Service` maps onto a `ContainerEngine`.
//!
//! ## Architecture
//!
//! - **Identity**: `exists` re-checks engine results for an exact name,
//!   because the engine's name filter matches substrings.
//! - **Creation**: pulls the image when missing, then creates the container
//!   from `transform::build_container_spec`. Starting is a separate call.
//! - **Lifecycle**: `start`, `stop` and `remove` map one-to-one onto the engine.
//!   `remove` is forced and returns failures.
//! - **Volumes**: `remove_volumes` is best effort. Each failure is logged and
//!   the rest of the batch continues.
//! - **Queries**: `list_*` and `get_info` return `ServiceInfo`, restricted to
//!   containers inside the prefix namespace.
//! - **Access**: `connect` runs the configured CLI command inside the
//!   container or opens the web URL. `logs` streams container output.
//!
use super::engine::{ContainerEngine, LogOptions};
use super::transform::{self, ServiceInfo};
use crate::common::process;
use crate::core::config::{Config, DockerSpec, Service};
use crate::core::error::{Result, SdaError};
use crate::core::templating;
use anyhow::{anyhow, Context};
use tracing::{debug, info, instrument, warn};

pub struct ContainerAdapter<'a> {
    engine: &'a dyn ContainerEngine,
    config: &'a Config,
}

impl<'a> ContainerAdapter<'a> {
    pub fn new(engine: &'a dyn ContainerEngine, config: &'a Config) -> Self {
        Self { engine, config }
    }

    fn container_name(&self, name: &str) -> String {
        self.config.container_name(name)
    }

    /// True iff a container named exactly `{prefix}-{name}` exists in any state.
    #[instrument(skip(self))]
    pub async fn exists(&self, name: &str) -> Result<bool> {
        let container = self.container_name(name);
        let records = self.engine.list_containers(&container, None).await?;
        let wanted = format!("/{}", container);
        Ok(records
            .iter()
            .any(|r| r.names.iter().any(|n| *n == wanted || *n == container)))
    }

    /// Creates the container for `service` without starting it, returning the
    /// image reference when it had to be pulled first.
    ///
    /// The session password comes from the (possibly overridden) config.
    ///
    /// # Errors
    ///
    /// * `SdaError::AlreadyExists` - A container with this name exists.
    /// * `SdaError::DockerApi` - Pulling or creating failed.
    #[instrument(skip(self, service, docker), fields(service = %service.name))]
    pub async fn create(&self, service: &Service, docker: &DockerSpec) -> Result<Option<String>> {
        if self.exists(&service.name).await? {
            return Err(anyhow!(SdaError::AlreadyExists {
                name: service.name.clone()
            }));
        }
        let spec = transform::build_container_spec(self.config, service, docker, &self.config.password);
        let image_ref = spec.image_ref();
        let pulled = if self.engine.image_exists(&image_ref).await? {
            debug!("Image '{}' already present.", image_ref);
            None
        } else {
            info!("Pulling image {}", image_ref);
            self.engine
                .pull_image(&spec.image, &spec.tag)
                .await
                .with_context(|| format!("Failed to pull image '{}'", image_ref))?;
            Some(image_ref)
        };
        self.engine.create_container(&spec).await?;
        Ok(pulled)
    }

    pub async fn start(&self, name: &str) -> Result<()> {
        self.engine.start_container(&self.container_name(name)).await
    }

    pub async fn stop(&self, name: &str) -> Result<()> {
        self.engine.stop_container(&self.container_name(name)).await
    }

    pub async fn remove(&self, name: &str) -> Result<()> {
        self.engine.remove_container(&self.container_name(name)).await
    }

    /// Removes each named volume, returning the ones that were removed.
    pub async fn remove_volumes(&self, names: &[String]) -> Vec<String> {
        let mut removed = Vec::new();
        for volume in names {
            match self.engine.remove_volume(volume).await {
                Ok(()) => {
                    info!("Volume '{}' removed.", volume);
                    removed.push(volume.clone());
                }
                Err(e) => warn!("Could not remove volume '{}': {:#}", volume, e),
            }
        }
        removed
    }

    /// Every catalog entry as an `available` row, in catalog order.
    pub fn list_available(&self) -> Vec<ServiceInfo> {
        self.config
            .services
            .iter()
            .map(|s| transform::info_from_service(self.config, s))
            .collect()
    }

    pub async fn list_created(&self) -> Result<Vec<ServiceInfo>> {
        self.list_with_status(None).await
    }

    pub async fn list_running(&self) -> Result<Vec<ServiceInfo>> {
        self.list_with_status(Some("running")).await
    }

    pub async fn list_stopped(&self) -> Result<Vec<ServiceInfo>> {
        self.list_with_status(Some("exited")).await
    }

    async fn list_with_status(&self, status: Option<&str>) -> Result<Vec<ServiceInfo>> {
        let fragment = format!("{}-", self.config.prefix);
        let namespace = format!("/{}", fragment);
        let records = self.engine.list_containers(&fragment, status).await?;
        Ok(records
            .iter()
            .filter(|r| {
                r.names
                    .first()
                    .is_some_and(|n| n.starts_with(&namespace) || n.starts_with(&fragment))
            })
            .map(|r| transform::info_from_record(r, &self.config.prefix))
            .collect())
    }

    /// The single container of service `name`.
    ///
    /// # Errors
    ///
    /// * `SdaError::NotFound` - No container with that exact name exists.
    #[instrument(skip(self))]
    pub async fn get_info(&self, name: &str) -> Result<ServiceInfo> {
        let container = self.container_name(name);
        let records = self.engine.list_containers(&container, None).await?;
        let wanted = format!("/{}", container);
        records
            .iter()
            .find(|r| r.names.iter().any(|n| *n == wanted || *n == container))
            .map(|r| transform::info_from_record(r, &self.config.prefix))
            .ok_or_else(|| {
                anyhow!(SdaError::NotFound {
                    kind: "Container",
                    name: container
                })
            })
    }

    pub async fn check_network(&self) -> Result<bool> {
        self.engine.network_exists(&self.config.network).await
    }

    pub async fn create_network(&self) -> Result<()> {
        self.engine.create_network(&self.config.network).await
    }

    /// Opens the service's web UI, or runs its CLI client inside the container.
    ///
    /// `password` overrides the session password for the CLI command.
    #[instrument(skip(self, service, password), fields(service = %service.name))]
    pub async fn connect(&self, service: &Service, password: Option<&str>, web: bool) -> Result<()> {
        let container = self.container_name(&service.name);
        let password = password.unwrap_or(&self.config.password);
        if web {
            if !service.connect.has_web_connect || service.connect.web_connect_url.is_empty() {
                return Err(anyhow!(SdaError::Validation(format!(
                    "service '{}' has no web interface",
                    service.name
                ))));
            }
            let url = templating::substitute(&service.connect.web_connect_url, service, &container, password);
            return process::open_url(&url).await;
        }
        if !service.connect.has_cli_connect || service.connect.cli_connect_command.is_empty() {
            return Err(anyhow!(SdaError::Validation(format!(
                "service '{}' has no CLI client configured",
                service.name
            ))));
        }
        let command = templating::substitute(&service.connect.cli_connect_command, service, &container, password);
        self.engine.exec_interactive(&container, &command).await
    }

    pub async fn logs(&self, name: &str, options: &LogOptions) -> Result<()> {
        self.engine.stream_logs(&self.container_name(name), options).await
    }
}
