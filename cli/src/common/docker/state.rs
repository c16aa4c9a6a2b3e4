//! # SDA Docker State Querying
//!
//! File: cli/src/common/docker/state.rs
//!
//! ## Overview
//!
//! Read-only container queries. Results are converted from bollard's
//! `ContainerSummary` into the engine-neutral `ContainerRecord` so the layers
//! above never depend on bollard model types.
//!
//! ## Architecture
//!
//! - **`list_containers`**: `list_containers` with `all = true`, filtered by a
//!   name fragment and optionally by engine status. Docker's `name` filter is
//!   a substring match; exact-name checks happen in the adapter.
//! - **`list_project_containers`**: containers carrying the compose project
//!   label, used to stream logs for a whole stack.
//!
use super::engine::{ContainerRecord, PortRecord};
use crate::core::error::{Result, SdaError};
use anyhow::anyhow;
use bollard::{container::ListContainersOptions, models::ContainerSummary, Docker};
use std::collections::HashMap;
use tracing::{debug, error, instrument};

/// Label compose puts on every container of a project.
pub const COMPOSE_PROJECT_LABEL: &str = "com.docker.compose.project";

/// Lists containers (in any state) whose name contains `name_filter`.
///
/// # Arguments
///
/// * `name_filter` - Name fragment passed to Docker's `name` filter.
/// * `status` - Optional engine status (`running`, `exited`, `created`, ...).
///
/// # Errors
///
/// Returns `SdaError::DockerApi` if the list call fails.
#[instrument(skip(docker), fields(filter = %name_filter))]
pub async fn list_containers(
    docker: &Docker,
    name_filter: &str,
    status: Option<&str>,
) -> Result<Vec<ContainerRecord>> {
    let mut filters: HashMap<String, Vec<String>> = HashMap::new();
    filters.insert("name".to_string(), vec![name_filter.to_string()]);
    if let Some(status) = status {
        filters.insert("status".to_string(), vec![status.to_string()]);
    }
    query(docker, filters).await
}

/// Names (without the leading `/`) of every container in a compose project.
#[instrument(skip(docker), fields(project = %project))]
pub async fn list_project_containers(docker: &Docker, project: &str) -> Result<Vec<String>> {
    let mut filters: HashMap<String, Vec<String>> = HashMap::new();
    filters.insert(
        "label".to_string(),
        vec![format!("{}={}", COMPOSE_PROJECT_LABEL, project)],
    );
    let records = query(docker, filters).await?;
    Ok(records
        .into_iter()
        .filter_map(|r| r.names.first().map(|n| n.trim_start_matches('/').to_string()))
        .collect())
}

async fn query(
    docker: &Docker,
    filters: HashMap<String, Vec<String>>,
) -> Result<Vec<ContainerRecord>> {
    debug!("Listing containers with filters: {:?}", filters);
    let options = ListContainersOptions {
        all: true,
        filters,
        ..Default::default()
    };
    let summaries = docker
        .list_containers(Some(options))
        .await
        .map_err(|e| {
            error!("Failed to list containers: {:?}", e);
            anyhow!(SdaError::DockerApi { source: e }).context("Failed to list containers")
        })?;
    debug!("Found {} container(s).", summaries.len());
    Ok(summaries.into_iter().map(record_from_summary).collect())
}

/// Converts a bollard summary, defaulting absent fields.
pub fn record_from_summary(summary: ContainerSummary) -> ContainerRecord {
    ContainerRecord {
        id: summary.id.unwrap_or_default(),
        names: summary.names.unwrap_or_default(),
        image: summary.image.unwrap_or_default(),
        status: summary.status.unwrap_or_default(),
        ports: summary
            .ports
            .unwrap_or_default()
            .into_iter()
            .map(|p| PortRecord {
                public: p.public_port,
                private: p.private_port,
            })
            .collect(),
    }
}
