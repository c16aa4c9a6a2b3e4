//! # SDA Service/Engine Translation
//!
//! File: cli/src/common/docker/transform.rs
//!
//! ## Overview
//!
//! Pure conversions in both directions between the configuration model and
//! what the engine sees. Nothing here performs I/O.
//!
//! Towards the engine:
//! - **`build_container_spec`**: resolves a plain service into a
//!   `ContainerSpec`. It expands placeholders, splits volumes into declared
//!   targets and bind strings, and extracts ulimits.
//! - **`parse_ulimit`**: recognises `--ulimit NAME=SOFT:HARD`. Every other
//!   additional argument is ignored.
//! - **`named_volumes_for_service`**: the engine names of a service's named
//!   volumes, used for cleanup.
//!
//! Back from the engine:
//! - **`name_from_container_name`** strips `/` and `{prefix}-`.
//! - **`version_from_image`** takes the text after the last `:`. For
//!   `img@sha256:abc` that is the digest, so tags and digests are ambiguous.
//! - **`info_from_record`** / **`info_from_service`** build `ServiceInfo`.
//!
use super::engine::{ContainerRecord, ContainerSpec, PortRecord, Ulimit};
use crate::core::config::{Config, DockerSpec, Service, ServiceKind};
use crate::core::templating;
use serde::Serialize;

/// Normalized container state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceState {
    /// Defined in the catalog; no engine status.
    Available,
    Running,
    Stopped,
    Other,
}

impl ServiceState {
    /// Maps raw engine status text (`Up 5 minutes`, `Exited (0) ...`).
    pub fn from_status(raw: &str) -> Self {
        if raw.is_empty() {
            ServiceState::Available
        } else if raw.starts_with("Up") || raw.starts_with("up") {
            ServiceState::Running
        } else if raw.starts_with("Exited") {
            ServiceState::Stopped
        } else {
            ServiceState::Other
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ServiceState::Available => "available",
            ServiceState::Running => "running",
            ServiceState::Stopped => "stopped",
            ServiceState::Other => "other",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            ServiceState::Available => "⚪",
            ServiceState::Running => "🟢",
            ServiceState::Stopped => "🔴",
            ServiceState::Other => "🟡",
        }
    }
}

/// One service as reported to the user. Rebuilt on every query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfo {
    pub name: String,
    pub container_name: String,
    pub id: String,
    pub image: String,
    pub version: String,
    /// Raw engine status text.
    pub status: String,
    pub state: ServiceState,
    pub status_icon: String,
    pub ports: Vec<String>,
}

/// `/sda-postgres` with prefix `sda` -> `postgres`.
///
/// Names outside the prefix namespace come back with only the slash removed.
pub fn name_from_container_name(raw: &str, prefix: &str) -> String {
    let trimmed = raw.strip_prefix('/').unwrap_or(raw);
    trimmed
        .strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('-'))
        .unwrap_or(trimmed)
        .to_string()
}

/// Text after the last `:`, or the whole string when there is none.
pub fn version_from_image(image: &str) -> String {
    match image.rsplit_once(':') {
        Some((_, version)) => version.to_string(),
        None => image.to_string(),
    }
}

/// `public:private` strings, unpublished ports as `0:private`. Docker lists a
/// binding once per address family; duplicates are dropped.
pub fn ports_from_records(ports: &[PortRecord]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for port in ports {
        let entry = format!("{}:{}", port.public.unwrap_or(0), port.private);
        if !out.contains(&entry) {
            out.push(entry);
        }
    }
    out
}

pub fn info_from_record(record: &ContainerRecord, prefix: &str) -> ServiceInfo {
    let raw_name = record.names.first().map(String::as_str).unwrap_or_default();
    let state = ServiceState::from_status(&record.status);
    ServiceInfo {
        name: name_from_container_name(raw_name, prefix),
        container_name: raw_name.trim_start_matches('/').to_string(),
        id: record.id.clone(),
        image: record.image.clone(),
        version: version_from_image(&record.image),
        status: record.status.clone(),
        state,
        status_icon: state.icon().to_string(),
        ports: ports_from_records(&record.ports),
    }
}

/// Catalog entry as an `available` row.
pub fn info_from_service(config: &Config, service: &Service) -> ServiceInfo {
    let image = match &service.kind {
        ServiceKind::Container(docker) => docker.image_name.clone(),
        ServiceKind::Compose(_) => "compose".to_string(),
    };
    ServiceInfo {
        name: service.name.clone(),
        container_name: config.container_name(&service.name),
        id: String::new(),
        image,
        version: service.version.clone(),
        status: String::new(),
        state: ServiceState::Available,
        status_icon: ServiceState::Available.icon().to_string(),
        ports: Vec::new(),
    }
}

/// Parses `--ulimit NAME=SOFT:HARD` anywhere in `arg`.
pub fn parse_ulimit(arg: &str) -> Option<Ulimit> {
    let start = arg.find("--ulimit")?;
    let rest = &arg[start + "--ulimit".len()..];
    // At least one whitespace character between the flag and its value.
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let value = rest.trim_start().split_whitespace().next()?;
    let (name, limits) = value.split_once('=')?;
    let (soft, hard) = limits.split_once(':')?;
    let is_word = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    let is_num = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_ascii_digit());
    if !is_word(name) || !is_num(soft) || !is_num(hard) {
        return None;
    }
    Some(Ulimit {
        name: name.to_string(),
        soft: soft.parse().ok()?,
        hard: hard.parse().ok()?,
    })
}

/// Builds the engine create request for a plain service.
///
/// `password` is the session password (override or default); a service's
/// custom password still wins inside `templating::substitute`.
pub fn build_container_spec(
    config: &Config,
    service: &Service,
    docker: &DockerSpec,
    password: &str,
) -> ContainerSpec {
    let container_name = config.container_name(&service.name);
    let expand = |s: &str| templating::substitute(s, service, &container_name, password);

    let binds = docker
        .volumes
        .iter()
        .map(|v| {
            let source = expand(&v.source);
            let source = if v.is_named {
                source
            } else {
                shellexpand::tilde(&source).into_owned()
            };
            format!("{}:{}", source, v.target)
        })
        .collect();

    ContainerSpec {
        name: container_name.clone(),
        image: docker.image_name.clone(),
        tag: service.version.clone(),
        env: docker.env_vars.iter().map(|e| expand(e)).collect(),
        cmd: docker.custom_app_commands.iter().map(|c| expand(c)).collect(),
        volumes: docker.volumes.iter().map(|v| v.target.clone()).collect(),
        binds,
        ports: docker.port_mappings.clone(),
        ulimits: docker
            .additional_docker_arguments
            .iter()
            .filter_map(|a| parse_ulimit(a))
            .collect(),
        network: config.network.clone(),
    }
}

/// Engine names of the service's named volumes. Empty for compose services.
pub fn named_volumes_for_service(config: &Config, service: &Service) -> Vec<String> {
    let ServiceKind::Container(docker) = &service.kind else {
        return Vec::new();
    };
    let container_name = config.container_name(&service.name);
    docker
        .volumes
        .iter()
        .filter(|v| v.is_named)
        .map(|v| templating::substitute(&v.source, service, &container_name, &config.password))
        .collect()
}
