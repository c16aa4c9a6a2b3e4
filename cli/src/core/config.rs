//! # SDA Configuration System
//!
//! File: cli/src/core/config.rs
//!
//! ## Overview
//!
//! This module owns the service catalog: the defaults (network, password,
//! naming prefix) and the ordered list of service definitions read from
//! `sda.toml`. It also provides the lookup/update operations the
//! orchestrator uses while resolving a command.
//!
//! ## Architecture
//!
//! - `Config` holds the defaults and `services`. It is loaded once per
//!   command and moved into the orchestrator; nothing is written back.
//! - `Service` carries its backend as `ServiceKind`, a two-variant enum:
//!   `Container(DockerSpec)` for plain containers and `Compose(ComposeRef)`
//!   for compose stacks. The file format keeps the flat `compose` string and
//!   `[services.docker]` table; `RawService` converts them on deserialize.
//! - `load_config` locates the file (`--config` or the platform config dir),
//!   writes the bundled default when it is missing, parses and validates it.
//!
//! Configuration file location (Linux): `~/.config/sda/sda.toml`.
//!
//! ## Examples
//!
//! ```rust
//! let mut cfg = config::load_config(None)?;
//! if let Some(service) = cfg.get_service_by_name("postgres") {
//!     println!("{} -> {}", service.name, cfg.container_name(&service.name));
//! }
//! cfg.update_version("postgres", "16");
//! ```
//!
use crate::core::error::{Result, SdaError};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// File name of the configuration inside the config directory.
pub const CONFIG_FILENAME: &str = "sda.toml";

/// Written to disk the first time `sda` runs without a configuration file.
const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

/// The loaded configuration: defaults plus the service catalog.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Bridge network every plain container is attached to.
    #[serde(rename = "defaultNetwork")]
    pub network: String,
    /// Password injected as `{{.PASSWORD}}` unless a service sets its own.
    #[serde(rename = "defaultPassword", default)]
    pub password: String,
    /// Namespace for container and volume names (`{prefix}-{name}`).
    pub prefix: String,
    #[serde(default)]
    pub services: Vec<Service>,
    /// Directory of the file this configuration was read from.
    #[serde(skip)]
    pub source_dir: PathBuf,
}

/// A named, configured unit managed by sda.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(try_from = "RawService")]
pub struct Service {
    pub name: String,
    pub output_name: String,
    /// Default image tag.
    pub version: String,
    pub has_password: bool,
    pub custom_password: String,
    pub kind: ServiceKind,
    pub connect: ConnectSpec,
}

/// How a service is run.
#[derive(Debug, Clone, PartialEq)]
pub enum ServiceKind {
    Container(DockerSpec),
    Compose(ComposeRef),
}

/// Reference to a compose file or a directory holding one.
#[derive(Debug, Clone, PartialEq)]
pub struct ComposeRef {
    pub path: String,
}

/// Plain-container definition (`[services.docker]`).
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct DockerSpec {
    pub image_name: String,
    pub port_mappings: Vec<PortMapping>,
    pub is_persistent: bool,
    pub volumes: Vec<Volume>,
    pub env_vars: Vec<String>,
    pub additional_docker_arguments: Vec<String>,
    pub custom_app_commands: Vec<String>,
}

/// Host to container TCP port binding.
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PortMapping {
    #[serde(default)]
    pub host: u16,
    pub container: u16,
    /// Only set through `--port IP:HOST:CONTAINER`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_ip: Option<String>,
}

/// A volume or bind mount. Only named volumes are ever removed by sda.
#[derive(Deserialize, Serialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct Volume {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub is_named: bool,
}

/// How `sda connect` reaches a service.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ConnectSpec {
    pub has_cli_connect: bool,
    pub cli_connect_command: String,
    pub has_web_connect: bool,
    pub web_connect_url: String,
}

/// On-disk shape of a service entry.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
struct RawService {
    name: String,
    output_name: String,
    default_version: String,
    has_password: bool,
    custom_password: String,
    compose: String,
    docker: Option<DockerSpec>,
    has_cli_connect: bool,
    cli_connect_command: String,
    has_web_connect: bool,
    web_connect_url: String,
}

impl TryFrom<RawService> for Service {
    type Error = String;

    fn try_from(raw: RawService) -> std::result::Result<Self, Self::Error> {
        let compose = raw.compose.trim().to_string();
        let kind = match (compose.is_empty(), raw.docker) {
            (true, docker) => ServiceKind::Container(docker.unwrap_or_default()),
            (false, Some(docker)) if !docker.image_name.is_empty() => {
                return Err(format!(
                    "service '{}' sets both 'compose' and 'docker.imageName'",
                    raw.name
                ));
            }
            (false, _) => ServiceKind::Compose(ComposeRef { path: compose }),
        };
        let output_name = if raw.output_name.is_empty() {
            raw.name.clone()
        } else {
            raw.output_name
        };
        Ok(Service {
            name: raw.name,
            output_name,
            version: raw.default_version,
            has_password: raw.has_password,
            custom_password: raw.custom_password,
            kind,
            connect: ConnectSpec {
                has_cli_connect: raw.has_cli_connect,
                cli_connect_command: raw.cli_connect_command,
                has_web_connect: raw.has_web_connect,
                web_connect_url: raw.web_connect_url,
            },
        })
    }
}

impl Config {
    /// Linear scan in catalog order; the first match wins.
    pub fn get_service_by_name(&self, name: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.name == name)
    }

    pub fn service_exists(&self, name: &str) -> bool {
        self.get_service_by_name(name).is_some()
    }

    pub fn get_all_service_names(&self) -> Vec<String> {
        self.services.iter().map(|s| s.name.clone()).collect()
    }

    pub fn update_network(&mut self, network: &str) {
        self.network = network.to_string();
    }

    pub fn update_password(&mut self, password: &str) {
        self.password = password.to_string();
    }

    /// Sets the image tag of `service_name`. Unknown names are ignored.
    pub fn update_version(&mut self, service_name: &str, version: &str) {
        if let Some(service) = self.services.iter_mut().find(|s| s.name == service_name) {
            service.version = version.to_string();
        }
    }

    /// Engine-side name of a service's container.
    pub fn container_name(&self, service_name: &str) -> String {
        format!("{}-{}", self.prefix, service_name)
    }

    /// Directory used to resolve relative compose paths.
    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }
}

/// Returns the platform config path (`~/.config/sda/sda.toml` on Linux).
pub fn default_config_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("", "", "sda").ok_or_else(|| {
        anyhow!(SdaError::Config(
            "Could not determine the user configuration directory.".to_string()
        ))
    })?;
    Ok(proj_dirs.config_dir().join(CONFIG_FILENAME))
}

/// Loads the configuration from `path_override` or the default location,
/// writing the bundled default first if the file does not exist.
pub fn load_config(path_override: Option<&str>) -> Result<Config> {
    let path = match path_override {
        Some(p) => PathBuf::from(shellexpand::tilde(p).into_owned()),
        None => default_config_path()?,
    };
    if !path.exists() {
        write_default_config(&path)?;
    }
    let mut config = load_config_from_path(&path)?;
    validate_config(&config).context("Configuration validation failed")?;
    config.source_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    debug!("Loaded configuration with {} service(s)", config.services.len());
    Ok(config)
}

fn write_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| {
            format!("Failed to create configuration directory: {}", parent.display())
        })?;
    }
    fs::write(path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write default configuration: {}", path.display()))?;
    info!("Wrote default configuration to {}", path.display());
    Ok(())
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    parse_config(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Parses configuration text. Does not validate.
pub fn parse_config(content: &str) -> Result<Config> {
    toml::from_str(content).map_err(|e| anyhow!(SdaError::Config(e.to_string())))
}

/// Rejects catalogs the rest of the application cannot work with.
pub fn validate_config(config: &Config) -> Result<()> {
    if config.prefix.is_empty() || config.prefix.contains('/') {
        return Err(anyhow!(SdaError::Config(format!(
            "Invalid prefix '{}': must be non-empty and must not contain '/'.",
            config.prefix
        ))));
    }
    if config.network.is_empty() {
        return Err(anyhow!(SdaError::Config(
            "'defaultNetwork' must not be empty.".to_string()
        )));
    }
    let mut seen = HashSet::new();
    for service in &config.services {
        if service.name.is_empty() {
            return Err(anyhow!(SdaError::Config(
                "Every service needs a non-empty 'name'.".to_string()
            )));
        }
        if !seen.insert(service.name.as_str()) {
            return Err(anyhow!(SdaError::Config(format!(
                "Duplicate service name '{}'.",
                service.name
            ))));
        }
    }
    Ok(())
}
