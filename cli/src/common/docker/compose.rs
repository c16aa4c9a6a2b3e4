//! # SDA Compose Stack Management
//!
//! File: cli/src/common/docker/compose.rs
//!
//! ## Overview
//!
//! Compose services are driven through the `docker compose` CLI. The project
//! name is always the service name, so `start`, `stop` and `down` address a
//! stack by `-p <name>` alone. Logs come from the Docker API: every container
//! carrying the project label is streamed and merged.
//!
//! ## Architecture
//!
//! - **`ComposeEngine`**: the project-level capability (`up`, `start`,
//!   `stop`, `down`, `logs`). `ComposeCli` implements it; tests use a
//!   recording mock.
//! - **`resolve_compose_path`**: turns a service's `compose` reference into a
//!   concrete file and checks that it lives in a directory named after the
//!   service.
//! - **`ComposeAdapter`**: resolves the file for a service before every
//!   operation, then delegates to the engine.
//!
use super::{interaction, state};
use crate::common::process;
use crate::core::config::{Service, ServiceKind};
use crate::core::error::{Result, SdaError};
use anyhow::anyhow;
use async_trait::async_trait;
use super::connect::LazyDocker;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing::{debug, info, instrument};

/// File names searched, in order, when a compose reference is a directory.
const COMPOSE_FILE_NAMES: [&str; 2] = ["docker-compose.yaml", "docker-compose.yml"];

#[async_trait(?Send)]
pub trait ComposeEngine {
    async fn up(&self, project: &str, file: &Path, build: bool, recreate: bool) -> Result<()>;
    async fn start(&self, project: &str) -> Result<()>;
    async fn stop(&self, project: &str) -> Result<()>;
    async fn down(&self, project: &str, remove_volumes: bool) -> Result<()>;
    async fn logs(&self, project: &str, follow: bool) -> Result<()>;
}

/// `ComposeEngine` backed by `docker compose` and the Docker log API.
pub struct ComposeCli {
    docker: Rc<LazyDocker>,
}

impl ComposeCli {
    pub fn new(docker: Rc<LazyDocker>) -> Self {
        Self { docker }
    }

    async fn run(&self, args: Vec<String>) -> Result<()> {
        let stdout = process::run_captured("docker", &args).await?;
        if !stdout.trim().is_empty() {
            debug!("docker {}: {}", args.join(" "), stdout.trim());
        }
        Ok(())
    }
}

#[async_trait(?Send)]
impl ComposeEngine for ComposeCli {
    #[instrument(skip(self, file), fields(project = %project))]
    async fn up(&self, project: &str, file: &Path, build: bool, recreate: bool) -> Result<()> {
        info!("Bringing up compose project '{}' from {}", project, file.display());
        self.run(up_args(project, file, build, recreate)).await
    }

    #[instrument(skip(self), fields(project = %project))]
    async fn start(&self, project: &str) -> Result<()> {
        self.run(lifecycle_args(project, "start")).await
    }

    #[instrument(skip(self), fields(project = %project))]
    async fn stop(&self, project: &str) -> Result<()> {
        self.run(lifecycle_args(project, "stop")).await
    }

    #[instrument(skip(self), fields(project = %project))]
    async fn down(&self, project: &str, remove_volumes: bool) -> Result<()> {
        self.run(down_args(project, remove_volumes)).await
    }

    #[instrument(skip(self), fields(project = %project))]
    async fn logs(&self, project: &str, follow: bool) -> Result<()> {
        let docker = self.docker.get().await?;
        let containers = state::list_project_containers(docker, project).await?;
        if containers.is_empty() {
            return Err(anyhow!(SdaError::NotFound {
                kind: "Compose project",
                name: project.to_string()
            }));
        }
        interaction::stream_prefixed_logs(docker, &containers, follow).await
    }
}

pub fn up_args(project: &str, file: &Path, build: bool, recreate: bool) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "compose".into(),
        "-f".into(),
        file.display().to_string(),
        "-p".into(),
        project.into(),
        "up".into(),
        "-d".into(),
        "--remove-orphans".into(),
    ];
    if build {
        args.push("--build".into());
    }
    if recreate {
        args.push("--force-recreate".into());
    }
    args
}

pub fn lifecycle_args(project: &str, verb: &str) -> Vec<String> {
    vec!["compose".into(), "-p".into(), project.into(), verb.into()]
}

pub fn down_args(project: &str, remove_volumes: bool) -> Vec<String> {
    let mut args = lifecycle_args(project, "down");
    args.push("--remove-orphans".into());
    if remove_volumes {
        args.push("-v".into());
    }
    args
}

/// Resolves `reference` (a file or a directory) relative to `config_dir`.
///
/// # Errors
///
/// * `SdaError::NotFound` - The path does not exist, or a directory holds no
///   compose file.
/// * `SdaError::Validation` - The file's parent directory is not named
///   `service_name`.
pub fn resolve_compose_path(config_dir: &Path, service_name: &str, reference: &str) -> Result<PathBuf> {
    let expanded = PathBuf::from(shellexpand::tilde(reference).as_ref());
    let candidate = if expanded.is_absolute() {
        expanded
    } else {
        config_dir.join(expanded)
    };
    if !candidate.exists() {
        return Err(anyhow!(SdaError::NotFound {
            kind: "Compose path",
            name: candidate.display().to_string()
        }));
    }

    let file = if candidate.is_dir() {
        COMPOSE_FILE_NAMES
            .iter()
            .map(|name| candidate.join(name))
            .find(|path| path.is_file())
            .ok_or_else(|| {
                anyhow!(SdaError::NotFound {
                    kind: "Compose file",
                    name: candidate.join(COMPOSE_FILE_NAMES[0]).display().to_string()
                })
            })?
    } else {
        candidate
    };

    let parent = file
        .parent()
        .and_then(|p| p.file_name())
        .and_then(|n| n.to_str())
        .unwrap_or_default();
    if parent != service_name {
        return Err(anyhow!(SdaError::Validation(format!(
            "compose file {} must live in a directory named '{}', found '{}'",
            file.display(),
            service_name,
            parent
        ))));
    }
    Ok(file)
}

/// Compose operations addressed by `Service`.
pub struct ComposeAdapter<'a> {
    engine: &'a dyn ComposeEngine,
    config_dir: &'a Path,
}

impl<'a> ComposeAdapter<'a> {
    pub fn new(engine: &'a dyn ComposeEngine, config_dir: &'a Path) -> Self {
        Self { engine, config_dir }
    }

    fn resolve(&self, service: &Service) -> Result<PathBuf> {
        match &service.kind {
            ServiceKind::Compose(compose) => resolve_compose_path(self.config_dir, &service.name, &compose.path),
            ServiceKind::Container(_) => Err(anyhow!(SdaError::Validation(format!(
                "service '{}' is not a compose service",
                service.name
            )))),
        }
    }

    pub async fn up(&self, service: &Service, build: bool, recreate: bool) -> Result<()> {
        let file = self.resolve(service)?;
        self.engine.up(&service.name, &file, build, recreate).await
    }

    pub async fn start(&self, service: &Service) -> Result<()> {
        self.resolve(service)?;
        self.engine.start(&service.name).await
    }

    pub async fn stop(&self, service: &Service) -> Result<()> {
        self.resolve(service)?;
        self.engine.stop(&service.name).await
    }

    pub async fn down(&self, service: &Service, remove_volumes: bool) -> Result<()> {
        self.resolve(service)?;
        self.engine.down(&service.name, remove_volumes).await
    }

    pub async fn logs(&self, service: &Service, follow: bool) -> Result<()> {
        self.resolve(service)?;
        self.engine.logs(&service.name, follow).await
    }
}
