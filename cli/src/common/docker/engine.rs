//! # SDA Container Engine Seam
//!
//! File: cli/src/common/docker/engine.rs
//!
//! ## Overview
//!
//! `ContainerEngine` is the low-level capability the rest of sda needs from a
//! container runtime: one method per engine round-trip, addressed by the
//! engine-side container name. `DockerEngine` implements it on top of the
//! bollard helpers in the sibling modules (`state`, `images`, `lifecycle`,
//! `network`, `operations`, `interaction`).
//!
//! Tests substitute an in-memory engine so the orchestrator can be exercised
//! without a Docker daemon.
//!
//! The trait is `?Send`: sda runs on a current-thread runtime and never moves
//! engine futures across threads.
//!
use crate::common::docker::connect::LazyDocker;
use crate::common::docker::{images, interaction, lifecycle, network, operations, state};
use crate::core::config::PortMapping;
use crate::core::error::Result;
use async_trait::async_trait;
use std::rc::Rc;

/// A container as reported by the engine's list call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContainerRecord {
    pub id: String,
    /// Raw names, including Docker's leading `/`.
    pub names: Vec<String>,
    pub image: String,
    /// Human status text, e.g. `Up 3 minutes` or `Exited (0) 2 hours ago`.
    pub status: String,
    pub ports: Vec<PortRecord>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PortRecord {
    pub public: Option<u16>,
    pub private: u16,
}

/// A `--ulimit NAME=SOFT:HARD` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ulimit {
    pub name: String,
    pub soft: i64,
    pub hard: i64,
}

/// Fully resolved create request: placeholders expanded, overrides applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ContainerSpec {
    pub name: String,
    pub image: String,
    pub tag: String,
    pub env: Vec<String>,
    pub cmd: Vec<String>,
    /// Container-side paths declared as volumes.
    pub volumes: Vec<String>,
    /// `source:target` bind strings.
    pub binds: Vec<String>,
    pub ports: Vec<PortMapping>,
    pub ulimits: Vec<Ulimit>,
    pub network: String,
}

impl ContainerSpec {
    /// `image:tag` as passed to the engine.
    pub fn image_ref(&self) -> String {
        format!("{}:{}", self.image, self.tag)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogOptions {
    pub follow: bool,
    /// Number of lines, or `all`.
    pub tail: String,
    pub timestamps: bool,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            follow: false,
            tail: "100".to_string(),
            timestamps: false,
        }
    }
}

/// One engine round-trip per method.
///
/// `remove_container` always forces removal and reports failures.
/// `remove_volume` reports failures too, but callers removing several volumes
/// treat each failure as non-fatal (see `ContainerAdapter::remove_volumes`).
#[async_trait(?Send)]
pub trait ContainerEngine {
    /// Lists containers in any state whose name contains `name_filter`,
    /// optionally narrowed to one engine status (`running`, `exited`).
    async fn list_containers(
        &self,
        name_filter: &str,
        status: Option<&str>,
    ) -> Result<Vec<ContainerRecord>>;
    async fn image_exists(&self, image_ref: &str) -> Result<bool>;
    async fn pull_image(&self, image: &str, tag: &str) -> Result<()>;
    async fn create_container(&self, spec: &ContainerSpec) -> Result<()>;
    async fn start_container(&self, name: &str) -> Result<()>;
    async fn stop_container(&self, name: &str) -> Result<()>;
    async fn remove_container(&self, name: &str) -> Result<()>;
    async fn remove_volume(&self, name: &str) -> Result<()>;
    async fn network_exists(&self, name: &str) -> Result<bool>;
    async fn create_network(&self, name: &str) -> Result<()>;
    /// Streams logs to the process stdout/stderr until the stream ends.
    async fn stream_logs(&self, name: &str, options: &LogOptions) -> Result<()>;
    /// Runs `command` inside the container attached to the current terminal.
    async fn exec_interactive(&self, name: &str, command: &str) -> Result<()>;
}

/// `ContainerEngine` backed by the local Docker daemon.
///
/// The daemon is contacted on the first method call, never at construction.
pub struct DockerEngine {
    docker: Rc<LazyDocker>,
}

impl DockerEngine {
    pub fn new(docker: Rc<LazyDocker>) -> Self {
        Self { docker }
    }
}

#[async_trait(?Send)]
impl ContainerEngine for DockerEngine {
    async fn list_containers(
        &self,
        name_filter: &str,
        status: Option<&str>,
    ) -> Result<Vec<ContainerRecord>> {
        state::list_containers(self.docker.get().await?, name_filter, status).await
    }

    async fn image_exists(&self, image_ref: &str) -> Result<bool> {
        images::image_exists(self.docker.get().await?, image_ref).await
    }

    async fn pull_image(&self, image: &str, tag: &str) -> Result<()> {
        images::pull_image(self.docker.get().await?, image, tag).await
    }

    async fn create_container(&self, spec: &ContainerSpec) -> Result<()> {
        operations::create_container(self.docker.get().await?, spec).await
    }

    async fn start_container(&self, name: &str) -> Result<()> {
        lifecycle::start_container(self.docker.get().await?, name).await
    }

    async fn stop_container(&self, name: &str) -> Result<()> {
        lifecycle::stop_container(self.docker.get().await?, name, Some(10)).await
    }

    async fn remove_container(&self, name: &str) -> Result<()> {
        lifecycle::remove_container(self.docker.get().await?, name).await
    }

    async fn remove_volume(&self, name: &str) -> Result<()> {
        lifecycle::remove_volume(self.docker.get().await?, name).await
    }

    async fn network_exists(&self, name: &str) -> Result<bool> {
        network::network_exists(self.docker.get().await?, name).await
    }

    async fn create_network(&self, name: &str) -> Result<()> {
        network::create_network(self.docker.get().await?, name).await
    }

    async fn stream_logs(&self, name: &str, options: &LogOptions) -> Result<()> {
        interaction::get_container_logs(self.docker.get().await?, name, options).await
    }

    async fn exec_interactive(&self, name: &str, command: &str) -> Result<()> {
        interaction::exec_interactive(name, command).await
    }
}
