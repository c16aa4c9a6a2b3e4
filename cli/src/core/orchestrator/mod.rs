//! # SDA Lifecycle Orchestrator
//!
//! File: cli/src/core/orchestrator/mod.rs
//!
//! ## Overview
//!
//! The orchestrator decides what happens for each verb. It owns the
//! configuration for the current invocation, applies session overrides to it,
//! asks for confirmation, and drives either the container adapter or the
//! compose adapter depending on the service kind.
//!
//! ## Ordering guarantees
//!
//! - An unknown service is rejected before any engine call.
//! - Override values are validated before any engine call.
//! - `create` on an existing service fails unless `recreate` is set, and
//!   nothing is touched in that case.
//! - A declined prompt ends the verb with `SdaError::Aborted`.
//! - Bulk verbs confirm once, then run item by item. Item failures are
//!   collected into the `ActionReport` instead of stopping the batch.
//!
//! Container removal failures are returned to the caller. Named-volume
//! removal is best effort: failures are logged and skipped.
//!
pub mod overrides;
pub mod target;

pub use overrides::Overrides;
pub use target::Target;

use crate::common::docker::compose::{ComposeAdapter, ComposeEngine};
use crate::common::docker::transform::{self, ServiceInfo};
use crate::common::docker::{ContainerAdapter, ContainerEngine, LogOptions};
use crate::common::ui::prompt::Prompter;
use crate::core::config::{Config, DockerSpec, Service, ServiceKind};
use crate::core::error::{Result, SdaError};
use anyhow::anyhow;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

/// Everything `sda create` can ask for.
#[derive(Debug, Clone, Default)]
pub struct CreateRequest {
    pub name: String,
    pub network: Option<String>,
    pub password: Option<String>,
    pub version: Option<String>,
    pub ports: Vec<String>,
    pub volumes: Vec<String>,
    pub env: Vec<String>,
    pub recreate: bool,
    /// Remove the old container's named volumes when recreating.
    pub purge_volumes: bool,
    /// Compose only: build images before starting.
    pub build: bool,
    pub no_start: bool,
}

/// Which password a created service was given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "source")]
pub enum PasswordNotice {
    /// `--password`, or the service's own `customPassword`.
    Custom,
    /// The catalog-wide default.
    Default { password: String },
}

impl PasswordNotice {
    fn describe(&self) -> String {
        match self {
            PasswordNotice::Custom => "using a custom password".to_string(),
            PasswordNotice::Default { password } => {
                format!("using the default password '{}'", password)
            }
        }
    }
}

/// What `create` did, for the command layer to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOutcome {
    pub service: String,
    /// The catalog's `outputName`.
    pub display_name: String,
    pub kind: &'static str,
    /// Container name, or the compose project name.
    pub target: String,
    pub recreated: bool,
    pub started: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub network_created: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_pulled: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<PasswordNotice>,
    pub volumes_removed: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Failure {
    pub name: String,
    pub error: String,
}

/// Result of a start, stop or remove over one or more services.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionReport {
    pub action: &'static str,
    pub succeeded: Vec<String>,
    pub failed: Vec<Failure>,
    pub volumes_removed: Vec<String>,
    /// Named volumes of persistent services left in place by a remove.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub volumes_kept: Vec<String>,
}

impl ActionReport {
    fn new(action: &'static str) -> Self {
        Self {
            action,
            succeeded: Vec::new(),
            failed: Vec::new(),
            volumes_removed: Vec::new(),
            volumes_kept: Vec::new(),
        }
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListFilter {
    Available,
    Created,
    Running,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verb {
    Start,
    Stop,
}

impl Verb {
    fn past(self) -> &'static str {
        match self {
            Verb::Start => "started",
            Verb::Stop => "stopped",
        }
    }

    fn label(self) -> &'static str {
        match self {
            Verb::Start => "Start",
            Verb::Stop => "Stop",
        }
    }
}

pub struct Orchestrator<'a> {
    config: Config,
    engine: &'a dyn ContainerEngine,
    compose: &'a dyn ComposeEngine,
    prompter: &'a dyn Prompter,
    assume_yes: bool,
}

impl<'a> Orchestrator<'a> {
    pub fn new(
        config: Config,
        engine: &'a dyn ContainerEngine,
        compose: &'a dyn ComposeEngine,
        prompter: &'a dyn Prompter,
        assume_yes: bool,
    ) -> Self {
        Self {
            config,
            engine,
            compose,
            prompter,
            assume_yes,
        }
    }

    #[cfg(test)]
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn containers(&self) -> ContainerAdapter<'_> {
        ContainerAdapter::new(self.engine, &self.config)
    }

    fn stacks(&self) -> ComposeAdapter<'_> {
        ComposeAdapter::new(self.compose, self.config.source_dir())
    }

    fn confirm(&self, question: &str) -> Result<()> {
        if self.assume_yes {
            debug!("Auto-confirmed: {}", question);
            return Ok(());
        }
        if self.prompter.confirm(question)? {
            Ok(())
        } else {
            Err(anyhow!(SdaError::Aborted))
        }
    }

    fn resolve(&self, name: &str) -> Result<Service> {
        self.config.get_service_by_name(name).cloned().ok_or_else(|| {
            anyhow!(SdaError::UnknownService {
                name: name.to_string(),
                available: self.config.get_all_service_names(),
            })
        })
    }

    fn password_notice(&self, service: &Service, request: &CreateRequest) -> Option<PasswordNotice> {
        if !service.has_password {
            None
        } else if request.password.is_some() || !service.custom_password.is_empty() {
            Some(PasswordNotice::Custom)
        } else {
            Some(PasswordNotice::Default {
                password: self.config.password.clone(),
            })
        }
    }

    async fn require_container(&self, name: &str) -> Result<()> {
        if self.containers().exists(name).await? {
            Ok(())
        } else {
            Err(anyhow!(SdaError::NotFound {
                kind: "Container",
                name: self.config.container_name(name)
            }))
        }
    }

    fn compose_unsupported(service: &Service, verb: &str) -> anyhow::Error {
        anyhow!(SdaError::Validation(format!(
            "{} is not supported for compose services ('{}')",
            verb, service.name
        )))
    }

    // --- create ---

    #[instrument(skip(self, request), fields(service = %request.name))]
    pub async fn create(&mut self, request: CreateRequest) -> Result<CreateOutcome> {
        self.resolve(&request.name)?;
        let overrides = Overrides::parse(&request.ports, &request.volumes, &request.env)?;

        if let Some(network) = &request.network {
            self.config.update_network(network);
        }
        if let Some(password) = &request.password {
            self.config.update_password(password);
        }
        if let Some(version) = &request.version {
            self.config.update_version(&request.name, version);
        }

        let service = self.resolve(&request.name)?;
        match service.kind.clone() {
            ServiceKind::Compose(_) => {
                if !overrides.is_empty() {
                    return Err(anyhow!(SdaError::Validation(
                        "--port, --volume and --env are not supported for compose services".to_string()
                    )));
                }
                self.create_compose(&service, &request).await
            }
            ServiceKind::Container(mut docker) => {
                overrides.apply(&mut docker);
                self.create_container(&service, docker, &request).await
            }
        }
    }

    async fn create_compose(&self, service: &Service, request: &CreateRequest) -> Result<CreateOutcome> {
        self.confirm(&format!("Create compose service '{}'?", service.output_name))?;
        self.stacks().up(service, request.build, request.recreate).await?;
        info!("Compose project '{}' is up", service.name);
        Ok(CreateOutcome {
            service: service.name.clone(),
            display_name: service.output_name.clone(),
            kind: "compose",
            target: service.name.clone(),
            recreated: request.recreate,
            started: true,
            network_created: None,
            image_pulled: None,
            password: None,
            volumes_removed: Vec::new(),
        })
    }

    async fn create_container(
        &self,
        service: &Service,
        docker: DockerSpec,
        request: &CreateRequest,
    ) -> Result<CreateOutcome> {
        let containers = self.containers();
        let container = self.config.container_name(&service.name);
        let exists = containers.exists(&service.name).await?;
        if exists && !request.recreate {
            return Err(anyhow!(SdaError::AlreadyExists {
                name: service.name.clone()
            }));
        }

        let password = self.password_notice(service, request);
        let using = password
            .as_ref()
            .map(|p| format!(" {}", p.describe()))
            .unwrap_or_default();
        let question = if exists {
            format!(
                "Recreate '{}'{}? The existing container '{}' will be removed.",
                service.output_name, using, container
            )
        } else {
            format!(
                "Create '{}' ({}:{}){}?",
                service.output_name, docker.image_name, service.version, using
            )
        };
        self.confirm(&question)?;

        let mut volumes_removed = Vec::new();
        if exists {
            containers.remove(&service.name).await?;
            info!("Removed container '{}' for recreate", container);
            if request.purge_volumes {
                // Configured volumes, not the session's --volume overrides.
                volumes_removed = self.purge_named_volumes(service, true).await?;
            }
        }

        let mut network_created = None;
        if !containers.check_network().await? {
            self.confirm(&format!(
                "Network '{}' does not exist. Create it?",
                self.config.network
            ))?;
            containers.create_network().await?;
            info!("Created network '{}'", self.config.network);
            network_created = Some(self.config.network.clone());
        }

        let mut effective = service.clone();
        effective.kind = ServiceKind::Container(docker.clone());
        let image_pulled = containers.create(&effective, &docker).await?;
        info!("Created container '{}'", container);

        if !request.no_start {
            containers.start(&service.name).await?;
            info!("Started container '{}'", container);
        }

        Ok(CreateOutcome {
            service: service.name.clone(),
            display_name: service.output_name.clone(),
            kind: "container",
            target: container,
            recreated: exists,
            started: !request.no_start,
            network_created,
            image_pulled,
            password,
            volumes_removed,
        })
    }

    /// Removes the service's configured named volumes.
    ///
    /// Skipped silently when none are configured. With `ask`, the volume list
    /// is confirmed first.
    async fn purge_named_volumes(&self, service: &Service, ask: bool) -> Result<Vec<String>> {
        let named = transform::named_volumes_for_service(&self.config, service);
        if named.is_empty() {
            debug!("Service '{}' has no named volumes.", service.name);
            return Ok(Vec::new());
        }
        if ask {
            self.confirm(&format!("Remove volumes: {}?", named.join(", ")))?;
        }
        Ok(self.containers().remove_volumes(&named).await)
    }

    /// Named volumes a remove without `--volumes` leaves behind, for
    /// services marked `isPersistent`.
    fn kept_volumes(&self, service: &Service) -> Vec<String> {
        match &service.kind {
            ServiceKind::Container(docker) if docker.is_persistent => {
                transform::named_volumes_for_service(&self.config, service)
            }
            _ => Vec::new(),
        }
    }

    // --- start / stop ---

    pub async fn start(&self, target: Target) -> Result<ActionReport> {
        self.run_lifecycle(target, Verb::Start).await
    }

    pub async fn stop(&self, target: Target) -> Result<ActionReport> {
        self.run_lifecycle(target, Verb::Stop).await
    }

    #[instrument(skip(self))]
    async fn run_lifecycle(&self, target: Target, verb: Verb) -> Result<ActionReport> {
        let mut report = ActionReport::new(verb.past());
        if let Target::One(name) = &target {
            let service = self.resolve(name)?;
            match &service.kind {
                ServiceKind::Container(_) => {
                    self.require_container(name).await?;
                    self.lifecycle_container(name, verb).await?;
                }
                ServiceKind::Compose(_) => match verb {
                    Verb::Start => self.stacks().start(&service).await?,
                    Verb::Stop => self.stacks().stop(&service).await?,
                },
            }
            report.succeeded.push(name.clone());
            return Ok(report);
        }

        let names = self.bulk_names(&target).await?;
        if names.is_empty() {
            return Ok(report);
        }
        self.confirm(&format!(
            "{} {} service(s): {}?",
            verb.label(),
            names.len(),
            names.join(", ")
        ))?;
        for name in names {
            match self.lifecycle_container(&name, verb).await {
                Ok(()) => report.succeeded.push(name),
                Err(e) => {
                    warn!("{} failed for '{}': {:#}", verb.label(), name, e);
                    report.failed.push(Failure {
                        name,
                        error: format!("{:#}", e),
                    });
                }
            }
        }
        Ok(report)
    }

    async fn lifecycle_container(&self, name: &str, verb: Verb) -> Result<()> {
        match verb {
            Verb::Start => self.containers().start(name).await,
            Verb::Stop => self.containers().stop(name).await,
        }
    }

    /// Service names selected by a bulk target, in engine order.
    async fn bulk_names(&self, target: &Target) -> Result<Vec<String>> {
        let infos = match target {
            Target::All => self.containers().list_created().await?,
            Target::Running => self.containers().list_running().await?,
            Target::Stopped => self.containers().list_stopped().await?,
            Target::One(name) => return Ok(vec![name.clone()]),
        };
        Ok(infos.into_iter().map(|i| i.name).collect())
    }

    // --- remove ---

    #[instrument(skip(self))]
    pub async fn remove(&self, target: Target, volumes: bool) -> Result<ActionReport> {
        let mut report = ActionReport::new("removed");
        if let Target::One(name) = &target {
            let service = self.resolve(name)?;
            match &service.kind {
                ServiceKind::Compose(_) => {
                    let suffix = if volumes { " and its volumes" } else { "" };
                    self.confirm(&format!("Remove compose service '{}'{}?", name, suffix))?;
                    self.stacks().down(&service, volumes).await?;
                }
                ServiceKind::Container(_) => {
                    self.require_container(name).await?;
                    self.confirm(&format!(
                        "Remove service '{}' ({})?",
                        name,
                        self.config.container_name(name)
                    ))?;
                    self.containers().remove(name).await?;
                    if volumes {
                        report.volumes_removed = self.purge_named_volumes(&service, true).await?;
                    } else {
                        report.volumes_kept = self.kept_volumes(&service);
                    }
                }
            }
            report.succeeded.push(name.clone());
            return Ok(report);
        }

        let names = self.bulk_names(&target).await?;
        if names.is_empty() {
            return Ok(report);
        }
        let suffix = if volumes { " and their named volumes" } else { "" };
        self.confirm(&format!(
            "Remove {} service(s){}: {}?",
            names.len(),
            suffix,
            names.join(", ")
        ))?;
        for name in names {
            match self.containers().remove(&name).await {
                Ok(()) => {
                    if self.config.service_exists(&name) {
                        let service = self.resolve(&name)?;
                        if volumes {
                            let removed = self.purge_named_volumes(&service, false).await?;
                            report.volumes_removed.extend(removed);
                        } else {
                            report.volumes_kept.extend(self.kept_volumes(&service));
                        }
                    } else if volumes {
                        warn!("'{}' is not in the configuration, its volumes are kept.", name);
                    }
                    report.succeeded.push(name);
                }
                Err(e) => {
                    warn!("Remove failed for '{}': {:#}", name, e);
                    report.failed.push(Failure {
                        name,
                        error: format!("{:#}", e),
                    });
                }
            }
        }
        Ok(report)
    }

    // --- queries ---

    pub async fn list(&self, filter: ListFilter) -> Result<Vec<ServiceInfo>> {
        let containers = self.containers();
        match filter {
            ListFilter::Available => Ok(containers.list_available()),
            ListFilter::Created => containers.list_created().await,
            ListFilter::Running => containers.list_running().await,
            ListFilter::Stopped => containers.list_stopped().await,
        }
    }

    pub async fn show(&self, name: &str) -> Result<ServiceInfo> {
        let service = self.resolve(name)?;
        match &service.kind {
            ServiceKind::Container(_) => self.containers().get_info(name).await,
            ServiceKind::Compose(_) => Err(Self::compose_unsupported(&service, "show")),
        }
    }

    #[instrument(skip(self, options))]
    pub async fn logs(&self, name: &str, options: &LogOptions) -> Result<()> {
        let service = self.resolve(name)?;
        match &service.kind {
            ServiceKind::Container(_) => {
                self.require_container(name).await?;
                self.containers().logs(name, options).await
            }
            ServiceKind::Compose(_) => self.stacks().logs(&service, options.follow).await,
        }
    }

    #[instrument(skip(self, password))]
    pub async fn connect(&self, name: &str, web: bool, password: Option<&str>) -> Result<()> {
        let service = self.resolve(name)?;
        match &service.kind {
            ServiceKind::Container(_) => {
                self.require_container(name).await?;
                info!("Connecting to '{}' (web: {})", name, web);
                self.containers().connect(&service, password, web).await
            }
            ServiceKind::Compose(_) => Err(Self::compose_unsupported(&service, "connect")),
        }
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{sample_config, MockCompose, MockEngine, MockPrompter};
    use std::fs;
    use tempfile::tempdir;

    fn request(name: &str) -> CreateRequest {
        CreateRequest {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_unknown_service_makes_no_engine_calls() {
        let engine = MockEngine::new();
        let compose = MockCompose::new();
        let prompter = MockPrompter::new(&[]);
        let mut orch = Orchestrator::new(sample_config(), &engine, &compose, &prompter, true);

        let err = orch.create(request("nope")).await.unwrap_err();
        assert!(matches!(
            SdaError::find(&err),
            Some(SdaError::UnknownService { available, .. }) if available == &vec!["postgres", "redis", "stack"]
        ));
        let err = orch.start(Target::One("nope".into())).await.unwrap_err();
        assert!(matches!(SdaError::find(&err), Some(SdaError::UnknownService { .. })));
        assert!(engine.calls().is_empty());
        assert!(engine.list_calls() == 0);
    }

    #[tokio::test]
    async fn test_invalid_override_makes_no_engine_calls() {
        let engine = MockEngine::new();
        let compose = MockCompose::new();
        let prompter = MockPrompter::new(&[]);
        let mut orch = Orchestrator::new(sample_config(), &engine, &compose, &prompter, true);
        let mut req = request("postgres");
        req.ports = vec!["abc:80".into()];
        let err = orch.create(req).await.unwrap_err();
        assert!(matches!(SdaError::find(&err), Some(SdaError::Validation(_))));
        assert!(engine.calls().is_empty());
        assert_eq!(engine.list_calls(), 0);
    }

    #[tokio::test]
    async fn test_create_full_sequence_with_assume_yes() {
        let engine = MockEngine::new();
        let compose = MockCompose::new();
        let prompter = MockPrompter::new(&[]);
        let mut orch = Orchestrator::new(sample_config(), &engine, &compose, &prompter, true);

        let outcome = orch.create(request("postgres")).await.unwrap();
        assert_eq!(outcome.target, "sda-postgres");
        assert_eq!(outcome.display_name, "PostgreSQL");
        assert_eq!(outcome.network_created.as_deref(), Some("sda"));
        assert_eq!(outcome.image_pulled.as_deref(), Some("postgres:17"));
        assert_eq!(
            outcome.password,
            Some(PasswordNotice::Default {
                password: "pw".into()
            })
        );
        assert!(outcome.started);
        assert_eq!(
            engine.calls(),
            vec![
                "create_network sda",
                "pull_image postgres:17",
                "create_container sda-postgres",
                "start_container sda-postgres",
            ]
        );
        assert!(prompter.questions().is_empty());
    }

    #[tokio::test]
    async fn test_create_applies_session_overrides() {
        let engine = MockEngine::new();
        engine.add_network("lab");
        let compose = MockCompose::new();
        let prompter = MockPrompter::new(&[]);
        let mut orch = Orchestrator::new(sample_config(), &engine, &compose, &prompter, true);

        let req = CreateRequest {
            network: Some("lab".into()),
            password: Some("hunter2".into()),
            version: Some("16".into()),
            ports: vec!["127.0.0.1:15432:5432".into()],
            env: vec!["TZ=UTC".into()],
            no_start: true,
            ..request("postgres")
        };
        let outcome = orch.create(req).await.unwrap();
        assert!(!outcome.started);
        assert!(outcome.network_created.is_none());
        assert_eq!(outcome.password, Some(PasswordNotice::Custom));

        let spec = engine.last_spec().unwrap();
        assert_eq!(spec.image_ref(), "postgres:16");
        assert_eq!(spec.network, "lab");
        assert!(spec.env.contains(&"POSTGRES_PASSWORD=hunter2".to_string()));
        assert!(spec.env.contains(&"TZ=UTC".to_string()));
        assert_eq!(spec.ports.len(), 1);
        assert_eq!(spec.ports[0].host_ip.as_deref(), Some("127.0.0.1"));
        assert!(engine.calls_matching("start_container").is_empty());
        assert_eq!(orch.config().network, "lab");
    }

    #[tokio::test]
    async fn test_create_existing_without_recreate_mutates_nothing() {
        let engine = MockEngine::new();
        engine.add_container("sda-postgres", "postgres:17", true);
        let compose = MockCompose::new();
        let prompter = MockPrompter::new(&[true]);
        let mut orch = Orchestrator::new(sample_config(), &engine, &compose, &prompter, false);

        let err = orch.create(request("postgres")).await.unwrap_err();
        assert!(matches!(SdaError::find(&err), Some(SdaError::AlreadyExists { .. })));
        assert!(err.to_string().contains("--recreate"));
        assert!(engine.calls().is_empty());
        assert!(prompter.questions().is_empty());
    }

    #[tokio::test]
    async fn test_recreate_removes_then_creates_and_purges() {
        let engine = MockEngine::new();
        engine.add_container("sda-postgres", "postgres:17", true);
        engine.add_volume("sda-postgres-data");
        engine.add_network("sda");
        engine.add_image("postgres:17");
        let compose = MockCompose::new();
        let prompter = MockPrompter::new(&[]);
        let mut orch = Orchestrator::new(sample_config(), &engine, &compose, &prompter, true);

        let req = CreateRequest {
            recreate: true,
            purge_volumes: true,
            ..request("postgres")
        };
        let outcome = orch.create(req).await.unwrap();
        assert!(outcome.recreated);
        assert_eq!(outcome.volumes_removed, vec!["sda-postgres-data"]);
        assert_eq!(
            engine.calls(),
            vec![
                "remove_container sda-postgres",
                "remove_volume sda-postgres-data",
                "create_container sda-postgres",
                "start_container sda-postgres",
            ]
        );
    }

    #[tokio::test]
    async fn test_recreate_purges_configured_volumes_despite_override() {
        let engine = MockEngine::new();
        engine.add_container("sda-postgres", "postgres:17", true);
        engine.add_volume("sda-postgres-data");
        engine.add_network("sda");
        engine.add_image("postgres:17");
        let compose = MockCompose::new();
        let prompter = MockPrompter::new(&[]);
        let mut orch = Orchestrator::new(sample_config(), &engine, &compose, &prompter, true);

        let req = CreateRequest {
            recreate: true,
            purge_volumes: true,
            volumes: vec!["scratch:/var/lib/postgresql/data".into()],
            ..request("postgres")
        };
        let outcome = orch.create(req).await.unwrap();
        assert_eq!(outcome.volumes_removed, vec!["sda-postgres-data"]);
        assert!(engine.calls_matching("remove_volume scratch").is_empty());
        let spec = engine.last_spec().unwrap();
        assert_eq!(spec.binds, vec!["scratch:/var/lib/postgresql/data"]);
    }

    #[tokio::test]
    async fn test_recreate_leaves_service_absent_when_create_fails() {
        let engine = MockEngine::new();
        engine.add_container("sda-postgres", "postgres:16", true);
        engine.add_network("sda");
        engine.add_image("postgres:17");
        engine.fail_create_for("sda-postgres");
        let compose = MockCompose::new();
        let prompter = MockPrompter::new(&[]);
        let mut orch = Orchestrator::new(sample_config(), &engine, &compose, &prompter, true);

        let req = CreateRequest {
            recreate: true,
            ..request("postgres")
        };
        let err = orch.create(req).await.unwrap_err();
        assert!(err.to_string().contains("simulated create failure"));
        assert_eq!(
            engine.calls(),
            vec!["remove_container sda-postgres", "create_container sda-postgres"]
        );
        let config = sample_config();
        let adapter = ContainerAdapter::new(&engine, &config);
        assert!(!adapter.exists("postgres").await.unwrap());
    }

    #[tokio::test]
    async fn test_create_without_password_has_no_notice() {
        let engine = MockEngine::new();
        engine.add_network("sda");
        let compose = MockCompose::new();
        let prompter = MockPrompter::new(&[true]);
        let mut orch = Orchestrator::new(sample_config(), &engine, &compose, &prompter, false);

        let outcome = orch.create(request("redis")).await.unwrap();
        assert!(outcome.password.is_none());
        assert_eq!(outcome.display_name, "redis");
        assert_eq!(prompter.questions(), vec!["Create 'redis' (redis:7)?"]);
    }

    #[tokio::test]
    async fn test_create_prompt_mentions_default_password() {
        let engine = MockEngine::new();
        let compose = MockCompose::new();
        let prompter = MockPrompter::new(&[false]);
        let mut orch = Orchestrator::new(sample_config(), &engine, &compose, &prompter, false);

        let err = orch.create(request("postgres")).await.unwrap_err();
        assert!(SdaError::is_aborted(&err));
        assert_eq!(
            prompter.questions(),
            vec!["Create 'PostgreSQL' (postgres:17) using the default password 'pw'?"]
        );
    }

    #[tokio::test]
    async fn test_declined_network_prompt_aborts_before_create() {
        let engine = MockEngine::new();
        let compose = MockCompose::new();
        let prompter = MockPrompter::new(&[true, false]);
        let mut orch = Orchestrator::new(sample_config(), &engine, &compose, &prompter, false);

        let err = orch.create(request("postgres")).await.unwrap_err();
        assert!(SdaError::is_aborted(&err));
        assert_eq!(prompter.questions().len(), 2);
        assert!(prompter.questions()[1].contains("Network 'sda'"));
        assert!(engine.calls().is_empty());
    }

    #[tokio::test]
    async fn test_declined_create_prompt_aborts() {
        let engine = MockEngine::new();
        let compose = MockCompose::new();
        let prompter = MockPrompter::new(&[false]);
        let mut orch = Orchestrator::new(sample_config(), &engine, &compose, &prompter, false);
        let err = orch.create(request("redis")).await.unwrap_err();
        assert!(SdaError::is_aborted(&err));
        assert!(engine.calls().is_empty());
    }

    #[tokio::test]
    async fn test_compose_create_rejects_container_overrides() {
        let engine = MockEngine::new();
        let compose = MockCompose::new();
        let prompter = MockPrompter::new(&[]);
        let mut orch = Orchestrator::new(sample_config(), &engine, &compose, &prompter, true);
        let req = CreateRequest {
            ports: vec!["8080:80".into()],
            ..request("stack")
        };
        let err = orch.create(req).await.unwrap_err();
        assert!(matches!(SdaError::find(&err), Some(SdaError::Validation(_))));
        assert!(compose.calls().is_empty());
    }

    #[tokio::test]
    async fn test_compose_verbs_resolve_path_and_delegate() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join("stack")).unwrap();
        fs::write(dir.path().join("stack/docker-compose.yaml"), "services: {}\n").unwrap();
        let mut config = sample_config();
        config.source_dir = dir.path().to_path_buf();

        let engine = MockEngine::new();
        let compose = MockCompose::new();
        let prompter = MockPrompter::new(&[]);
        let mut orch = Orchestrator::new(config, &engine, &compose, &prompter, true);

        let outcome = orch
            .create(CreateRequest {
                build: true,
                ..request("stack")
            })
            .await
            .unwrap();
        assert_eq!(outcome.kind, "compose");
        orch.stop(Target::One("stack".into())).await.unwrap();
        orch.start(Target::One("stack".into())).await.unwrap();
        orch.remove(Target::One("stack".into()), true).await.unwrap();
        assert_eq!(
            compose.calls(),
            vec![
                "up stack build=true recreate=false",
                "stop stack",
                "start stack",
                "down stack volumes=true",
            ]
        );
        assert!(engine.calls().is_empty());
    }

    #[tokio::test]
    async fn test_start_missing_plain_container_is_not_found() {
        let engine = MockEngine::new();
        let compose = MockCompose::new();
        let prompter = MockPrompter::new(&[]);
        let orch = Orchestrator::new(sample_config(), &engine, &compose, &prompter, true);
        let err = orch.start(Target::One("redis".into())).await.unwrap_err();
        assert!(matches!(
            SdaError::find(&err),
            Some(SdaError::NotFound { kind: "Container", .. })
        ));
        assert!(engine.calls().is_empty());
    }

    #[tokio::test]
    async fn test_bulk_remove_collects_failures_and_continues() {
        let engine = MockEngine::new();
        engine.add_container("sda-postgres", "postgres:17", true);
        engine.add_container("sda-redis", "redis:7", false);
        engine.add_container("sda-mysql", "mysql:8", true);
        engine.fail_for("sda-redis");
        let compose = MockCompose::new();
        let prompter = MockPrompter::new(&[true]);
        let orch = Orchestrator::new(sample_config(), &engine, &compose, &prompter, false);

        let report = orch.remove(Target::All, false).await.unwrap();
        assert_eq!(prompter.questions().len(), 1);
        assert!(prompter.questions()[0].starts_with("Remove 3 service(s)"));
        assert_eq!(report.succeeded, vec!["postgres", "mysql"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].name, "redis");
        assert!(report.has_failures());
        assert_eq!(engine.calls_matching("remove_container").len(), 3);
    }

    #[tokio::test]
    async fn test_bulk_stop_only_targets_running() {
        let engine = MockEngine::new();
        engine.add_container("sda-postgres", "postgres:17", true);
        engine.add_container("sda-redis", "redis:7", false);
        let compose = MockCompose::new();
        let prompter = MockPrompter::new(&[]);
        let orch = Orchestrator::new(sample_config(), &engine, &compose, &prompter, true);

        let report = orch.stop(Target::Running).await.unwrap();
        assert_eq!(report.action, "stopped");
        assert_eq!(report.succeeded, vec!["postgres"]);
        assert_eq!(engine.calls(), vec!["stop_container sda-postgres"]);
    }

    #[tokio::test]
    async fn test_bulk_with_empty_selection_does_not_prompt() {
        let engine = MockEngine::new();
        let compose = MockCompose::new();
        let prompter = MockPrompter::new(&[]);
        let orch = Orchestrator::new(sample_config(), &engine, &compose, &prompter, false);
        let report = orch.start(Target::Stopped).await.unwrap();
        assert!(report.succeeded.is_empty());
        assert!(prompter.questions().is_empty());
    }

    #[tokio::test]
    async fn test_bulk_decline_aborts_without_calls() {
        let engine = MockEngine::new();
        engine.add_container("sda-postgres", "postgres:17", false);
        let compose = MockCompose::new();
        let prompter = MockPrompter::new(&[false]);
        let orch = Orchestrator::new(sample_config(), &engine, &compose, &prompter, false);
        let err = orch.start(Target::All).await.unwrap_err();
        assert!(SdaError::is_aborted(&err));
        assert!(engine.calls().is_empty());
    }

    #[tokio::test]
    async fn test_remove_with_volumes_swallows_volume_failure() {
        let engine = MockEngine::new();
        engine.add_container("sda-postgres", "postgres:17", true);
        let compose = MockCompose::new();
        let prompter = MockPrompter::new(&[true, true]);
        let orch = Orchestrator::new(sample_config(), &engine, &compose, &prompter, false);

        // The named volume was never created, so its removal fails.
        let report = orch.remove(Target::One("postgres".into()), true).await.unwrap();
        assert!(report.volumes_removed.is_empty());
        assert!(!report.has_failures());
        assert_eq!(prompter.questions().len(), 2);
        assert!(prompter.questions()[1].contains("sda-postgres-data"));
        assert_eq!(
            engine.calls(),
            vec!["remove_container sda-postgres", "remove_volume sda-postgres-data"]
        );
    }

    #[tokio::test]
    async fn test_remove_without_volumes_reports_kept_persistent_volumes() {
        let engine = MockEngine::new();
        engine.add_container("sda-postgres", "postgres:17", true);
        engine.add_container("sda-redis", "redis:7", true);
        let compose = MockCompose::new();
        let prompter = MockPrompter::new(&[]);
        let orch = Orchestrator::new(sample_config(), &engine, &compose, &prompter, true);

        let report = orch.remove(Target::One("postgres".into()), false).await.unwrap();
        assert_eq!(report.volumes_kept, vec!["sda-postgres-data"]);
        let report = orch.remove(Target::One("redis".into()), false).await.unwrap();
        assert!(report.volumes_kept.is_empty());
        assert!(engine.calls_matching("remove_volume").is_empty());
    }

    #[tokio::test]
    async fn test_remove_volumes_skipped_when_none_configured() {
        let engine = MockEngine::new();
        engine.add_container("sda-redis", "redis:7", true);
        let compose = MockCompose::new();
        let prompter = MockPrompter::new(&[true]);
        let orch = Orchestrator::new(sample_config(), &engine, &compose, &prompter, false);
        orch.remove(Target::One("redis".into()), true).await.unwrap();
        assert_eq!(prompter.questions().len(), 1);
        assert_eq!(engine.calls(), vec!["remove_container sda-redis"]);
    }

    #[tokio::test]
    async fn test_container_removal_failure_is_returned() {
        let engine = MockEngine::new();
        engine.add_container("sda-redis", "redis:7", true);
        engine.fail_for("sda-redis");
        let compose = MockCompose::new();
        let prompter = MockPrompter::new(&[]);
        let orch = Orchestrator::new(sample_config(), &engine, &compose, &prompter, true);
        assert!(orch.remove(Target::One("redis".into()), false).await.is_err());
    }

    #[tokio::test]
    async fn test_show_and_connect_refuse_compose() {
        let engine = MockEngine::new();
        let compose = MockCompose::new();
        let prompter = MockPrompter::new(&[]);
        let orch = Orchestrator::new(sample_config(), &engine, &compose, &prompter, true);
        let err = orch.show("stack").await.unwrap_err();
        assert!(err.to_string().contains("not supported for compose services"));
        let err = orch.connect("stack", false, None).await.unwrap_err();
        assert!(matches!(SdaError::find(&err), Some(SdaError::Validation(_))));
    }

    #[tokio::test]
    async fn test_show_missing_container_is_not_found() {
        let engine = MockEngine::new();
        let compose = MockCompose::new();
        let prompter = MockPrompter::new(&[]);
        let orch = Orchestrator::new(sample_config(), &engine, &compose, &prompter, true);
        let err = orch.show("postgres").await.unwrap_err();
        assert!(matches!(SdaError::find(&err), Some(SdaError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_logs_and_connect_require_container() {
        let engine = MockEngine::new();
        let compose = MockCompose::new();
        let prompter = MockPrompter::new(&[]);
        let orch = Orchestrator::new(sample_config(), &engine, &compose, &prompter, true);
        assert!(orch.logs("postgres", &LogOptions::default()).await.is_err());
        assert!(orch.connect("postgres", false, None).await.is_err());

        engine.add_container("sda-postgres", "postgres:17", true);
        orch.logs("postgres", &LogOptions::default()).await.unwrap();
        orch.connect("postgres", false, None).await.unwrap();
        assert_eq!(
            engine.calls(),
            vec![
                "logs sda-postgres",
                "exec sda-postgres PGPASSWORD=pw psql -U postgres",
            ]
        );
    }

    #[tokio::test]
    async fn test_list_filters() {
        let engine = MockEngine::new();
        engine.add_container("sda-postgres", "postgres:17", true);
        engine.add_container("sda-redis", "redis:7", false);
        let compose = MockCompose::new();
        let prompter = MockPrompter::new(&[]);
        let orch = Orchestrator::new(sample_config(), &engine, &compose, &prompter, true);
        assert_eq!(orch.list(ListFilter::Available).await.unwrap().len(), 3);
        assert_eq!(orch.list(ListFilter::Created).await.unwrap().len(), 2);
        assert_eq!(orch.list(ListFilter::Running).await.unwrap()[0].name, "postgres");
        assert_eq!(orch.list(ListFilter::Stopped).await.unwrap()[0].name, "redis");
    }
}
