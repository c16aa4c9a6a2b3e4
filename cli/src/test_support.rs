use crate::common::docker::compose::ComposeEngine;
use crate::common::docker::engine::{ContainerEngine, ContainerRecord, ContainerSpec, LogOptions};
use crate::common::ui::prompt::Prompter;
use crate::core::config::{parse_config, Config};
use crate::core::error::{Result, SdaError};
use anyhow::{anyhow, bail};
use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::path::Path;

const SAMPLE_CONFIG: &str = r#"
defaultNetwork = "sda"
defaultPassword = "pw"
prefix = "sda"

[[services]]
name = "postgres"
outputName = "PostgreSQL"
defaultVersion = "17"
hasPassword = true
hasCliConnect = true
cliConnectCommand = "PGPASSWORD={{.PASSWORD}} psql -U postgres"
[services.docker]
imageName = "postgres"
portMappings = [{ host = 5432, container = 5432 }]
isPersistent = true
volumes = [{ source = "{{.NAME}}-data", target = "/var/lib/postgresql/data", isNamed = true }]
envVars = ["POSTGRES_PASSWORD={{.PASSWORD}}"]

[[services]]
name = "redis"
defaultVersion = "7"
[services.docker]
imageName = "redis"
portMappings = [{ host = 6379, container = 6379 }]

[[services]]
name = "stack"
compose = "stack"
"#;

pub fn sample_config() -> Config {
    parse_config(SAMPLE_CONFIG).unwrap()
}

#[derive(Debug, Clone)]
pub struct MockContainer {
    pub name: String,
    pub image: String,
    pub running: bool,
}

/// In-memory engine. Mutating calls are recorded as `"<op> <name>"`.
pub struct MockEngine {
    containers: RefCell<Vec<MockContainer>>,
    volumes: RefCell<Vec<String>>,
    networks: RefCell<Vec<String>>,
    images: RefCell<Vec<String>>,
    calls: RefCell<Vec<String>>,
    specs: RefCell<Vec<ContainerSpec>>,
    fail_on: RefCell<Vec<String>>,
    fail_create: RefCell<Vec<String>>,
    list_calls: Cell<usize>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self {
            containers: RefCell::new(Vec::new()),
            volumes: RefCell::new(Vec::new()),
            networks: RefCell::new(Vec::new()),
            images: RefCell::new(Vec::new()),
            calls: RefCell::new(Vec::new()),
            specs: RefCell::new(Vec::new()),
            fail_on: RefCell::new(Vec::new()),
            fail_create: RefCell::new(Vec::new()),
            list_calls: Cell::new(0),
        }
    }

    pub fn add_container(&self, name: &str, image: &str, running: bool) {
        self.containers.borrow_mut().push(MockContainer {
            name: name.to_string(),
            image: image.to_string(),
            running,
        });
    }

    pub fn add_volume(&self, name: &str) {
        self.volumes.borrow_mut().push(name.to_string());
    }

    pub fn add_network(&self, name: &str) {
        self.networks.borrow_mut().push(name.to_string());
    }

    pub fn add_image(&self, image_ref: &str) {
        self.images.borrow_mut().push(image_ref.to_string());
    }

    /// Makes every lifecycle call on this container fail.
    pub fn fail_for(&self, name: &str) {
        self.fail_on.borrow_mut().push(name.to_string());
    }

    /// Fails only `create_container` for `name`; other calls still succeed.
    pub fn fail_create_for(&self, name: &str) {
        self.fail_create.borrow_mut().push(name.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn calls_matching(&self, prefix: &str) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .cloned()
            .collect()
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.get()
    }

    pub fn last_spec(&self) -> Option<ContainerSpec> {
        self.specs.borrow().last().cloned()
    }

    #[allow(dead_code)]
    pub fn is_running(&self, name: &str) -> Option<bool> {
        self.containers
            .borrow()
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.running)
    }

    fn record(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }

    fn check(&self, name: &str) -> Result<()> {
        if self.fail_on.borrow().iter().any(|n| n == name) {
            bail!("simulated engine failure for '{}'", name);
        }
        if !self.containers.borrow().iter().any(|c| c.name == name) {
            return Err(anyhow!(SdaError::NotFound {
                kind: "Container",
                name: name.to_string()
            }));
        }
        Ok(())
    }

    fn set_running(&self, name: &str, running: bool) {
        if let Some(c) = self.containers.borrow_mut().iter_mut().find(|c| c.name == name) {
            c.running = running;
        }
    }
}

#[async_trait(?Send)]
impl ContainerEngine for MockEngine {
    async fn list_containers(&self, name_filter: &str, status: Option<&str>) -> Result<Vec<ContainerRecord>> {
        self.list_calls.set(self.list_calls.get() + 1);
        Ok(self
            .containers
            .borrow()
            .iter()
            .filter(|c| c.name.contains(name_filter))
            .filter(|c| match status {
                Some("running") => c.running,
                Some("exited") => !c.running,
                _ => true,
            })
            .map(|c| ContainerRecord {
                id: format!("id-{}", c.name),
                names: vec![format!("/{}", c.name)],
                image: c.image.clone(),
                status: if c.running {
                    "Up 2 minutes".to_string()
                } else {
                    "Exited (0) 5 minutes ago".to_string()
                },
                ports: Vec::new(),
            })
            .collect())
    }

    async fn image_exists(&self, image_ref: &str) -> Result<bool> {
        Ok(self.images.borrow().iter().any(|i| i == image_ref))
    }

    async fn pull_image(&self, image: &str, tag: &str) -> Result<()> {
        let image_ref = format!("{}:{}", image, tag);
        self.record(format!("pull_image {}", image_ref));
        self.images.borrow_mut().push(image_ref);
        Ok(())
    }

    async fn create_container(&self, spec: &ContainerSpec) -> Result<()> {
        self.record(format!("create_container {}", spec.name));
        if self.fail_create.borrow().iter().any(|n| *n == spec.name) {
            bail!("simulated create failure for '{}'", spec.name);
        }
        if self.containers.borrow().iter().any(|c| c.name == spec.name) {
            return Err(anyhow!(SdaError::AlreadyExists {
                name: spec.name.clone()
            }));
        }
        self.specs.borrow_mut().push(spec.clone());
        self.add_container(&spec.name, &spec.image_ref(), false);
        Ok(())
    }

    async fn start_container(&self, name: &str) -> Result<()> {
        self.record(format!("start_container {}", name));
        self.check(name)?;
        self.set_running(name, true);
        Ok(())
    }

    async fn stop_container(&self, name: &str) -> Result<()> {
        self.record(format!("stop_container {}", name));
        self.check(name)?;
        self.set_running(name, false);
        Ok(())
    }

    async fn remove_container(&self, name: &str) -> Result<()> {
        self.record(format!("remove_container {}", name));
        self.check(name)?;
        self.containers.borrow_mut().retain(|c| c.name != name);
        Ok(())
    }

    async fn remove_volume(&self, name: &str) -> Result<()> {
        self.record(format!("remove_volume {}", name));
        let mut volumes = self.volumes.borrow_mut();
        let before = volumes.len();
        volumes.retain(|v| v != name);
        if volumes.len() == before {
            return Err(anyhow!(SdaError::NotFound {
                kind: "Volume",
                name: name.to_string()
            }));
        }
        Ok(())
    }

    async fn network_exists(&self, name: &str) -> Result<bool> {
        Ok(self.networks.borrow().iter().any(|n| n == name))
    }

    async fn create_network(&self, name: &str) -> Result<()> {
        self.record(format!("create_network {}", name));
        self.networks.borrow_mut().push(name.to_string());
        Ok(())
    }

    async fn stream_logs(&self, name: &str, _options: &LogOptions) -> Result<()> {
        self.record(format!("logs {}", name));
        Ok(())
    }

    async fn exec_interactive(&self, name: &str, command: &str) -> Result<()> {
        self.record(format!("exec {} {}", name, command));
        Ok(())
    }
}

pub struct MockCompose {
    calls: RefCell<Vec<String>>,
}

impl MockCompose {
    pub fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn record(&self, call: String) -> Result<()> {
        self.calls.borrow_mut().push(call);
        Ok(())
    }
}

#[async_trait(?Send)]
impl ComposeEngine for MockCompose {
    async fn up(&self, project: &str, _file: &Path, build: bool, recreate: bool) -> Result<()> {
        self.record(format!("up {} build={} recreate={}", project, build, recreate))
    }

    async fn start(&self, project: &str) -> Result<()> {
        self.record(format!("start {}", project))
    }

    async fn stop(&self, project: &str) -> Result<()> {
        self.record(format!("stop {}", project))
    }

    async fn down(&self, project: &str, remove_volumes: bool) -> Result<()> {
        self.record(format!("down {} volumes={}", project, remove_volumes))
    }

    async fn logs(&self, project: &str, follow: bool) -> Result<()> {
        self.record(format!("logs {} follow={}", project, follow))
    }
}

/// Answers prompts from a script; an exhausted script declines.
pub struct MockPrompter {
    answers: RefCell<VecDeque<bool>>,
    questions: RefCell<Vec<String>>,
}

impl MockPrompter {
    pub fn new(answers: &[bool]) -> Self {
        Self {
            answers: RefCell::new(answers.iter().copied().collect()),
            questions: RefCell::new(Vec::new()),
        }
    }

    pub fn questions(&self) -> Vec<String> {
        self.questions.borrow().clone()
    }
}

impl Prompter for MockPrompter {
    fn confirm(&self, question: &str) -> Result<bool> {
        self.questions.borrow_mut().push(question.to_string());
        Ok(self.answers.borrow_mut().pop_front().unwrap_or(false))
    }
}
