//! # SDA Docker Module Interface
//!
//! File: cli/src/common/docker/mod.rs
//!
//! ## Overview
//!
//! Everything sda does against a container runtime lives under this module.
//! The bollard helpers at the bottom each wrap one family of Engine API
//! calls. The two seams above them (`ContainerEngine` and `ComposeEngine`)
//! are what the orchestrator depends on, through the service-level adapters.
//!
//! ## Architecture
//!
//! - **`connect`**: opens the Docker client.
//! - **`state`**, **`images`**, **`lifecycle`**, **`network`**,
//!   **`operations`**, **`interaction`**: bollard calls, one concern each.
//! - **`engine`**: the `ContainerEngine` trait and `DockerEngine`.
//! - **`transform`**: pure conversions between services and engine data.
//! - **`adapter`**: `ContainerAdapter`, plain-container services by name.
//! - **`compose`**: `ComposeEngine`, `ComposeCli` and `ComposeAdapter`.
//!

pub mod adapter;
pub mod compose;
pub mod connect;
/// Container runtime seam used by the adapters.
pub mod engine;
pub mod images;
pub mod interaction;
pub mod lifecycle;
pub mod network;
/// Container creation request mapping.
pub mod operations;
pub mod state;
pub mod transform;

pub use adapter::ContainerAdapter;
pub use compose::ComposeCli;
pub use engine::{ContainerEngine, DockerEngine, LogOptions};
pub use transform::{ServiceInfo, ServiceState};
