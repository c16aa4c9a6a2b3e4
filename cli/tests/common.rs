// Shared helpers for the sda integration tests.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::path::{Path, PathBuf};

pub fn sda_cmd() -> Command {
    let mut cmd = Command::cargo_bin("sda").expect("Failed to find sda binary for testing");
    cmd.env_remove("SDA_CONFIG").env_remove("RUST_LOG");
    cmd
}

/// Points the Docker client at a socket that does not exist.
pub const NO_DAEMON: &str = "unix:///nonexistent/sda-test-docker.sock";

/// `sda --config <dir>/sda.toml`, so tests never touch the user's configuration.
/// Docker is unreachable, so any engine call fails.
pub fn sda_with_config(dir: &Path) -> Command {
    let mut cmd = sda_cmd();
    cmd.env("DOCKER_HOST", NO_DAEMON);
    cmd.arg("--config").arg(config_path(dir));
    cmd
}

pub fn config_path(dir: &Path) -> PathBuf {
    dir.join("sda.toml")
}
