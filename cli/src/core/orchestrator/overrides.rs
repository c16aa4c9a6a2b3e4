//! # Create-time Overrides
//!
//! File: cli/src/core/orchestrator/overrides.rs
//!
//! Parses `--port`, `--volume` and `--env` values and merges them into a
//! copy of a service's `DockerSpec`. All values are parsed before anything
//! is applied; the first malformed value rejects the whole set.
//!
//! Merge rules:
//! - ports replace the configured list,
//! - a volume replaces the entry with the same target, otherwise it is added,
//! - an env var replaces the entry with the same key, otherwise it is added.
//!
use crate::core::config::{DockerSpec, PortMapping, Volume};
use crate::core::error::{Result, SdaError};
use anyhow::anyhow;
use std::net::Ipv4Addr;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Overrides {
    pub ports: Vec<PortMapping>,
    pub volumes: Vec<Volume>,
    pub env: Vec<(String, String)>,
}

fn invalid(message: String) -> anyhow::Error {
    anyhow!(SdaError::Validation(message))
}

impl Overrides {
    pub fn parse(ports: &[String], volumes: &[String], env: &[String]) -> Result<Self> {
        Ok(Self {
            ports: ports.iter().map(|p| parse_port(p)).collect::<Result<_>>()?,
            volumes: volumes.iter().map(|v| parse_volume(v)).collect::<Result<_>>()?,
            env: env.iter().map(|e| parse_env(e)).collect::<Result<_>>()?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty() && self.volumes.is_empty() && self.env.is_empty()
    }

    pub fn apply(&self, docker: &mut DockerSpec) {
        if !self.ports.is_empty() {
            docker.port_mappings = self.ports.clone();
        }
        for volume in &self.volumes {
            match docker.volumes.iter_mut().find(|v| v.target == volume.target) {
                Some(existing) => *existing = volume.clone(),
                None => docker.volumes.push(volume.clone()),
            }
        }
        for (key, value) in &self.env {
            let entry = format!("{}={}", key, value);
            let same_key = |e: &String| e.split_once('=').map_or(e.as_str(), |(k, _)| k) == key;
            match docker.env_vars.iter_mut().find(|e| same_key(e)) {
                Some(existing) => *existing = entry,
                None => docker.env_vars.push(entry),
            }
        }
    }
}

fn parse_port_number(raw: &str, whole: &str) -> Result<u16> {
    match raw.parse::<u16>() {
        Ok(0) | Err(_) => Err(invalid(format!(
            "port '{}' in '{}' must be a number between 1 and 65535",
            raw, whole
        ))),
        Ok(port) => Ok(port),
    }
}

/// `HOST:CONTAINER` or `IP:HOST:CONTAINER`.
pub fn parse_port(raw: &str) -> Result<PortMapping> {
    let parts: Vec<&str> = raw.split(':').collect();
    match parts.as_slice() {
        [host, container] => Ok(PortMapping {
            host: parse_port_number(host, raw)?,
            container: parse_port_number(container, raw)?,
            host_ip: None,
        }),
        [ip, host, container] => {
            ip.parse::<Ipv4Addr>()
                .map_err(|_| invalid(format!("'{}' in '{}' is not an IPv4 address", ip, raw)))?;
            Ok(PortMapping {
                host: parse_port_number(host, raw)?,
                container: parse_port_number(container, raw)?,
                host_ip: Some(ip.to_string()),
            })
        }
        _ => Err(invalid(format!(
            "port mapping '{}' must be HOST:CONTAINER or IP:HOST:CONTAINER",
            raw
        ))),
    }
}

/// `SOURCE:TARGET`. A source without a path separator is a named volume.
pub fn parse_volume(raw: &str) -> Result<Volume> {
    let parts: Vec<&str> = raw.split(':').collect();
    match parts.as_slice() {
        [source, target] if !source.is_empty() && !target.is_empty() => Ok(Volume {
            source: source.to_string(),
            target: target.to_string(),
            is_named: !source.contains('/') && !source.starts_with('~') && !source.starts_with('.'),
        }),
        _ => Err(invalid(format!("volume '{}' must be SOURCE:TARGET", raw))),
    }
}

/// `KEY=VALUE`, where KEY is a shell-style identifier. VALUE may be empty.
pub fn parse_env(raw: &str) -> Result<(String, String)> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| invalid(format!("env var '{}' must be KEY=VALUE", raw)))?;
    let mut chars = key.chars();
    let valid_key = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !valid_key {
        return Err(invalid(format!("'{}' is not a valid env var name", key)));
    }
    Ok((key.to_string(), value.to_string()))
}
