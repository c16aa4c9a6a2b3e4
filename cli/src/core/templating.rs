//! # SDA Placeholder Substitution
//!
//! File: cli/src/core/templating.rs
//!
//! ## Overview
//!
//! Configured strings (volume sources, environment values, startup commands,
//! connect commands) may contain `{{.KEY}}` placeholders. This module expands
//! them against a small set of bindings.
//!
//! ## Rules
//!
//! - `{{.KEY}}` is replaced by the binding for `KEY`; spaces inside the braces
//!   are allowed (`{{ .KEY }}`).
//! - A key with no binding expands to the empty string. It never fails.
//! - Anything else between `{{` and `}}`, and an unterminated `{{`, is copied
//!   through untouched.
//!
//! Bindings used by sda are `NAME` (the container name, `{prefix}-{service}`)
//! and `PASSWORD` (see `resolve_password`).
//!
//! ## Examples
//!
//! ```rust
//! let mut bindings = HashMap::new();
//! bindings.insert("NAME", "postgres");
//! assert_eq!(templating::expand("{{.NAME}}-data", &bindings), "postgres-data");
//! ```
//!
use crate::core::config::Service;
use std::collections::HashMap;
use tracing::debug;

/// Expands `{{.KEY}}` placeholders in `template`.
pub fn expand(template: &str, bindings: &HashMap<&str, &str>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after_open = &rest[start + 2..];
        let Some(end) = after_open.find("}}") else {
            // Unterminated; keep the remainder as-is.
            out.push_str(&rest[start..]);
            return out;
        };
        let inner = after_open[..end].trim();
        match inner.strip_prefix('.') {
            Some(key) if is_key(key) => match bindings.get(key) {
                Some(value) => out.push_str(value),
                None => debug!("Placeholder '{}' has no binding, expanding to empty", key),
            },
            _ => out.push_str(&rest[start..start + 2 + end + 2]),
        }
        rest = &after_open[end + 2..];
    }
    out.push_str(rest);
    out
}

fn is_key(key: &str) -> bool {
    !key.is_empty() && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// A service's `customPassword` always wins over the supplied password.
pub fn resolve_password<'a>(service: &'a Service, password: &'a str) -> &'a str {
    if service.custom_password.is_empty() {
        password
    } else {
        &service.custom_password
    }
}

/// Expands `NAME` and `PASSWORD` for one service.
pub fn substitute(template: &str, service: &Service, container_name: &str, password: &str) -> String {
    let mut bindings = HashMap::new();
    bindings.insert("NAME", container_name);
    bindings.insert("PASSWORD", resolve_password(service, password));
    expand(template, &bindings)
}
