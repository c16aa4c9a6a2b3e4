//! # SDA Service Tables
//!
//! File: cli/src/common/ui/table.rs
//!
//! Renders `ServiceInfo` lists as blank-styled tables. Catalog listings show
//! `NAME VERSION IMAGE`; engine listings add status, container and ports.
//!
use crate::common::docker::{ServiceInfo, ServiceState};
use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

pub const EMPTY_MESSAGE: &str = "No services found.";

#[derive(Tabled)]
struct AvailableRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "VERSION")]
    version: String,
    #[tabled(rename = "IMAGE")]
    image: String,
}

#[derive(Tabled)]
struct ServiceRow {
    #[tabled(rename = "NAME")]
    name: String,
    #[tabled(rename = "STATUS")]
    status: String,
    #[tabled(rename = "VERSION")]
    version: String,
    #[tabled(rename = "CONTAINER")]
    container: String,
    #[tabled(rename = "PORTS")]
    ports: String,
}

/// Status cell: icon plus the engine text, coloured by state.
pub fn status_cell(info: &ServiceInfo) -> String {
    let text = if info.status.is_empty() {
        info.state.label().to_string()
    } else {
        info.status.clone()
    };
    let coloured = match info.state {
        ServiceState::Running => text.green().to_string(),
        ServiceState::Stopped => text.red().to_string(),
        ServiceState::Other => text.yellow().to_string(),
        ServiceState::Available => text,
    };
    format!("{} {}", info.status_icon, coloured)
}

pub fn render_available(services: &[ServiceInfo]) -> String {
    if services.is_empty() {
        return EMPTY_MESSAGE.to_string();
    }
    let rows: Vec<AvailableRow> = services
        .iter()
        .map(|s| AvailableRow {
            name: s.name.clone(),
            version: s.version.clone(),
            image: s.image.clone(),
        })
        .collect();
    Table::new(rows).with(Style::blank()).to_string()
}

pub fn render_services(services: &[ServiceInfo]) -> String {
    if services.is_empty() {
        return EMPTY_MESSAGE.to_string();
    }
    let rows: Vec<ServiceRow> = services
        .iter()
        .map(|s| ServiceRow {
            name: s.name.clone(),
            status: status_cell(s),
            version: s.version.clone(),
            container: s.container_name.clone(),
            ports: if s.ports.is_empty() {
                "-".to_string()
            } else {
                s.ports.join(", ")
            },
        })
        .collect();
    Table::new(rows).with(Style::blank()).to_string()
}

/// Key/value block for `sda show`.
pub fn render_details(info: &ServiceInfo) -> String {
    let ports = if info.ports.is_empty() {
        "-".to_string()
    } else {
        info.ports.join(", ")
    };
    [
        ("Name", info.name.clone()),
        ("Container", info.container_name.clone()),
        ("ID", info.id.chars().take(12).collect()),
        ("Image", info.image.clone()),
        ("Version", info.version.clone()),
        ("Status", status_cell(info)),
        ("Ports", ports),
    ]
    .iter()
    .map(|(k, v)| format!("{:<10} {}", format!("{}:", k).bold(), v))
    .collect::<Vec<_>>()
    .join("\n")
}
