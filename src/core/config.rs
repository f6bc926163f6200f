//! Layered TOML configuration
//!
//! Files are merged field by field, later layers winning:
//! built-in defaults, the user config (`$XDG_CONFIG_HOME/qntm-setup/config.toml`),
//! the project's `qntm.toml`, then an explicit `--config` file.

use crate::core::catalog::{CatalogDefinition, Project};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Name of the per-project config file
pub const PROJECT_CONFIG: &str = "qntm.toml";

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ConfigToml {
    host_file: Option<String>,
    ignore_file: Option<String>,
    mirror_root: Option<String>,
    blocks: Option<CatalogToml>,
    modules: Option<CatalogToml>,
    component: Option<ComponentToml>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct CatalogToml {
    remote: Option<String>,
    mirror: Option<String>,
    target: Option<String>,
    ledger: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ComponentToml {
    entry_point: Option<String>,
    setup_hook: Option<String>,
    interpreter: Option<String>,
    cleanup_marker: Option<String>,
}

fn take<T>(dst: &mut Option<T>, src: Option<T>) {
    if src.is_some() {
        *dst = src;
    }
}

fn merge_section<T>(dst: &mut Option<T>, src: Option<T>, merge: fn(&mut T, T)) {
    if let Some(src) = src {
        match dst.as_mut() {
            Some(existing) => merge(existing, src),
            None => *dst = Some(src),
        }
    }
}

impl ConfigToml {
    fn merge(&mut self, other: ConfigToml) {
        take(&mut self.host_file, other.host_file);
        take(&mut self.ignore_file, other.ignore_file);
        take(&mut self.mirror_root, other.mirror_root);
        merge_section(&mut self.blocks, other.blocks, CatalogToml::merge);
        merge_section(&mut self.modules, other.modules, CatalogToml::merge);
        merge_section(&mut self.component, other.component, ComponentToml::merge);
    }

    fn apply(self, project: &mut Project) {
        if let Some(v) = self.host_file {
            project.host_file = v;
        }
        if let Some(v) = self.ignore_file {
            project.ignore_file = v;
        }
        if let Some(v) = self.mirror_root {
            project.mirror_root = v;
        }
        if let Some(c) = self.blocks {
            c.apply(&mut project.blocks);
        }
        if let Some(c) = self.modules {
            c.apply(&mut project.modules);
        }
        if let Some(c) = self.component {
            let layout = &mut project.layout;
            if let Some(v) = c.entry_point {
                layout.entry_point = v;
            }
            if let Some(v) = c.setup_hook {
                layout.setup_hook = v;
            }
            if let Some(v) = c.interpreter {
                layout.interpreter = v;
            }
            if let Some(v) = c.cleanup_marker {
                layout.cleanup_marker = v;
            }
        }
    }
}

impl CatalogToml {
    fn merge(&mut self, other: CatalogToml) {
        take(&mut self.remote, other.remote);
        take(&mut self.mirror, other.mirror);
        take(&mut self.target, other.target);
        take(&mut self.ledger, other.ledger);
    }

    fn apply(self, def: &mut CatalogDefinition) {
        if let Some(v) = self.remote {
            def.remote = v;
        }
        if let Some(v) = self.mirror {
            def.mirror = v;
        }
        if let Some(v) = self.target {
            def.target = v;
        }
        if let Some(v) = self.ledger {
            def.ledger = v;
        }
    }
}

impl ComponentToml {
    fn merge(&mut self, other: ComponentToml) {
        take(&mut self.entry_point, other.entry_point);
        take(&mut self.setup_hook, other.setup_hook);
        take(&mut self.interpreter, other.interpreter);
        take(&mut self.cleanup_marker, other.cleanup_marker);
    }
}

fn read_toml(path: &Path) -> Result<ConfigToml> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {}", path.display()))?;
    toml::from_str(&content).with_context(|| format!("Invalid config: {}", path.display()))
}

/// User-level config file location
pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("qntm-setup/config.toml"))
}

/// Build the project from defaults and every config layer that exists.
///
/// `explicit` must exist if given; the user and project files are optional.
pub fn load_project(root: &Path, explicit: Option<&Path>) -> Result<Project> {
    let mut layers = Vec::new();
    if let Some(user) = user_config_path() {
        layers.push(user);
    }
    layers.push(root.join(PROJECT_CONFIG));
    load_layers(root, &layers, explicit)
}

fn load_layers(root: &Path, optional: &[PathBuf], explicit: Option<&Path>) -> Result<Project> {
    let mut merged = ConfigToml::default();
    for path in optional.iter().filter(|p| p.is_file()) {
        merged.merge(read_toml(path)?);
    }
    if let Some(path) = explicit {
        merged.merge(read_toml(path)?);
    }

    let mut project = Project::new(root);
    merged.apply(&mut project);
    Ok(project)
}
