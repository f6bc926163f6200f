//! Catalog mirrors
//!
//! A mirror is a local git checkout of a catalog. It is cloned on first use
//! and pulled once per session; later passes of the same session reuse it.

use crate::core::catalog::{CatalogDefinition, Project};
use crate::core::error::SetupError;
use crate::core::output;
use anyhow::{Context, Result};
use std::path::Path;
use std::process::{Command, Stdio};

/// Makes a catalog's mirror available before reconciliation.
pub trait CatalogMirror {
    /// Ensure the mirror exists. `first_pass` allows refreshing an existing one.
    fn sync(&self, project: &Project, catalog: &CatalogDefinition, first_pass: bool) -> Result<()>;
}

/// Mirror backed by the `git` command line.
#[derive(Debug, Default, Clone, Copy)]
pub struct GitMirror;

impl CatalogMirror for GitMirror {
    fn sync(&self, project: &Project, catalog: &CatalogDefinition, first_pass: bool) -> Result<()> {
        let dest = project.mirror_dir(catalog);
        if dest.exists() {
            if first_pass {
                output::info("Repository found, updating...");
                git_pull(&dest, &catalog.remote)?;
            }
            return Ok(());
        }

        output::info("Repository not found, downloading...");
        validate_git_url(&catalog.remote)?;
        git_clone(&catalog.remote, &dest)
    }
}

/// Mirror that never touches the network; the checkout must already exist.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineMirror;

impl CatalogMirror for OfflineMirror {
    fn sync(&self, project: &Project, catalog: &CatalogDefinition, _first_pass: bool) -> Result<()> {
        let dest = project.mirror_dir(catalog);
        if !dest.is_dir() {
            anyhow::bail!(
                "No local {} catalog at {} (offline mode does not clone)",
                catalog.kind,
                dest.display()
            );
        }
        Ok(())
    }
}

/// Only https://, http://, ssh://, git@ and file:// remotes are accepted.
pub fn validate_git_url(url: &str) -> Result<(), SetupError> {
    if url.starts_with("https://")
        || url.starts_with("http://")
        || url.starts_with("git@")
        || url.starts_with("ssh://")
        || url.starts_with("file://")
    {
        Ok(())
    } else {
        Err(SetupError::UnsupportedRemote(url.to_string()))
    }
}

fn git_clone(url: &str, dest: &Path) -> Result<()> {
    if let Some(parent) = dest.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    output::detail(&format!("git clone {}", url));

    let pb = output::spinner(&format!("cloning {}", url));
    let result = Command::new("git")
        .arg("clone")
        .arg(url)
        .arg(dest)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output();
    output::progress_done(pb);

    let out = result.context("Failed to run git")?;
    if !out.status.success() {
        return Err(SetupError::Git {
            op: "clone",
            remote: url.to_string(),
            stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
        }
        .into());
    }
    output::detail(&format!("cloned into {}", dest.display()));
    Ok(())
}

fn git_pull(dest: &Path, url: &str) -> Result<()> {
    let pb = output::spinner("git pull origin main");
    let result = Command::new("git")
        .args(["pull", "origin", "main"])
        .current_dir(dest)
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output();
    output::progress_done(pb);

    let out = result.context("Failed to run git")?;
    if !out.status.success() {
        return Err(SetupError::Git {
            op: "pull",
            remote: url.to_string(),
            stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
        }
        .into());
    }
    Ok(())
}
