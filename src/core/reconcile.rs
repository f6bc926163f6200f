//! Directory reconciliation
//!
//! Compares the component directories in a catalog mirror with the ones
//! installed in the target path. Pure reads: nothing here touches the disk.

use crate::core::error::SetupError;
use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;

/// How a selected component relates to the catalog and the install target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionClassification {
    /// In the catalog, not installed yet
    CatalogOnly,
    /// In the catalog and installed
    MatchedBoth,
    /// Installed with no catalog counterpart
    InstalledOnly,
}

impl SelectionClassification {
    pub fn is_installed(self) -> bool {
        !matches!(self, SelectionClassification::CatalogOnly)
    }

    pub fn describe(self) -> &'static str {
        match self {
            SelectionClassification::CatalogOnly => "available",
            SelectionClassification::MatchedBoth => "installed",
            SelectionClassification::InstalledOnly => "installed, not in catalog",
        }
    }
}

impl fmt::Display for SelectionClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// Snapshot of one catalog's mirror and target listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    pub catalog: BTreeSet<String>,
    pub installed: BTreeSet<String>,
}

impl Reconciliation {
    /// List both directories. A directory that does not exist lists as empty.
    pub fn scan(mirror_dir: &Path, target_dir: &Path) -> Result<Self> {
        Ok(Self {
            catalog: list_components(mirror_dir)?,
            installed: list_components(target_dir)?,
        })
    }

    /// Selectable names: the sorted union of catalog and installed
    pub fn choices(&self) -> Vec<String> {
        self.catalog.union(&self.installed).cloned().collect()
    }

    pub fn classify(&self, name: &str) -> Result<SelectionClassification, SetupError> {
        match (self.catalog.contains(name), self.installed.contains(name)) {
            (true, true) => Ok(SelectionClassification::MatchedBoth),
            (true, false) => Ok(SelectionClassification::CatalogOnly),
            (false, true) => Ok(SelectionClassification::InstalledOnly),
            (false, false) => Err(SetupError::NotSelectable(name.to_string())),
        }
    }
}

/// Names of the visible subdirectories of `dir`
pub fn list_components(dir: &Path) -> Result<BTreeSet<String>> {
    let mut names = BTreeSet::new();
    if !dir.exists() {
        return Ok(names);
    }

    let entries =
        std::fs::read_dir(dir).with_context(|| format!("Failed to list {}", dir.display()))?;
    for entry in entries {
        let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
        let name = entry.file_name().to_string_lossy().to_string();
        if name.starts_with('.') {
            continue;
        }
        // Follows symlinks, so a linked component directory still counts
        if entry.path().is_dir() {
            names.insert(name);
        }
    }
    Ok(names)
}
