//! Catalog descriptors and the project they live in
//!
//! Both catalogs are built once at startup and handed around by reference.
//! Business logic never looks a catalog up by its menu label; the menu maps
//! a selection to a [`CatalogKind`] and everything downstream uses that.

use crate::core::ledger::Ledger;
use std::fmt;
use std::path::{Path, PathBuf};

/// The two kinds of installable components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum CatalogKind {
    Block,
    Module,
}

impl CatalogKind {
    /// Menu order.
    pub const ALL: [CatalogKind; 2] = [CatalogKind::Block, CatalogKind::Module];

    pub fn label(self) -> &'static str {
        match self {
            CatalogKind::Block => "Block",
            CatalogKind::Module => "Module",
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where one catalog comes from and where its components end up.
///
/// All paths are relative to the project root and use `/` separators, since
/// they are written verbatim into the ledger and host files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogDefinition {
    pub kind: CatalogKind,
    pub remote: String,
    pub mirror: String,
    pub target: String,
    pub ledger: String,
}

impl CatalogDefinition {
    /// Built-in definition for a catalog kind
    pub fn defaults(kind: CatalogKind) -> Self {
        match kind {
            CatalogKind::Module => Self {
                kind,
                remote: "git@github.com:nukage/wp-modules.git".into(),
                mirror: "resources/repo/modules".into(),
                target: "resources/modules".into(),
                ledger: "resources/qntm-modules.php".into(),
            },
            CatalogKind::Block => Self {
                kind,
                remote: "git@github.com:nukage/wp-blocks.git".into(),
                mirror: "resources/repo/blocks".into(),
                target: "resources/blocks".into(),
                ledger: "resources/qntm-blocks.php".into(),
            },
        }
    }

    /// Project-relative path of an installed component, as written in the ledger.
    /// Example: `resources/blocks/hero-banner`
    pub fn component_path(&self, name: &str) -> String {
        format!("{}/{}", self.target.trim_end_matches('/'), name)
    }
}

/// File names and interpreter that make up a component's contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentLayout {
    /// File the ledger directive points at
    pub entry_point: String,
    /// Optional setup script run after install
    pub setup_hook: String,
    /// Program used to run the setup script
    pub interpreter: String,
    /// Token a setup script prints to request mirror cleanup
    pub cleanup_marker: String,
}

impl Default for ComponentLayout {
    fn default() -> Self {
        Self {
            entry_point: "index.php".into(),
            setup_hook: "init.js".into(),
            interpreter: "node".into(),
            cleanup_marker: "cleanup".into(),
        }
    }
}

/// The host project being managed.
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    /// Top-level include file of the host theme
    pub host_file: String,
    pub ignore_file: String,
    /// Directory holding every catalog mirror
    pub mirror_root: String,
    pub blocks: CatalogDefinition,
    pub modules: CatalogDefinition,
    pub layout: ComponentLayout,
}

impl Project {
    /// Project with built-in defaults rooted at `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            host_file: "functions.php".into(),
            ignore_file: ".gitignore".into(),
            mirror_root: "resources/repo".into(),
            blocks: CatalogDefinition::defaults(CatalogKind::Block),
            modules: CatalogDefinition::defaults(CatalogKind::Module),
            layout: ComponentLayout::default(),
        }
    }

    pub fn catalog(&self, kind: CatalogKind) -> &CatalogDefinition {
        match kind {
            CatalogKind::Block => &self.blocks,
            CatalogKind::Module => &self.modules,
        }
    }

    /// Resolve a project-relative path against the root
    pub fn resolve(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    pub fn mirror_dir(&self, catalog: &CatalogDefinition) -> PathBuf {
        self.resolve(&catalog.mirror)
    }

    pub fn target_dir(&self, catalog: &CatalogDefinition) -> PathBuf {
        self.resolve(&catalog.target)
    }

    /// Catalog copy of a component
    pub fn source_dir(&self, catalog: &CatalogDefinition, name: &str) -> PathBuf {
        self.mirror_dir(catalog).join(name)
    }

    /// Installed copy of a component
    pub fn component_dir(&self, catalog: &CatalogDefinition, name: &str) -> PathBuf {
        self.target_dir(catalog).join(name)
    }

    /// Ledger synchronizer for a catalog
    pub fn ledger(&self, catalog: &CatalogDefinition) -> Ledger {
        Ledger::new(
            self.resolve(&catalog.ledger),
            catalog.ledger.clone(),
            self.resolve(&self.host_file),
            self.layout.entry_point.clone(),
        )
    }
}
