//! Test fixtures - a throwaway theme with local catalog mirrors.

#![allow(dead_code)]

use qntm_setup::{CatalogDefinition, CatalogKind, CatalogMirror, Project};
use std::cell::RefCell;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Setup hook that asks for the mirror to be deleted.
pub const CLEANUP_HOOK: &str = "echo 'configuring component'\necho cleanup\n";

/// Setup hook that asks for nothing.
pub const QUIET_HOOK: &str = "echo 'configuring component'\n";

/// A theme directory with `functions.php`, set up to run hooks with `sh`.
pub struct TestTheme {
    pub dir: TempDir,
    pub project: Project,
}

impl TestTheme {
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("functions.php"), "<?php\n// theme bootstrap\n").unwrap();
        let mut project = Project::new(dir.path());
        project.layout.setup_hook = "init.sh".into();
        project.layout.interpreter = "sh".into();
        Self { dir, project }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn path(&self, relative: &str) -> PathBuf {
        self.dir.path().join(relative)
    }

    /// Put a component with an entry point into the kind's mirror
    pub fn catalog_component(&self, kind: CatalogKind, name: &str) -> PathBuf {
        let catalog = self.project.catalog(kind);
        let src = self.project.source_dir(catalog, name);
        std::fs::create_dir_all(src.join("assets")).unwrap();
        std::fs::write(src.join("index.php"), format!("<?php // {} from catalog\n", name)).unwrap();
        std::fs::write(src.join("assets/style.css"), format!(".{} {{}}\n", name)).unwrap();
        src
    }

    /// Put an already installed component into the target path
    pub fn installed_component(&self, kind: CatalogKind, name: &str) -> PathBuf {
        let catalog = self.project.catalog(kind);
        let dest = self.project.component_dir(catalog, name);
        std::fs::create_dir_all(&dest).unwrap();
        std::fs::write(dest.join("index.php"), format!("<?php // {} installed\n", name)).unwrap();
        dest
    }

    /// Ledger the component as if an earlier install had done it
    pub fn ledger_component(&self, kind: CatalogKind, name: &str) {
        let catalog = self.project.catalog(kind);
        let ledger = self.project.ledger(catalog);
        ledger.ensure_exists().unwrap();
        ledger.add_directive(&catalog.component_path(name)).unwrap();
    }

    pub fn ledger_text(&self, kind: CatalogKind) -> String {
        let catalog = self.project.catalog(kind);
        std::fs::read_to_string(self.project.resolve(&catalog.ledger)).unwrap_or_default()
    }

    pub fn directives(&self, kind: CatalogKind) -> Vec<String> {
        let catalog = self.project.catalog(kind);
        self.project.ledger(catalog).directives().unwrap()
    }
}

/// Mirror that is already on disk; records the passes it was asked to sync.
#[derive(Default)]
pub struct LocalMirror {
    pub syncs: RefCell<Vec<(CatalogKind, bool)>>,
}

impl CatalogMirror for LocalMirror {
    fn sync(&self, _project: &Project, catalog: &CatalogDefinition, first_pass: bool) -> anyhow::Result<()> {
        self.syncs.borrow_mut().push((catalog.kind, first_pass));
        Ok(())
    }
}
