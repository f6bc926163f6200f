//! The interactive session loop
//!
//! Each pass asks what to do, reconciles the chosen catalog and runs one
//! lifecycle action. A pass that ends in [`Flow::Recurse`] starts the next
//! one; only the first pass refreshes mirrors and bootstraps the ignore list.

use super::{Flow, LifecycleAction, LifecycleController};
use crate::core::bootstrap;
use crate::core::catalog::{CatalogKind, Project};
use crate::core::cleanup;
use crate::core::mirror::CatalogMirror;
use crate::core::output;
use crate::core::prompt::Prompter;
use crate::core::reconcile::{Reconciliation, SelectionClassification};
use anyhow::{Context, Result};

/// Per-pass context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassContext {
    /// One-time steps (mirror update, ignore-list bootstrap) run only here
    pub first_pass: bool,
}

impl PassContext {
    pub fn first() -> Self {
        Self { first_pass: true }
    }

    pub fn next(self) -> Self {
        Self { first_pass: false }
    }
}

/// Top-level menu entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Catalog(CatalogKind),
    CleanUp,
    Cancel,
}

impl MenuChoice {
    /// Menu order: every catalog, then Clean Up, then Cancel
    pub fn all() -> Vec<MenuChoice> {
        CatalogKind::ALL
            .into_iter()
            .map(MenuChoice::Catalog)
            .chain([MenuChoice::CleanUp, MenuChoice::Cancel])
            .collect()
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuChoice::Catalog(kind) => kind.label(),
            MenuChoice::CleanUp => "Clean Up",
            MenuChoice::Cancel => "Cancel",
        }
    }
}

/// How a session ended.
#[derive(Debug)]
pub enum SessionEnd {
    /// A pass ended in [`Flow::Terminal`]
    Finished { passes: usize },
    /// A pass failed; the error has already been reported
    Aborted { passes: usize, error: anyhow::Error },
}

impl SessionEnd {
    /// Passes that ran an action and moved on to another pass
    pub fn completed_actions(&self) -> usize {
        match self {
            SessionEnd::Finished { passes } | SessionEnd::Aborted { passes, .. } => {
                passes.saturating_sub(1)
            }
        }
    }
}

/// Drives passes until one is terminal or fails.
pub struct Session<'a> {
    project: &'a Project,
    mirror: &'a dyn CatalogMirror,
    prompter: &'a mut dyn Prompter,
}

impl<'a> Session<'a> {
    pub fn new(
        project: &'a Project,
        mirror: &'a dyn CatalogMirror,
        prompter: &'a mut dyn Prompter,
    ) -> Self {
        Self {
            project,
            mirror,
            prompter,
        }
    }

    /// Run passes until one ends the session.
    ///
    /// Errors abort the session and are reported here; they are returned in
    /// [`SessionEnd::Aborted`] for callers that want to inspect them.
    pub fn run(&mut self) -> SessionEnd {
        output::info("Welcome to the QNTM setup script! Let's get started.");
        output::info("Select Block or Module to install or uninstall site components.");
        output::info("Select Clean Up to delete the repository cache.");

        let mut ctx = PassContext::first();
        let mut passes = 0;
        loop {
            passes += 1;
            match self.run_pass(ctx) {
                Ok(Flow::Recurse) => ctx = ctx.next(),
                Ok(Flow::Terminal) => return SessionEnd::Finished { passes },
                Err(error) => {
                    output::error(&format!("{:#}", error));
                    return SessionEnd::Aborted { passes, error };
                }
            }
        }
    }

    /// One top-level operation
    pub fn run_pass(&mut self, ctx: PassContext) -> Result<Flow> {
        let menu = MenuChoice::all();
        let labels: Vec<String> = menu.iter().map(|c| c.label().to_string()).collect();
        let idx = self.prompter.select("What do you want to do?", &labels)?;

        match *chosen(&menu, idx)? {
            MenuChoice::Cancel => {
                output::info("Exiting...");
                Ok(Flow::Terminal)
            }
            MenuChoice::CleanUp => {
                cleanup::clean_all(&self.project.resolve(&self.project.mirror_root))?;
                Ok(Flow::Terminal)
            }
            MenuChoice::Catalog(kind) => self.reconcile(kind, ctx),
        }
    }

    fn reconcile(&mut self, kind: CatalogKind, ctx: PassContext) -> Result<Flow> {
        let project = self.project;
        let catalog = project.catalog(kind);

        self.mirror.sync(project, catalog, ctx.first_pass)?;
        if ctx.first_pass {
            bootstrap::ensure_ignore_list(project)?;
        }

        let rec = Reconciliation::scan(&project.mirror_dir(catalog), &project.target_dir(catalog))?;
        let names = rec.choices();
        if names.is_empty() {
            output::warning(&format!("No {} components found", kind));
            return Ok(Flow::Terminal);
        }

        let idx = self
            .prompter
            .select(&format!("Select a {}:", kind.label().to_lowercase()), &names)?;
        let name = chosen(&names, idx)?;
        let classification = rec.classify(name)?;

        let controller = LifecycleController::new(project, catalog);
        let actions = controller.actions_for(name, classification);
        let action = match actions.as_slice() {
            [only] => *only,
            _ => self.choose_action(name, classification, &actions)?,
        };

        controller.execute(&mut *self.prompter, name, classification, action)
    }

    fn choose_action(
        &mut self,
        name: &str,
        classification: SelectionClassification,
        actions: &[LifecycleAction],
    ) -> Result<LifecycleAction> {
        let message = match classification {
            SelectionClassification::InstalledOnly => format!(
                "{} is installed but not in the catalog. What would you like to do?",
                name
            ),
            _ => "The directory already exists. What would you like to do?".to_string(),
        };
        let labels: Vec<String> = actions.iter().map(|a| a.label().to_string()).collect();
        let idx = self.prompter.select(&message, &labels)?;
        chosen(actions, idx).copied()
    }
}

/// Look up a prompter's answer, refusing indices outside the offered choices
fn chosen<T>(choices: &[T], idx: usize) -> Result<&T> {
    choices.get(idx).with_context(|| {
        format!("Selection {} is out of range ({} choices offered)", idx, choices.len())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::CatalogDefinition;
    use crate::core::prompt::{Answer, ScriptedPrompter};
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Records every sync call instead of running git
    #[derive(Default)]
    struct RecordingMirror {
        calls: RefCell<Vec<(CatalogKind, bool)>>,
    }

    impl CatalogMirror for RecordingMirror {
        fn sync(&self, _: &Project, catalog: &CatalogDefinition, first_pass: bool) -> Result<()> {
            self.calls.borrow_mut().push((catalog.kind, first_pass));
            Ok(())
        }
    }

    /// Answers every select with the next raw index, whatever was offered
    struct RawIndices(Vec<usize>);

    impl Prompter for RawIndices {
        fn select(&mut self, _: &str, _: &[String]) -> Result<usize> {
            Ok(self.0.remove(0))
        }

        fn confirm(&mut self, _: &str) -> Result<bool> {
            Ok(false)
        }

        fn input(&mut self, _: &str) -> Result<String> {
            Ok(String::new())
        }
    }

    fn pick(label: &str) -> Answer {
        Answer::Pick(label.into())
    }

    #[test]
    fn test_menu_order() {
        let labels: Vec<_> = MenuChoice::all().into_iter().map(MenuChoice::label).collect();
        assert_eq!(labels, ["Block", "Module", "Clean Up", "Cancel"]);
    }

    #[test]
    fn test_cancel_ends_after_one_pass() {
        let dir = TempDir::new().unwrap();
        let project = Project::new(dir.path());
        let mirror = RecordingMirror::default();
        let mut p = ScriptedPrompter::new([pick("Cancel")]);

        let end = Session::new(&project, &mirror, &mut p).run();
        assert!(matches!(end, SessionEnd::Finished { passes: 1 }));
        assert!(mirror.calls.borrow().is_empty());
    }

    #[test]
    fn test_one_time_steps_only_on_first_pass() {
        let dir = TempDir::new().unwrap();
        let project = Project::new(dir.path());
        for name in ["a", "b"] {
            let src = dir.path().join("resources/repo/modules").join(name);
            std::fs::create_dir_all(&src).unwrap();
            std::fs::write(src.join("index.php"), "<?php").unwrap();
        }
        let mirror = RecordingMirror::default();
        let mut p = ScriptedPrompter::new([
            pick("Module"),
            pick("a"),
            pick("Module"),
            pick("b"),
            pick("Cancel"),
        ]);

        let end = Session::new(&project, &mirror, &mut p).run();

        assert!(matches!(end, SessionEnd::Finished { passes: 3 }));
        assert_eq!(
            *mirror.calls.borrow(),
            [(CatalogKind::Module, true), (CatalogKind::Module, false)]
        );
        assert!(dir.path().join(".gitignore").exists());
        assert!(dir.path().join("resources/modules/a").is_dir());
        assert!(dir.path().join("resources/modules/b").is_dir());
    }

    #[test]
    fn test_error_aborts_without_recursing() {
        let dir = TempDir::new().unwrap();
        let project = Project::new(dir.path());
        std::fs::create_dir_all(dir.path().join("resources/blocks/old")).unwrap();
        std::fs::create_dir_all(dir.path().join("resources/repo/blocks")).unwrap();
        let mirror = RecordingMirror::default();
        let mut p = ScriptedPrompter::new([
            pick("Block"),
            pick("old"),
            pick("Rename"),
            Answer::Text("".into()),
            pick("Cancel"),
        ]);

        let end = Session::new(&project, &mirror, &mut p).run();

        assert!(matches!(end, SessionEnd::Aborted { passes: 1, .. }));
        // The trailing Cancel was never asked for
        assert_eq!(p.remaining(), 1);
    }

    #[test]
    fn test_out_of_range_menu_selection_aborts() {
        let dir = TempDir::new().unwrap();
        let project = Project::new(dir.path());
        let mirror = RecordingMirror::default();
        let mut p = RawIndices(vec![42]);

        let end = Session::new(&project, &mirror, &mut p).run();
        match end {
            SessionEnd::Aborted { passes: 1, error } => {
                assert!(format!("{:#}", error).contains("out of range"))
            }
            other => panic!("expected an aborted session, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_component_selection_aborts() {
        let dir = TempDir::new().unwrap();
        let project = Project::new(dir.path());
        std::fs::create_dir_all(dir.path().join("resources/repo/blocks/cta")).unwrap();
        let mirror = RecordingMirror::default();
        let mut p = RawIndices(vec![0, 5]);

        let end = Session::new(&project, &mirror, &mut p).run();
        assert!(matches!(end, SessionEnd::Aborted { passes: 1, .. }));
        assert!(!dir.path().join("resources/blocks/cta").exists());
    }

    #[test]
    fn test_completed_actions() {
        assert_eq!(SessionEnd::Finished { passes: 1 }.completed_actions(), 0);
        assert_eq!(SessionEnd::Finished { passes: 3 }.completed_actions(), 2);
        let aborted = SessionEnd::Aborted {
            passes: 2,
            error: anyhow::anyhow!("boom"),
        };
        assert_eq!(aborted.completed_actions(), 1);
    }

    #[test]
    fn test_empty_catalog_ends_session() {
        let dir = TempDir::new().unwrap();
        let project = Project::new(dir.path());
        let mirror = RecordingMirror::default();
        let mut p = ScriptedPrompter::new([pick("Block")]);

        let end = Session::new(&project, &mirror, &mut p).run();
        assert!(matches!(end, SessionEnd::Finished { passes: 1 }));
    }

    #[test]
    fn test_clean_up_removes_mirror_root() {
        let dir = TempDir::new().unwrap();
        let project = Project::new(dir.path());
        std::fs::create_dir_all(dir.path().join("resources/repo/blocks/x")).unwrap();
        let mirror = RecordingMirror::default();
        let mut p = ScriptedPrompter::new([pick("Clean Up")]);

        let end = Session::new(&project, &mirror, &mut p).run();
        assert!(matches!(end, SessionEnd::Finished { passes: 1 }));
        assert!(!dir.path().join("resources/repo").exists());
        assert!(dir.path().join("resources").exists());
    }
}
