//! Component lifecycle
//!
//! One pass per operator selection:
//!
//! 1. Idle: nothing chosen yet
//! 2. Classified: the component is catalog-only, installed-only or both
//! 3. ActionChosen: one of [`valid_actions`] for that classification
//! 4. Executing: filesystem first, then the ledger, then the setup hook
//! 5. [`Flow::Recurse`] into a new pass, or [`Flow::Terminal`]
//!
//! The ledger is only touched after the filesystem mutation succeeded. If the
//! ledger write then fails, the error says so explicitly
//! ([`SetupError::LedgerOutOfSync`]) instead of leaving a silent mismatch.
//! Nothing is rolled back.

mod action;
mod copy;
mod session;
mod validation;

pub use action::{valid_actions, LifecycleAction};
pub use copy::copy_component;
pub use session::{MenuChoice, PassContext, Session, SessionEnd};
pub use validation::{validate_component_name, validate_rename};

use crate::core::catalog::{CatalogDefinition, Project};
use crate::core::cleanup;
use crate::core::error::SetupError;
use crate::core::hook::SetupHookRunner;
use crate::core::ledger::Ledger;
use crate::core::output;
use crate::core::prompt::Prompter;
use crate::core::reconcile::SelectionClassification;
use anyhow::{Context, Result};
use std::path::PathBuf;

/// What happens after a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Start another top-level operation
    Recurse,
    /// End the session
    Terminal,
}

/// Executes lifecycle actions for one catalog.
pub struct LifecycleController<'a> {
    project: &'a Project,
    catalog: &'a CatalogDefinition,
    hooks: SetupHookRunner,
}

impl<'a> LifecycleController<'a> {
    pub fn new(project: &'a Project, catalog: &'a CatalogDefinition) -> Self {
        Self {
            project,
            catalog,
            hooks: SetupHookRunner::new(&project.layout),
        }
    }

    fn ledger(&self) -> Ledger {
        self.project.ledger(self.catalog)
    }

    /// Actions the operator may pick for `name`
    pub fn actions_for(&self, name: &str, classification: SelectionClassification) -> Vec<LifecycleAction> {
        let hook_installed = classification.is_installed()
            && self
                .hooks
                .has_hook(&self.project.component_dir(self.catalog, name));
        valid_actions(classification, hook_installed)
    }

    /// Run `action` against `name`.
    ///
    /// Actions outside [`Self::actions_for`] are refused before anything changes.
    pub fn execute(
        &self,
        prompter: &mut dyn Prompter,
        name: &str,
        classification: SelectionClassification,
        action: LifecycleAction,
    ) -> Result<Flow> {
        if !self.actions_for(name, classification).contains(&action) {
            if matches!(action, LifecycleAction::Install | LifecycleAction::Reinstall)
                && classification == SelectionClassification::InstalledOnly
            {
                return Err(SetupError::MissingCatalogSource(name.to_string()).into());
            }
            anyhow::bail!("{} is not available for {} ({})", action, name, classification);
        }

        match action {
            LifecycleAction::Install => self.install(prompter, name),
            LifecycleAction::Reinstall => self.reinstall(prompter, name),
            LifecycleAction::Uninstall => self.uninstall(prompter, name),
            LifecycleAction::Rename => self.rename(prompter, name),
            LifecycleAction::RunSetupHook => self.run_setup(prompter, name),
            LifecycleAction::Cancel => {
                output::info("Operation cancelled.");
                Ok(Flow::Terminal)
            }
        }
    }

    fn install(&self, prompter: &mut dyn Prompter, name: &str) -> Result<Flow> {
        output::action(&format!("Installing {}", name));
        self.copy_phase(prompter, name)?;
        output::success(&format!("{} installed", name));
        Ok(Flow::Recurse)
    }

    fn reinstall(&self, prompter: &mut dyn Prompter, name: &str) -> Result<Flow> {
        output::action(&format!("Reinstalling {}", name));
        // The installed copy is only thrown away once there is one to replace it
        self.require_source(name)?;
        let dest = self.project.component_dir(self.catalog, name);
        std::fs::remove_dir_all(&dest)
            .with_context(|| format!("Failed to remove {}", dest.display()))?;
        output::detail(&format!("removed existing directory {}", dest.display()));
        self.copy_phase(prompter, name)?;
        output::success(&format!("{} reinstalled", name));
        Ok(Flow::Recurse)
    }

    /// Copy from the mirror, ledger the entry point, run the setup hook.
    fn copy_phase(&self, prompter: &mut dyn Prompter, name: &str) -> Result<()> {
        let src = self.require_source(name)?;
        let dest = self.project.component_dir(self.catalog, name);

        output::sub_action("copy");
        let files = copy_component(&src, &dest)?;
        output::detail(&format!("{} files -> {}", files, dest.display()));

        output::sub_action("ledger");
        let component_path = self.catalog.component_path(name);
        let has_entry_point = dest.join(&self.project.layout.entry_point).is_file();
        self.ledger_step(name, "installed", |ledger| {
            ledger.ensure_exists()?;
            if !has_entry_point {
                output::warning(&format!(
                    "{} has no {}, not adding it to {}",
                    name, self.project.layout.entry_point, self.catalog.ledger
                ));
                if ledger.remove_directive(&component_path)? > 0 {
                    output::detail(&format!(
                        "removed stale {} from {}",
                        component_path, self.catalog.ledger
                    ));
                }
            } else if ledger.add_directive(&component_path)? {
                output::detail(&format!("added {}", ledger.directive(&component_path)));
            } else {
                output::skip(&format!("{} already in {}, skipping", component_path, self.catalog.ledger));
            }
            Ok(())
        })?;

        let signal = self.hooks.run(&dest)?;
        cleanup::maybe_clean_mirror(prompter, &self.project.mirror_dir(self.catalog), signal)?;
        Ok(())
    }

    fn require_source(&self, name: &str) -> Result<PathBuf> {
        let src = self.project.source_dir(self.catalog, name);
        if !src.is_dir() {
            return Err(SetupError::MissingCatalogSource(name.to_string()).into());
        }
        Ok(src)
    }

    fn uninstall(&self, prompter: &mut dyn Prompter, name: &str) -> Result<Flow> {
        let dest = self.project.component_dir(self.catalog, name);
        let confirmed = prompter.confirm(&format!(
            "Uninstall {}? This deletes {}",
            name,
            dest.display()
        ))?;
        if !confirmed {
            output::info("Uninstall cancelled.");
            return Ok(Flow::Terminal);
        }

        output::action(&format!("Uninstalling {}", name));
        std::fs::remove_dir_all(&dest)
            .with_context(|| format!("Failed to remove {}", dest.display()))?;

        let component_path = self.catalog.component_path(name);
        let removed = self.ledger_step(name, "removed", |ledger| {
            ledger.remove_directive(&component_path)
        })?;
        if removed > 0 {
            output::detail(&format!("removed {} from {}", component_path, self.catalog.ledger));
        }
        output::success(&format!("{} uninstalled", name));
        Ok(Flow::Recurse)
    }

    fn rename(&self, prompter: &mut dyn Prompter, name: &str) -> Result<Flow> {
        let raw = prompter.input(&format!("New name for {}:", name))?;
        let target_dir = self.project.target_dir(self.catalog);
        let new_name = validate_rename(name, &raw, &target_dir)?;

        output::action(&format!("Renaming {} to {}", name, new_name));
        let from = target_dir.join(name);
        let to = target_dir.join(&new_name);
        std::fs::rename(&from, &to).with_context(|| {
            format!("Failed to move {} to {}", from.display(), to.display())
        })?;

        let old_path = self.catalog.component_path(name);
        let new_path = self.catalog.component_path(&new_name);
        self.ledger_step(name, "renamed", |ledger| {
            ledger.rename_directive(&old_path, &new_path)
        })?;
        output::success(&format!("{} renamed to {}", name, new_name));
        Ok(Flow::Recurse)
    }

    fn run_setup(&self, prompter: &mut dyn Prompter, name: &str) -> Result<Flow> {
        output::action(&format!("Running setup for {}", name));
        let dir = self.project.component_dir(self.catalog, name);
        let signal = self.hooks.run(&dir)?;
        cleanup::maybe_clean_mirror(prompter, &self.project.mirror_dir(self.catalog), signal)?;
        Ok(Flow::Recurse)
    }

    /// Run a ledger update that follows a completed filesystem mutation
    fn ledger_step<T>(
        &self,
        name: &str,
        mutation: &'static str,
        step: impl FnOnce(&Ledger) -> Result<T>,
    ) -> Result<T> {
        let ledger = self.ledger();
        step(&ledger).map_err(|source| {
            SetupError::LedgerOutOfSync {
                component: name.to_string(),
                mutation,
                ledger: ledger.path().to_path_buf(),
                source,
            }
            .into()
        })
    }
}
