//! Lifecycle actions and which ones a selection allows

use crate::core::reconcile::SelectionClassification;
use std::fmt;

/// What the operator can do with a selected component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleAction {
    Install,
    Reinstall,
    Uninstall,
    Rename,
    RunSetupHook,
    Cancel,
}

impl LifecycleAction {
    pub fn label(self) -> &'static str {
        match self {
            LifecycleAction::Install => "Install",
            LifecycleAction::Reinstall => "Reinstall",
            LifecycleAction::Uninstall => "Uninstall",
            LifecycleAction::Rename => "Rename",
            LifecycleAction::RunSetupHook => "Run Setup",
            LifecycleAction::Cancel => "Cancel",
        }
    }
}

impl fmt::Display for LifecycleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Actions offered for a classification, in menu order.
///
/// `hook_installed` says whether the installed copy carries a setup hook;
/// it only matters for components that are also in the catalog.
pub fn valid_actions(
    classification: SelectionClassification,
    hook_installed: bool,
) -> Vec<LifecycleAction> {
    use LifecycleAction::*;
    match classification {
        SelectionClassification::CatalogOnly => vec![Install],
        SelectionClassification::MatchedBoth => {
            let mut actions = Vec::with_capacity(5);
            if hook_installed {
                actions.push(RunSetupHook);
            }
            actions.extend([Reinstall, Uninstall, Rename, Cancel]);
            actions
        }
        SelectionClassification::InstalledOnly => vec![Uninstall, Rename, Cancel],
    }
}
