//! Typed setup errors.
//!
//! Plain filesystem failures travel as `anyhow` errors with path context;
//! the variants here are the failures callers and tests need to tell apart.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reconciling a component.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("component name cannot be empty")]
    EmptyName,

    #[error(
        "invalid component name '{0}': only alphanumeric characters, underscores, and hyphens are allowed"
    )]
    InvalidName(String),

    #[error("'{0}' is already the component's name")]
    SameName(String),

    #[error("cannot rename to '{name}': {} already exists", .path.display())]
    RenameCollision { name: String, path: PathBuf },

    #[error("'{0}' is neither in the catalog nor installed")]
    NotSelectable(String),

    #[error("'{0}' has no catalog source to install from")]
    MissingCatalogSource(String),

    #[error("unsupported catalog remote: {0} (expected https://, http://, ssh://, git@ or file://)")]
    UnsupportedRemote(String),

    #[error("git {op} failed for {remote}\nDetails: {stderr}")]
    Git {
        op: &'static str,
        remote: String,
        stderr: String,
    },

    #[error("failed to start setup hook {}: {source}", .path.display())]
    HookSpawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "{component} was {mutation} on disk but the ledger {} was not updated; re-run to reconcile",
        .ledger.display()
    )]
    LedgerOutOfSync {
        component: String,
        mutation: &'static str,
        ledger: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_out_of_sync_names_component_and_ledger() {
        let err = SetupError::LedgerOutOfSync {
            component: "hero-banner".into(),
            mutation: "removed",
            ledger: PathBuf::from("resources/qntm-blocks.php"),
            source: anyhow::anyhow!("permission denied"),
        };
        let msg = err.to_string();
        assert!(msg.contains("hero-banner was removed"));
        assert!(msg.contains("resources/qntm-blocks.php"));
    }

    #[test]
    fn test_rename_collision_message() {
        let err = SetupError::RenameCollision {
            name: "taken".into(),
            path: PathBuf::from("resources/blocks/taken"),
        };
        assert!(err.to_string().contains("resources/blocks/taken already exists"));
    }
}
