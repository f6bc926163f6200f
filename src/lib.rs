//! Component installer for QNTM WordPress themes
//!
//! A theme pulls site components from two git catalogs, blocks and modules.
//! This crate mirrors a catalog locally, lets the operator pick a component
//! and reconciles the theme against the catalog: install, reinstall,
//! uninstall, rename, or re-run a component's setup hook.
//!
//! Each catalog has a generated ledger file that the theme includes. It holds
//! exactly one directive per installed component:
//!
//! ```php
//! <?php // This is the resources/qntm-blocks.php file
//! include_once 'resources/blocks/hero-banner/index.php';
//! ```
//!
//! # Layout
//!
//! - [`reconcile`] - compare mirror and install target, classify a selection
//! - [`lifecycle`] - the action state machine and the session loop
//! - [`ledger`] - keep the ledger in step with the install target
//! - [`hook`] - run a component's setup script and read its cleanup signal
//! - [`cleanup`] - delete mirrors on request
//! - [`mirror`], [`prompt`], [`config`] - git, operator and config seams
//!
//! # Example
//!
//! ```no_run
//! use qntm_setup::{config, GitMirror, Session, TermPrompter};
//!
//! let project = config::load_project(std::path::Path::new("."), None)?;
//! let mut prompter = TermPrompter::new();
//! Session::new(&project, &GitMirror, &mut prompter).run();
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod core;

pub use crate::core::{
    bootstrap, catalog, cleanup, config, error, hook, ledger, lifecycle, mirror, output, prompt,
    reconcile,
};

pub use crate::core::catalog::{CatalogDefinition, CatalogKind, ComponentLayout, Project};
pub use crate::core::error::SetupError;
pub use crate::core::hook::{MarkerScanner, SetupHookRunner};
pub use crate::core::ledger::Ledger;
pub use crate::core::lifecycle::{
    Flow, LifecycleAction, LifecycleController, MenuChoice, PassContext, Session, SessionEnd,
};
pub use crate::core::mirror::{CatalogMirror, GitMirror, OfflineMirror};
pub use crate::core::prompt::{Answer, Prompter, ScriptedPrompter, TermPrompter};
pub use crate::core::reconcile::{Reconciliation, SelectionClassification};
