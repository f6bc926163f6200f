//! Core of qntm-setup
//!
//! Reconciliation, lifecycle, ledger and setup hook handling, plus the
//! mirror, prompt and config seams they are driven through.

pub mod bootstrap;
pub mod catalog;
pub mod cleanup;
pub mod config;
pub mod error;
pub mod hook;
pub mod ledger;
pub mod lifecycle;
pub mod mirror;
pub mod output;
pub mod prompt;
pub mod reconcile;
