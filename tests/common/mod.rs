//! Common test utilities for lifecycle integration tests.

#![allow(dead_code)]

mod fixtures;

pub use fixtures::*;
