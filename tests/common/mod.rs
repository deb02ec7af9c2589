//! Common test utilities for oe-find-sds end-to-end tests

#[allow(dead_code)]
pub mod fixtures;
#[allow(dead_code)]
pub mod harness;

#[allow(unused_imports)]
pub use fixtures::*;
pub use harness::*;
