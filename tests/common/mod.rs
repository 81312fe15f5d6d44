//! Common test utilities for batch-dl integration tests

#[allow(dead_code)]
pub mod fixtures;
#[allow(dead_code)]
pub mod remote;

#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use remote::*;
