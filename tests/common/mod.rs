//! Common test utilities for reel-dl integration tests

#[allow(dead_code)]
pub mod config;
#[allow(dead_code)]
pub mod scripts;

#[allow(unused_imports)]
pub use config::*;
#[allow(unused_imports)]
pub use scripts::*;
