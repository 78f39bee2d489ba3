#![allow(dead_code)]
//! Shared test utilities for the client core.
//!
//! - `mocks`: in-memory contract double with call counters and failure injection
//! - `setup`: orchestrator construction helpers

pub mod mocks;
pub mod setup;

pub use mocks::MockChain;
pub use setup::{orchestrator_with, CONTRACT, ME, OTHER};
