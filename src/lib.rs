//! user-map: command-line client for the user-map contract.
//!
//! Each account on the contract owns one JSON value. This crate wires the
//! client core to real endpoints and keeps a small session on disk:
//!
//! - [`config`]: environment and flag resolution
//! - [`logging`]: tracing subscriber setup
//! - [`session`]: the persisted CLI session

pub mod config;
pub mod logging;
pub mod session;

pub use config::{AppConfig, ConfigOverrides};
pub use session::CliSession;
