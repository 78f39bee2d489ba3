//! Shared types for the user-map workspace.
//!
//! This crate holds the value types passed between the transport layer and the
//! client core, so neither depends on the other's internals.
//!
//! ## Contract messages
//!
//! The [`msg`] module mirrors the fixed message schema of the user-map
//! contract:
//! - [`QueryMsg`](msg::QueryMsg) - `get_value_by_user`, `get_users`, `get_map`
//! - [`ExecuteMsg`](msg::ExecuteMsg) - `update`

pub mod address;
pub mod denom;
pub mod env_utils;
pub mod msg;
pub mod record;

pub use address::AddressKey;
pub use denom::{display_symbol, format_base_units, Coin, BASE_UNITS_PER_TOKEN, DEFAULT_FEE_DENOM};
pub use msg::{ExecuteMsg, QueryMsg};
pub use record::{ConnectionState, QueryKind, QueryResult, TxReceipt, UserRecord};

use std::time::Duration;

/// Configuration for retry behavior on remote calls.
///
/// `max_attempts` counts every invocation including the first one, so a
/// policy of 3 attempts performs at most two backoff waits.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts (at least 1).
    pub max_attempts: usize,
    /// Delay before the second attempt; doubled for each further attempt.
    pub initial_delay: Duration,
}

impl RetryPolicy {
    /// Create a new RetryPolicy with the specified parameters.
    pub fn new(max_attempts: usize, initial_delay_ms: u64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay: Duration::from_millis(initial_delay_ms),
        }
    }

    /// A policy that runs the operation exactly once.
    pub fn once() -> Self {
        Self::new(1, 0)
    }

    /// Delay to wait after the failed attempt with zero-based index `attempt`.
    ///
    /// Returns `None` after the final attempt.
    pub fn delay_after(&self, attempt: usize) -> Option<Duration> {
        if attempt + 1 >= self.max_attempts {
            return None;
        }
        let factor = 1u32.checked_shl(attempt as u32).unwrap_or(u32::MAX);
        Some(self.initial_delay.saturating_mul(factor))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1000),
        }
    }
}
