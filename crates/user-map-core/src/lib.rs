//! Client core for the user-map contract.
//!
//! Turns a user-authored JSON edit into a confirmed on-chain update and keeps
//! the displayed state in line with the contract.
//!
//! - [`json_guard`]: quote normalization, validation and formatting of editor text
//! - [`retry`]: bounded exponential-backoff wrapper for async operations
//! - [`gateway`]: `get_value_by_user`, `get_users`, `get_map`, `get_balance`, `execute_update`
//! - [`orchestrator`]: the submit cycle, login/logout and queries
//! - [`view_state`]: single-flight activity, result panels and notices
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use user_map_core::{OrchestratorConfig, RemoteGateway, TransactionOrchestrator};
//! use user_map_transport::{LcdClient, SignerClient};
//!
//! let gateway = RemoteGateway::new(contract)
//!     .with_query_client(Arc::new(LcdClient::new(lcd_url)))
//!     .with_signing_client(Arc::new(SignerClient::new(signer_url, None)));
//! let client = TransactionOrchestrator::new(gateway, OrchestratorConfig::default());
//!
//! client.connect("xion1...".into()).await?;
//! client.set_pending_edit("{\u{201C}a\u{201D}: \u{201C}b\u{201D}}");
//! let outcome = client.submit().await?;
//! println!("{}", outcome.receipt.transaction_hash);
//! ```

pub mod error;
pub mod gateway;
pub mod json_guard;
pub mod orchestrator;
pub mod retry;
pub mod view_state;

pub use error::{FailureKind, KvError};
pub use gateway::RemoteGateway;
pub use json_guard::{format, normalize, validate, Validation};
pub use orchestrator::{
    InitialLoad, LoadSource, OrchestratorConfig, RefreshStatus, SubmitOutcome,
    TransactionOrchestrator, EMPTY_RECORD, MIN_SUBMIT_BALANCE,
};
pub use retry::with_retry;
pub use view_state::{Activity, Notice, ResultPanel, SubmitPhase, ViewSnapshot, ViewStateController};
