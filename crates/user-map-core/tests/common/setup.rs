//! Orchestrator construction helpers.

use std::sync::Arc;

use user_map_core::{OrchestratorConfig, RemoteGateway, TransactionOrchestrator};
use user_map_types::RetryPolicy;

use super::MockChain;

pub const CONTRACT: &str = "xion1usermapcontract";
pub const ME: &str = "xion1me0000000000000000000000000000000000";
pub const OTHER: &str = "xion1other000000000000000000000000000000";

/// Orchestrator wired to `chain` for both queries and signing.
pub fn orchestrator_with(chain: &Arc<MockChain>) -> TransactionOrchestrator {
    let gateway = RemoteGateway::new(CONTRACT)
        .with_query_client(chain.clone())
        .with_signing_client(chain.clone())
        .with_retry_policy(RetryPolicy::default());
    TransactionOrchestrator::new(gateway, OrchestratorConfig::default())
}
