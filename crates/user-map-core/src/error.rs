//! Error taxonomy of the client core.
//!
//! | Class | Variant | Recovery |
//! |-------|---------|----------|
//! | Validation | `Validation` | local, never reaches the network |
//! | Preflight | `InsufficientFunds` | local, before any mutating call |
//! | Transient remote | `Remote`, `UnexpectedResponse` | retried where the gateway retries |
//! | Configuration | `Configuration` | fatal at startup |
//! | Gateway precondition | `GatewayPrecondition` | immediate, never retried |
//! | Session | `Busy`, `NotConnected` | caller waits or logs in |
//! | Submission | `TransactionFailed` | categorized by [`FailureKind`] |

use serde::Serialize;
use thiserror::Error;
use user_map_types::{display_symbol, format_base_units};

/// Category of a failed transaction submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InsufficientFunds,
    Generic,
}

impl FailureKind {
    /// Classify from the error text reported by the signer or node.
    pub fn classify(detail: &str) -> Self {
        let lower = detail.to_ascii_lowercase();
        if lower.contains("insufficient") || lower.contains("fee") {
            FailureKind::InsufficientFunds
        } else {
            FailureKind::Generic
        }
    }

    pub fn headline(&self) -> &'static str {
        match self {
            FailureKind::InsufficientFunds => {
                "Insufficient funds to pay the transaction fee"
            }
            FailureKind::Generic => "Transaction failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KvError {
    #[error("{reason}")]
    Validation { reason: String },

    #[error(
        "Insufficient funds: at least {} {} is required, current balance is {} {}",
        format_base_units(*required),
        display_symbol(denom),
        format_base_units(*balance),
        display_symbol(denom)
    )]
    InsufficientFunds {
        balance: u128,
        required: u128,
        denom: String,
    },

    #[error("{operation} failed: {detail}")]
    Remote {
        operation: &'static str,
        detail: String,
    },

    #[error("unexpected {operation} response: {detail}")]
    UnexpectedResponse {
        operation: &'static str,
        detail: String,
    },

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("{operation} requires a {handle}, but none is available")]
    GatewayPrecondition {
        operation: &'static str,
        handle: &'static str,
    },

    #[error("another operation is already in progress")]
    Busy,

    #[error("no wallet account is connected")]
    NotConnected,

    #[error("{}: {detail}", kind.headline())]
    TransactionFailed { kind: FailureKind, detail: String },
}

impl KvError {
    pub fn remote(operation: &'static str, err: &anyhow::Error) -> Self {
        KvError::Remote {
            operation,
            detail: format!("{:#}", err),
        }
    }

    /// Errors a retry may cure.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            KvError::Remote { .. } | KvError::UnexpectedResponse { .. }
        )
    }

    /// Short machine-readable tag, used in JSON output.
    pub fn code(&self) -> &'static str {
        match self {
            KvError::Validation { .. } => "validation",
            KvError::InsufficientFunds { .. } => "insufficient_funds",
            KvError::Remote { .. } => "remote",
            KvError::UnexpectedResponse { .. } => "unexpected_response",
            KvError::Configuration(_) => "configuration",
            KvError::GatewayPrecondition { .. } => "gateway_precondition",
            KvError::Busy => "busy",
            KvError::NotConnected => "not_connected",
            KvError::TransactionFailed { kind, .. } => match kind {
                FailureKind::InsufficientFunds => "tx_insufficient_funds",
                FailureKind::Generic => "tx_failed",
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(
            FailureKind::classify("code 13: insufficient fees; got 0uxion"),
            FailureKind::InsufficientFunds
        );
        assert_eq!(
            FailureKind::classify("Insufficient Funds"),
            FailureKind::InsufficientFunds
        );
        assert_eq!(
            FailureKind::classify("account sequence mismatch"),
            FailureKind::Generic
        );
    }

    #[test]
    fn test_insufficient_funds_message_uses_token_units() {
        let err = KvError::InsufficientFunds {
            balance: 183,
            required: 184,
            denom: "uxion".into(),
        };
        assert_eq!(
            err.to_string(),
            "Insufficient funds: at least 0.000184 XION is required, current balance is 0.000183 XION"
        );
    }

    #[test]
    fn test_transaction_failed_embeds_detail() {
        let err = KvError::TransactionFailed {
            kind: FailureKind::Generic,
            detail: "out of gas".into(),
        };
        assert_eq!(err.to_string(), "Transaction failed: out of gas");
        assert_eq!(err.code(), "tx_failed");
    }

    #[test]
    fn test_transient() {
        let err = KvError::remote("get_users", &anyhow::anyhow!("connection reset"));
        assert!(err.is_transient());
        assert!(err.to_string().contains("connection reset"));
        assert!(!KvError::Busy.is_transient());
        assert!(!KvError::GatewayPrecondition {
            operation: "get_users",
            handle: "query client"
        }
        .is_transient());
    }
}
