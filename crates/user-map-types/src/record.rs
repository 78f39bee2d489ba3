//! Records, receipts and query results held by the client.

use serde::{Deserialize, Serialize};

use crate::AddressKey;

/// One entry of the contract's user map. `value` is a JSON document kept in
/// its string-serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub address: AddressKey,
    pub value: String,
}

/// Confirmation of a broadcast transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxReceipt {
    pub transaction_hash: String,
    pub height: u64,
}

/// Which family of query a result belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryKind {
    ValueByUser,
    Users,
    Map,
}

impl QueryKind {
    pub fn name(&self) -> &'static str {
        match self {
            QueryKind::ValueByUser => "value_by_user",
            QueryKind::Users => "users",
            QueryKind::Map => "map",
        }
    }
}

/// The result of the last query. Only one family is ever held at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryResult {
    Users {
        users: Vec<AddressKey>,
    },
    ValueByUser {
        address: AddressKey,
        value: Option<String>,
    },
    Map {
        entries: Vec<UserRecord>,
    },
}

impl QueryResult {
    pub fn kind(&self) -> QueryKind {
        match self {
            QueryResult::Users { .. } => QueryKind::Users,
            QueryResult::ValueByUser { .. } => QueryKind::ValueByUser,
            QueryResult::Map { .. } => QueryKind::Map,
        }
    }
}

/// Wallet session connectivity as reported by the signing-session provider.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "address", rename_all = "snake_case")]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected(AddressKey),
}

impl ConnectionState {
    pub fn address(&self) -> Option<&AddressKey> {
        match self {
            ConnectionState::Connected(addr) => Some(addr),
            _ => None,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_receipt_wire_names() {
        let r: TxReceipt =
            serde_json::from_value(json!({"transactionHash": "ABC", "height": 7})).unwrap();
        assert_eq!(r.transaction_hash, "ABC");
        assert_eq!(r.height, 7);
    }

    #[test]
    fn test_query_result_kind() {
        let r = QueryResult::Users { users: vec![] };
        assert_eq!(r.kind(), QueryKind::Users);
        assert_eq!(r.kind().name(), "users");
    }

    #[test]
    fn test_connection_state_address() {
        let s = ConnectionState::Connected(AddressKey::new("xion1a"));
        assert_eq!(s.address().map(|a| a.as_str()), Some("xion1a"));
        assert!(ConnectionState::Connecting.address().is_none());
        assert!(!ConnectionState::default().is_connected());
    }
}
