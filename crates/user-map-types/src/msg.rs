//! Message schema of the user-map contract.
//!
//! The contract is an external, fixed collaborator; these enums only encode
//! the JSON shapes it accepts.

use serde::{Deserialize, Serialize};

use crate::AddressKey;

/// Read-only contract queries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryMsg {
    /// `{"get_value_by_user":{"address":"..."}}`
    GetValueByUser { address: AddressKey },
    /// `{"get_users":{}}`
    GetUsers {},
    /// `{"get_map":{}}`
    GetMap {},
}

/// State-mutating contract calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecuteMsg {
    /// `{"update":{"value":"<json-string>"}}`. The value is stored as a string.
    Update { value: String },
}

impl QueryMsg {
    pub fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

impl ExecuteMsg {
    pub fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}
