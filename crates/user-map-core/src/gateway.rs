//! Semantic layer over the contract's query and execute calls.
//!
//! Handles are optional: a gateway built before the wallet session is ready
//! has no signer, and one built without a node endpoint has no query client.
//! Calls that need a missing handle fail with
//! [`KvError::GatewayPrecondition`] before anything is sent.

use std::sync::Arc;

use serde_json::Value;
use tracing::debug;
use user_map_transport::{ContractExecute, ContractQuery, FeeMode};
use user_map_types::{AddressKey, ExecuteMsg, QueryMsg, RetryPolicy, TxReceipt, UserRecord};

use crate::error::KvError;
use crate::retry::with_retry;

const QUERY_CLIENT: &str = "query client";
const SIGNING_CLIENT: &str = "signing client";

#[derive(Clone)]
pub struct RemoteGateway {
    query: Option<Arc<dyn ContractQuery>>,
    signer: Option<Arc<dyn ContractExecute>>,
    contract: String,
    retry: RetryPolicy,
}

impl RemoteGateway {
    pub fn new(contract: impl Into<String>) -> Self {
        Self {
            query: None,
            signer: None,
            contract: contract.into(),
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_query_client(mut self, client: Arc<dyn ContractQuery>) -> Self {
        self.query = Some(client);
        self
    }

    pub fn with_signing_client(mut self, client: Arc<dyn ContractExecute>) -> Self {
        self.signer = Some(client);
        self
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn contract(&self) -> &str {
        &self.contract
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    pub fn has_signer(&self) -> bool {
        self.signer.is_some()
    }

    fn query_client(&self, operation: &'static str) -> Result<&Arc<dyn ContractQuery>, KvError> {
        self.query.as_ref().ok_or(KvError::GatewayPrecondition {
            operation,
            handle: QUERY_CLIENT,
        })
    }

    fn signing_client(
        &self,
        operation: &'static str,
    ) -> Result<&Arc<dyn ContractExecute>, KvError> {
        self.signer.as_ref().ok_or(KvError::GatewayPrecondition {
            operation,
            handle: SIGNING_CLIENT,
        })
    }

    async fn smart_query(&self, operation: &'static str, msg: &QueryMsg) -> Result<Value, KvError> {
        let client = self.query_client(operation)?;
        let msg = msg.to_value().map_err(|e| encode_error(operation, e))?;
        client
            .query_contract_smart(&self.contract, &msg)
            .await
            .map_err(|e| KvError::remote(operation, &e))
    }

    /// Stored value for `address`, `None` for an address with no record. Retried.
    pub async fn get_value_by_user(&self, address: &AddressKey) -> Result<Option<String>, KvError> {
        const OP: &str = "get_value_by_user";
        // Checked up front so a missing handle is not retried.
        self.query_client(OP)?;
        let msg = QueryMsg::GetValueByUser {
            address: address.clone(),
        };
        let data = with_retry(self.retry, OP, || self.smart_query(OP, &msg)).await?;
        debug!(address = address.as_str(), "fetched user value");
        Ok(decode_value(data))
    }

    pub async fn get_users(&self) -> Result<Vec<AddressKey>, KvError> {
        const OP: &str = "get_users";
        let data = self.smart_query(OP, &QueryMsg::GetUsers {}).await?;
        decode_users(data)
    }

    pub async fn get_map(&self) -> Result<Vec<UserRecord>, KvError> {
        const OP: &str = "get_map";
        let data = self.smart_query(OP, &QueryMsg::GetMap {}).await?;
        decode_map(data)
    }

    /// Balance in base units.
    pub async fn get_balance(&self, address: &AddressKey, denom: &str) -> Result<u128, KvError> {
        const OP: &str = "get_balance";
        let client = self.query_client(OP)?;
        let coin = client
            .get_balance(address, denom)
            .await
            .map_err(|e| KvError::remote(OP, &e))?;
        coin.base_units().map_err(|e| KvError::UnexpectedResponse {
            operation: OP,
            detail: format!("amount '{}': {}", coin.amount, e),
        })
    }

    /// Submit `{"update":{"value": payload}}` from `sender`. Retried.
    ///
    /// `payload` must already be valid JSON; it is sent as a string.
    pub async fn execute_update(
        &self,
        sender: &AddressKey,
        contract: &str,
        payload: &str,
    ) -> Result<TxReceipt, KvError> {
        const OP: &str = "execute_update";
        let signer = self.signing_client(OP)?;
        let msg = ExecuteMsg::Update {
            value: payload.to_string(),
        }
        .to_value()
        .map_err(|e| encode_error(OP, e))?;
        let msg = &msg;
        with_retry(self.retry, OP, || async move {
            signer
                .execute(sender, contract, msg, FeeMode::Auto)
                .await
                .map_err(|e| KvError::remote(OP, &e))
        })
        .await
    }

    pub async fn sign_arbitrary(&self, signer: &AddressKey, message: &str) -> Result<String, KvError> {
        const OP: &str = "sign_arbitrary";
        let client = self.signing_client(OP)?;
        client
            .sign_arbitrary(signer, message)
            .await
            .map_err(|e| KvError::remote(OP, &e))
    }

    pub async fn session_account(&self) -> Result<Option<AddressKey>, KvError> {
        const OP: &str = "session_account";
        let client = self.signing_client(OP)?;
        client
            .session_account()
            .await
            .map_err(|e| KvError::remote(OP, &e))
    }
}

fn encode_error(operation: &'static str, err: serde_json::Error) -> KvError {
    KvError::Configuration(format!("{} message could not be encoded: {}", operation, err))
}

/// The contract returns the stored string; anything else is re-serialized.
fn decode_value(data: Value) -> Option<String> {
    match data {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

fn decode_users(data: Value) -> Result<Vec<AddressKey>, KvError> {
    let items = match data {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("users") {
            Some(Value::Array(items)) => items,
            _ => return Err(unexpected("get_users", "expected a list of addresses")),
        },
        _ => return Err(unexpected("get_users", "expected a list of addresses")),
    };
    items
        .into_iter()
        .map(|item| match item {
            Value::String(s) => Ok(AddressKey::new(s)),
            other => Err(unexpected("get_users", &format!("non-string address {}", other))),
        })
        .collect()
}

fn decode_map(data: Value) -> Result<Vec<UserRecord>, KvError> {
    let Value::Array(items) = data else {
        return Err(unexpected("get_map", "expected a list of [address, value] pairs"));
    };
    items
        .into_iter()
        .map(|item| match item {
            Value::Array(pair) if pair.len() == 2 => {
                let mut pair = pair.into_iter();
                let address = match pair.next() {
                    Some(Value::String(s)) => AddressKey::new(s),
                    other => {
                        return Err(unexpected(
                            "get_map",
                            &format!("non-string address {:?}", other),
                        ))
                    }
                };
                let value = pair.next().and_then(decode_value).unwrap_or_default();
                Ok(UserRecord { address, value })
            }
            other => Err(unexpected("get_map", &format!("malformed entry {}", other))),
        })
        .collect()
}

fn unexpected(operation: &'static str, detail: &str) -> KvError {
    KvError::UnexpectedResponse {
        operation,
        detail: detail.to_string(),
    }
}
