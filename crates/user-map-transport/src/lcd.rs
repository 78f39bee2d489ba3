//! LCD (REST) client for read-only contract access.
//!
//! Uses two endpoints of a Cosmos SDK node:
//!
//! - `GET /cosmwasm/wasm/v1/contract/{contract}/smart/{query}` where `query` is
//!   the base64-encoded JSON query message
//! - `GET /cosmos/bank/v1beta1/balances/{address}/by_denom?denom={denom}`
//!
//! Requests are blocking (`ureq`) and are moved to the blocking pool when
//! called through [`ContractQuery`].

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use base64::Engine;
use serde_json::Value;
use tracing::debug;
use user_map_types::{AddressKey, Coin};

use crate::ContractQuery;

#[derive(Clone)]
pub struct LcdClient {
    endpoint: String,
    agent: ureq::Agent,
}

impl LcdClient {
    /// Default request timeout in seconds (can be overridden by env).
    const DEFAULT_TIMEOUT_SECS: u64 = 30;
    /// Default connect timeout in seconds.
    const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

    fn default_timeouts() -> (Duration, Duration) {
        let timeout_secs = user_map_types::env_utils::env_var_or(
            "USER_MAP_LCD_TIMEOUT_SECS",
            Self::DEFAULT_TIMEOUT_SECS,
        );
        (
            Duration::from_secs(timeout_secs),
            Duration::from_secs(Self::DEFAULT_CONNECT_TIMEOUT_SECS),
        )
    }

    fn build_agent(timeout: Duration, connect_timeout: Duration) -> ureq::Agent {
        ureq::AgentBuilder::new()
            .timeout(timeout)
            .timeout_connect(connect_timeout)
            .build()
    }

    /// Create a client with a custom endpoint.
    pub fn new(endpoint: &str) -> Self {
        let (timeout, connect_timeout) = Self::default_timeouts();
        Self::with_timeouts(endpoint, timeout, connect_timeout)
    }

    /// Create a client with explicit timeouts.
    pub fn with_timeouts(endpoint: &str, timeout: Duration, connect_timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            agent: Self::build_agent(timeout, connect_timeout),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Blocking smart query.
    pub fn smart_query_blocking(&self, contract: &str, msg: &Value) -> Result<Value> {
        let url = format!("{}{}", self.endpoint, smart_query_path(contract, msg)?);
        debug!(contract = contract, "LCD smart query");
        let response = read_json(self.agent.get(&url).call(), "LCD smart query")?;
        parse_smart_response(response)
    }

    /// Blocking balance lookup.
    pub fn balance_blocking(&self, address: &AddressKey, denom: &str) -> Result<Coin> {
        let url = format!("{}{}", self.endpoint, balance_path(address, denom));
        debug!(address = address.as_str(), denom = denom, "LCD balance query");
        let response = read_json(self.agent.get(&url).call(), "LCD balance query")?;
        parse_balance_response(&response, denom)
    }
}

#[async_trait]
impl ContractQuery for LcdClient {
    async fn query_contract_smart(&self, contract: &str, msg: &Value) -> Result<Value> {
        let client = self.clone();
        let contract = contract.to_string();
        let msg = msg.clone();
        tokio::task::spawn_blocking(move || client.smart_query_blocking(&contract, &msg))
            .await
            .context("LCD query task failed")?
    }

    async fn get_balance(&self, address: &AddressKey, denom: &str) -> Result<Coin> {
        let client = self.clone();
        let address = address.clone();
        let denom = denom.to_string();
        tokio::task::spawn_blocking(move || client.balance_blocking(&address, &denom))
            .await
            .context("LCD balance task failed")?
    }
}

/// Path of a smart query. The message is URL-safe base64 so it never
/// introduces a `/` into the path.
pub fn smart_query_path(contract: &str, msg: &Value) -> Result<String> {
    let raw = serde_json::to_vec(msg).context("serialize query message")?;
    let encoded = base64::engine::general_purpose::URL_SAFE.encode(raw);
    Ok(format!(
        "/cosmwasm/wasm/v1/contract/{}/smart/{}",
        contract, encoded
    ))
}

pub fn balance_path(address: &AddressKey, denom: &str) -> String {
    format!(
        "/cosmos/bank/v1beta1/balances/{}/by_denom?denom={}",
        address, denom
    )
}

/// Extract `data` from `{"data": ...}`.
pub fn parse_smart_response(response: Value) -> Result<Value> {
    match response {
        Value::Object(mut map) => map
            .remove("data")
            .ok_or_else(|| anyhow!("smart query response has no data field")),
        other => Err(anyhow!("unexpected smart query response: {}", other)),
    }
}

/// Read `{"balance": {"denom", "amount"}}`; a null or missing balance is zero.
pub fn parse_balance_response(response: &Value, denom: &str) -> Result<Coin> {
    let balance = match response.get("balance") {
        None | Some(Value::Null) => return Ok(Coin::new(denom, 0)),
        Some(b) => b,
    };
    let amount = balance
        .get("amount")
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("balance response missing amount: {}", response))?;
    let coin = Coin {
        denom: balance
            .get("denom")
            .and_then(Value::as_str)
            .unwrap_or(denom)
            .to_string(),
        amount: amount.to_string(),
    };
    coin.base_units()
        .with_context(|| format!("invalid balance amount '{}'", amount))?;
    Ok(coin)
}

/// Turn a `ureq` outcome into JSON, keeping the body of error responses
/// since nodes put the real reason there.
pub(crate) fn read_json(
    result: std::result::Result<ureq::Response, ureq::Error>,
    what: &str,
) -> Result<Value> {
    match result {
        Ok(resp) => resp
            .into_json::<Value>()
            .with_context(|| format!("Failed to parse {} response", what)),
        Err(ureq::Error::Status(code, resp)) => {
            let body = resp.into_string().unwrap_or_default();
            Err(anyhow!("{} returned HTTP {}: {}", what, code, body.trim()))
        }
        Err(e) => Err(anyhow!("{} failed: {}", what, e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_smart_query_path_encodes_message() {
        let msg = json!({"get_users": {}});
        let path = smart_query_path("xion1contract", &msg).unwrap();
        let encoded = base64::engine::general_purpose::URL_SAFE.encode(br#"{"get_users":{}}"#);
        assert_eq!(
            path,
            format!("/cosmwasm/wasm/v1/contract/xion1contract/smart/{}", encoded)
        );
        assert!(!path["/cosmwasm/wasm/v1/contract/xion1contract/smart/".len()..].contains('/'));
    }

    #[test]
    fn test_balance_path() {
        let path = balance_path(&AddressKey::new("xion1abc"), "uxion");
        assert_eq!(path, "/cosmos/bank/v1beta1/balances/xion1abc/by_denom?denom=uxion");
    }

    #[test]
    fn test_parse_smart_response() {
        assert_eq!(
            parse_smart_response(json!({"data": ["xion1a", "xion1b"]})).unwrap(),
            json!(["xion1a", "xion1b"])
        );
        assert_eq!(parse_smart_response(json!({"data": null})).unwrap(), Value::Null);
        assert!(parse_smart_response(json!({"code": 3, "message": "not found"})).is_err());
        assert!(parse_smart_response(json!("nope")).is_err());
    }

    #[test]
    fn test_parse_balance_response() {
        let coin =
            parse_balance_response(&json!({"balance": {"denom": "uxion", "amount": "500000"}}), "uxion")
                .unwrap();
        assert_eq!(coin.base_units().unwrap(), 500_000);

        let zero = parse_balance_response(&json!({"balance": null}), "uxion").unwrap();
        assert_eq!(zero, Coin::new("uxion", 0));

        assert!(parse_balance_response(&json!({"balance": {"denom": "uxion"}}), "uxion").is_err());
        assert!(
            parse_balance_response(&json!({"balance": {"denom": "uxion", "amount": "x"}}), "uxion")
                .is_err()
        );
    }

    #[test]
    fn test_endpoint_trailing_slash_trimmed() {
        let client = LcdClient::new("http://localhost:1317/");
        assert_eq!(client.endpoint(), "http://localhost:1317");
    }
}
