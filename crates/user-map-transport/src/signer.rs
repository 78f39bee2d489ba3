//! Client for a delegated signing-session service.
//!
//! The wallet session (grants, keys, fee allowance) lives in an external
//! service; this client only forwards messages to it and reads back receipts.
//!
//! Endpoints:
//! - `POST /v1/execute` `{"sender","contract","msg","fee"}` -> `{"transactionHash","height"}`
//! - `POST /v1/sign-arbitrary` `{"signer","message"}` -> `{"signature"}`
//! - `GET  /v1/session` -> `{"address": string | null}`

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, info};
use user_map_types::{AddressKey, TxReceipt};

use crate::lcd::read_json;
use crate::{ContractExecute, FeeMode};

#[derive(Clone)]
pub struct SignerClient {
    endpoint: String,
    token: Option<String>,
    agent: ureq::Agent,
}

impl SignerClient {
    /// Broadcasts wait for block inclusion, so the timeout is generous.
    const DEFAULT_TIMEOUT_SECS: u64 = 90;

    pub fn new(endpoint: &str, token: Option<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(Self::DEFAULT_TIMEOUT_SECS))
            .timeout_connect(Duration::from_secs(10))
            .build();
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token,
            agent,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn post(&self, path: &str, body: &Value, what: &str) -> Result<Value> {
        let url = format!("{}{}", self.endpoint, path);
        let mut req = self.agent.post(&url).set("Content-Type", "application/json");
        if let Some(token) = &self.token {
            req = req.set("Authorization", &format!("Bearer {}", token));
        }
        read_json(req.send_json(body), what)
    }

    fn get(&self, path: &str, what: &str) -> Result<Value> {
        let url = format!("{}{}", self.endpoint, path);
        let mut req = self.agent.get(&url);
        if let Some(token) = &self.token {
            req = req.set("Authorization", &format!("Bearer {}", token));
        }
        read_json(req.call(), what)
    }

    pub fn execute_blocking(
        &self,
        sender: &AddressKey,
        contract: &str,
        msg: &Value,
        fee: &FeeMode,
    ) -> Result<TxReceipt> {
        let body = execute_body(sender, contract, msg, fee);
        debug!(sender = sender.as_str(), contract = contract, "signer execute");
        let response = self.post("/v1/execute", &body, "signer execute")?;
        let receipt = parse_execute_response(&response)?;
        info!(
            tx_hash = %receipt.transaction_hash,
            height = receipt.height,
            "transaction included"
        );
        Ok(receipt)
    }

    pub fn sign_arbitrary_blocking(&self, signer: &AddressKey, message: &str) -> Result<String> {
        let body = json!({ "signer": signer, "message": message });
        let response = self.post("/v1/sign-arbitrary", &body, "signer sign-arbitrary")?;
        if let Some(err) = response_error(&response) {
            return Err(anyhow!("sign-arbitrary rejected: {}", err));
        }
        match response.get("signature") {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(other) => Ok(other.to_string()),
            None => Err(anyhow!("sign-arbitrary response missing signature")),
        }
    }

    pub fn session_account_blocking(&self) -> Result<Option<AddressKey>> {
        let response = self.get("/v1/session", "signer session")?;
        Ok(response
            .get("address")
            .and_then(Value::as_str)
            .map(AddressKey::new)
            .filter(|a| !a.is_empty()))
    }
}

#[async_trait]
impl ContractExecute for SignerClient {
    async fn execute(
        &self,
        sender: &AddressKey,
        contract: &str,
        msg: &Value,
        fee: FeeMode,
    ) -> Result<TxReceipt> {
        let client = self.clone();
        let sender = sender.clone();
        let contract = contract.to_string();
        let msg = msg.clone();
        tokio::task::spawn_blocking(move || client.execute_blocking(&sender, &contract, &msg, &fee))
            .await
            .context("signer execute task failed")?
    }

    async fn sign_arbitrary(&self, signer: &AddressKey, message: &str) -> Result<String> {
        let client = self.clone();
        let signer = signer.clone();
        let message = message.to_string();
        tokio::task::spawn_blocking(move || client.sign_arbitrary_blocking(&signer, &message))
            .await
            .context("signer sign-arbitrary task failed")?
    }

    async fn session_account(&self) -> Result<Option<AddressKey>> {
        let client = self.clone();
        tokio::task::spawn_blocking(move || client.session_account_blocking())
            .await
            .context("signer session task failed")?
    }
}

pub fn execute_body(sender: &AddressKey, contract: &str, msg: &Value, fee: &FeeMode) -> Value {
    json!({
        "sender": sender,
        "contract": contract,
        "msg": msg,
        "fee": fee.to_value(),
    })
}

/// An `error` field or a non-zero `code` (with `rawLog`) marks a failed broadcast.
fn response_error(response: &Value) -> Option<String> {
    if let Some(err) = response.get("error").filter(|e| !e.is_null()) {
        return Some(err.as_str().map(String::from).unwrap_or_else(|| err.to_string()));
    }
    match response.get("code").and_then(Value::as_u64) {
        Some(code) if code != 0 => {
            let log = response
                .get("rawLog")
                .and_then(Value::as_str)
                .unwrap_or("no log");
            Some(format!("code {}: {}", code, log))
        }
        _ => None,
    }
}

pub fn parse_execute_response(response: &Value) -> Result<TxReceipt> {
    if let Some(err) = response_error(response) {
        return Err(anyhow!("transaction failed: {}", err));
    }
    let hash = response
        .get("transactionHash")
        .and_then(Value::as_str)
        .filter(|h| !h.is_empty())
        .ok_or_else(|| anyhow!("execute response missing transactionHash"))?;
    // Some services report height as a string.
    let height = match response.get("height") {
        Some(Value::Number(n)) => n.as_u64(),
        Some(Value::String(s)) => s.parse().ok(),
        _ => None,
    }
    .ok_or_else(|| anyhow!("execute response missing height"))?;
    Ok(TxReceipt {
        transaction_hash: hash.to_string(),
        height,
    })
}
