//! In-memory stand-in for the user-map contract and the delegated signer.
//!
//! Behaves like the real contract for the four message shapes the client
//! sends, counts every call, and can be scripted to fail.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tokio::sync::Notify;
use user_map_transport::{ContractExecute, ContractQuery, FeeMode};
use user_map_types::{AddressKey, Coin, TxReceipt};

#[derive(Default)]
struct Inner {
    /// Insertion-ordered (address, value) pairs.
    records: Vec<(String, String)>,
    balances: HashMap<String, u128>,
    session: Option<String>,
    query_calls: usize,
    balance_calls: usize,
    execute_calls: usize,
    fail_queries: usize,
    fail_executes: usize,
    fail_balances: usize,
    execute_error: String,
    compact_writes: bool,
    query_gate: Option<Arc<Notify>>,
}

#[derive(Default)]
pub struct MockChain {
    inner: Mutex<Inner>,
}

impl MockChain {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_balance(self: Arc<Self>, address: &str, amount: u128) -> Arc<Self> {
        self.inner.lock().balances.insert(address.to_string(), amount);
        self
    }

    pub fn with_record(self: Arc<Self>, address: &str, value: &str) -> Arc<Self> {
        self.store(address, value);
        self
    }

    pub fn with_session(self: Arc<Self>, address: &str) -> Arc<Self> {
        self.inner.lock().session = Some(address.to_string());
        self
    }

    /// Fail the next `n` smart queries with a transport error.
    pub fn fail_next_queries(&self, n: usize) {
        self.inner.lock().fail_queries = n;
    }

    /// Fail the next `n` execute calls with `error`.
    pub fn fail_next_executes(&self, n: usize, error: &str) {
        let mut inner = self.inner.lock();
        inner.fail_executes = n;
        inner.execute_error = error.to_string();
    }

    /// Fail the next `n` balance lookups with a transport error.
    pub fn fail_next_balances(&self, n: usize) {
        self.inner.lock().fail_balances = n;
    }

    /// Store executed values re-serialized without whitespace, the way a
    /// contract that canonicalizes its input would.
    pub fn compact_writes(self: Arc<Self>) -> Arc<Self> {
        self.inner.lock().compact_writes = true;
        self
    }

    /// Make smart queries wait until the returned gate is notified.
    pub fn gate_queries(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.inner.lock().query_gate = Some(gate.clone());
        gate
    }

    pub fn query_calls(&self) -> usize {
        self.inner.lock().query_calls
    }

    pub fn balance_calls(&self) -> usize {
        self.inner.lock().balance_calls
    }

    pub fn execute_calls(&self) -> usize {
        self.inner.lock().execute_calls
    }

    pub fn stored(&self, address: &str) -> Option<String> {
        self.inner
            .lock()
            .records
            .iter()
            .find(|(a, _)| a == address)
            .map(|(_, v)| v.clone())
    }

    fn store(&self, address: &str, value: &str) {
        let mut inner = self.inner.lock();
        match inner.records.iter_mut().find(|(a, _)| a == address) {
            Some(entry) => entry.1 = value.to_string(),
            None => inner.records.push((address.to_string(), value.to_string())),
        }
    }

    fn answer(&self, msg: &Value) -> Result<Value> {
        let inner = self.inner.lock();
        if let Some(q) = msg.get("get_value_by_user") {
            let address = q
                .get("address")
                .and_then(Value::as_str)
                .ok_or_else(|| anyhow!("missing address"))?;
            return Ok(inner
                .records
                .iter()
                .find(|(a, _)| a == address)
                .map(|(_, v)| Value::String(v.clone()))
                .unwrap_or(Value::Null));
        }
        if msg.get("get_users").is_some() {
            return Ok(json!(inner.records.iter().map(|(a, _)| a).collect::<Vec<_>>()));
        }
        if msg.get("get_map").is_some() {
            return Ok(json!(inner
                .records
                .iter()
                .map(|(a, v)| json!([a, v]))
                .collect::<Vec<_>>()));
        }
        Err(anyhow!("unknown query {}", msg))
    }
}

#[async_trait]
impl ContractQuery for MockChain {
    async fn query_contract_smart(&self, contract: &str, msg: &Value) -> Result<Value> {
        let gate = {
            let mut inner = self.inner.lock();
            inner.query_calls += 1;
            inner.query_gate.take()
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }
        {
            let mut inner = self.inner.lock();
            if inner.fail_queries > 0 {
                inner.fail_queries -= 1;
                return Err(anyhow!("connection reset by peer"));
            }
        }
        if contract != super::CONTRACT {
            return Err(anyhow!("no such contract {}", contract));
        }
        self.answer(msg)
    }

    async fn get_balance(&self, address: &AddressKey, denom: &str) -> Result<Coin> {
        let mut inner = self.inner.lock();
        inner.balance_calls += 1;
        if inner.fail_balances > 0 {
            inner.fail_balances -= 1;
            return Err(anyhow!("balance endpoint unavailable"));
        }
        let amount = inner.balances.get(address.as_str()).copied().unwrap_or(0);
        Ok(Coin::new(denom, amount))
    }
}

#[async_trait]
impl ContractExecute for MockChain {
    async fn execute(
        &self,
        sender: &AddressKey,
        contract: &str,
        msg: &Value,
        _fee: FeeMode,
    ) -> Result<TxReceipt> {
        let (n, compact) = {
            let mut inner = self.inner.lock();
            inner.execute_calls += 1;
            if inner.fail_executes > 0 {
                inner.fail_executes -= 1;
                return Err(anyhow!("{}", inner.execute_error));
            }
            (inner.execute_calls, inner.compact_writes)
        };
        if contract != super::CONTRACT {
            return Err(anyhow!("no such contract {}", contract));
        }
        let value = msg
            .get("update")
            .and_then(|u| u.get("value"))
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("unknown execute message {}", msg))?;
        if compact {
            let parsed: Value = serde_json::from_str(value)?;
            self.store(sender.as_str(), &parsed.to_string());
        } else {
            self.store(sender.as_str(), value);
        }
        Ok(TxReceipt {
            transaction_hash: format!("TX{:04}", n),
            height: 1000 + n as u64,
        })
    }

    async fn sign_arbitrary(&self, signer: &AddressKey, message: &str) -> Result<String> {
        Ok(format!("sig:{}:{}", signer, message))
    }

    async fn session_account(&self) -> Result<Option<AddressKey>> {
        Ok(self.inner.lock().session.as_deref().map(AddressKey::new))
    }
}
