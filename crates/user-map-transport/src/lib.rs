//! User-map Transport Layer
//!
//! Network transport for the user-map contract.
//!
//! This crate provides:
//! - [`ContractQuery`] / [`ContractExecute`]: the seams the client core talks to
//! - [`lcd`]: read-only smart queries and bank balances over a Cosmos LCD endpoint
//! - [`signer`]: execute and arbitrary signing through a delegated signing-session service
//! - [`network`]: network presets and the block-explorer link template
//!
//! # Example
//!
//! ```ignore
//! use user_map_transport::{ContractQuery, LcdClient};
//! use user_map_types::QueryMsg;
//!
//! let lcd = LcdClient::new("https://api.xion-testnet-2.burnt.com");
//! let users = lcd
//!     .query_contract_smart("xion1contract...", &QueryMsg::GetUsers {}.to_value()?)
//!     .await?;
//! ```

pub mod lcd;
pub mod network;
pub mod signer;

pub use lcd::LcdClient;
pub use network::NetworkPreset;
pub use signer::SignerClient;

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;
use user_map_types::{AddressKey, Coin, TxReceipt};

/// Fee selection for an execute call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeeMode {
    /// Let the signer simulate and pick gas and fee.
    Auto,
    /// Explicit fee in base units.
    Fixed { amount: u128, denom: String, gas: u64 },
}

impl FeeMode {
    pub fn to_value(&self) -> Value {
        match self {
            FeeMode::Auto => Value::String("auto".to_string()),
            FeeMode::Fixed { amount, denom, gas } => serde_json::json!({
                "amount": [{ "denom": denom, "amount": amount.to_string() }],
                "gas": gas.to_string(),
            }),
        }
    }
}

/// Read-only contract access (feeless).
#[async_trait]
pub trait ContractQuery: Send + Sync {
    /// Run a smart query and return the contract's JSON response.
    async fn query_contract_smart(&self, contract: &str, msg: &Value) -> Result<Value>;

    /// Balance of `address` in `denom`. A missing balance is reported as zero.
    async fn get_balance(&self, address: &AddressKey, denom: &str) -> Result<Coin>;
}

/// State-mutating access, signed by the wallet session.
#[async_trait]
pub trait ContractExecute: Send + Sync {
    /// Broadcast an execute message and wait for it to be included in a block.
    async fn execute(
        &self,
        sender: &AddressKey,
        contract: &str,
        msg: &Value,
        fee: FeeMode,
    ) -> Result<TxReceipt>;

    /// Sign an arbitrary message with the session key of `signer`.
    async fn sign_arbitrary(&self, signer: &AddressKey, message: &str) -> Result<String>;

    /// The account the signing session is currently bound to, if any.
    async fn session_account(&self) -> Result<Option<AddressKey>>;
}
