//! Runtime configuration from the environment and command-line overrides.
//!
//! | Variable | Default |
//! |----------|---------|
//! | `USER_MAP_CONTRACT_ADDRESS` | required |
//! | `USER_MAP_NETWORK` | `testnet` (or inferred from `USER_MAP_LCD_URL`) |
//! | `USER_MAP_LCD_URL` | network preset |
//! | `USER_MAP_SIGNER_URL` | none; updates and signing are unavailable |
//! | `USER_MAP_SESSION_TOKEN` | none |
//! | `USER_MAP_DENOM` | `uxion` |
//! | `USER_MAP_RETRY_ATTEMPTS` | 3 |
//! | `USER_MAP_RETRY_DELAY_MS` | 1000 |
//! | `USER_MAP_HOME` | `~/.user-map` |
//! | `USER_MAP_LOG_JSON` | off |

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use user_map_core::{KvError, OrchestratorConfig, RemoteGateway, TransactionOrchestrator};
use user_map_transport::network::{infer_network_from_url, resolve_lcd_endpoint};
use user_map_transport::{LcdClient, NetworkPreset, SignerClient};
use user_map_types::env_utils::env_string;
use user_map_types::RetryPolicy;

pub const CONTRACT_ADDRESS_VAR: &str = "USER_MAP_CONTRACT_ADDRESS";
pub const NETWORK_VAR: &str = "USER_MAP_NETWORK";
pub const LCD_URL_VAR: &str = "USER_MAP_LCD_URL";
pub const SIGNER_URL_VAR: &str = "USER_MAP_SIGNER_URL";
pub const SESSION_TOKEN_VAR: &str = "USER_MAP_SESSION_TOKEN";
pub const DENOM_VAR: &str = "USER_MAP_DENOM";
pub const RETRY_ATTEMPTS_VAR: &str = "USER_MAP_RETRY_ATTEMPTS";
pub const RETRY_DELAY_VAR: &str = "USER_MAP_RETRY_DELAY_MS";
pub const HOME_VAR: &str = "USER_MAP_HOME";
pub const LOG_JSON_VAR: &str = "USER_MAP_LOG_JSON";

/// Values given on the command line. They win over the environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub network: Option<String>,
    pub lcd_url: Option<String>,
    pub signer_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub contract_address: String,
    pub network: NetworkPreset,
    pub lcd_url: String,
    pub signer_url: Option<String>,
    pub session_token: Option<String>,
    pub fee_denom: String,
    pub retry: RetryPolicy,
}

/// Load `.env` from the working directory (or a parent) if there is one.
pub fn load_dotenv() -> Option<PathBuf> {
    dotenv::dotenv().ok()
}

/// Session directory: `USER_MAP_HOME`, else `~/.user-map`.
pub fn user_map_home() -> PathBuf {
    env_string(HOME_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".user-map")
        })
}

pub fn session_file() -> PathBuf {
    user_map_home().join("session.json")
}

/// Network selection, without requiring a contract address.
///
/// An explicit name wins; otherwise the network is inferred from a custom
/// LCD URL, falling back to testnet.
pub fn resolve_network(overrides: &ConfigOverrides) -> Result<NetworkPreset, KvError> {
    resolve_network_with(&|key| env_string(key), overrides)
}

fn resolve_network_with(
    lookup: &dyn Fn(&str) -> Option<String>,
    overrides: &ConfigOverrides,
) -> Result<NetworkPreset, KvError> {
    let name = overrides.network.clone().or_else(|| lookup(NETWORK_VAR));
    match name {
        Some(name) => NetworkPreset::from_name(&name).ok_or_else(|| {
            KvError::Configuration(format!(
                "unknown network '{}' (expected testnet or mainnet)",
                name
            ))
        }),
        None => {
            let lcd = overrides.lcd_url.clone().or_else(|| lookup(LCD_URL_VAR));
            let inferred = lcd.as_deref().and_then(infer_network_from_url);
            Ok(inferred
                .and_then(NetworkPreset::from_name)
                .unwrap_or_else(NetworkPreset::testnet))
        }
    }
}

fn parse_var<T: FromStr>(
    lookup: &dyn Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, KvError> {
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| KvError::Configuration(format!("{} has an invalid value '{}'", key, raw))),
    }
}

impl AppConfig {
    /// Resolve from the process environment.
    pub fn from_env(overrides: &ConfigOverrides) -> Result<Self, KvError> {
        Self::from_lookup(&|key| env_string(key), overrides)
    }

    /// Resolve from an arbitrary variable source. Blank values count as unset.
    pub fn from_lookup(
        lookup: &dyn Fn(&str) -> Option<String>,
        overrides: &ConfigOverrides,
    ) -> Result<Self, KvError> {
        let lookup = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let contract_address = lookup(CONTRACT_ADDRESS_VAR).ok_or_else(|| {
            KvError::Configuration(format!(
                "{} is not set; export it or add it to .env",
                CONTRACT_ADDRESS_VAR
            ))
        })?;

        let network = resolve_network_with(&lookup, overrides)?;
        let explicit_lcd = overrides.lcd_url.clone().or_else(|| lookup(LCD_URL_VAR));
        let lcd_url = resolve_lcd_endpoint(explicit_lcd.as_deref(), &network);
        let signer_url = overrides
            .signer_url
            .clone()
            .or_else(|| lookup(SIGNER_URL_VAR));
        let fee_denom = lookup(DENOM_VAR).unwrap_or_else(|| network.fee_denom.to_string());

        let defaults = RetryPolicy::default();
        let attempts = parse_var(&lookup, RETRY_ATTEMPTS_VAR, defaults.max_attempts)?;
        let delay_ms = parse_var(
            &lookup,
            RETRY_DELAY_VAR,
            defaults.initial_delay.as_millis() as u64,
        )?;

        Ok(Self {
            contract_address: contract_address.trim().to_string(),
            network,
            lcd_url,
            signer_url,
            session_token: lookup(SESSION_TOKEN_VAR),
            fee_denom,
            retry: RetryPolicy::new(attempts, delay_ms),
        })
    }

    /// Gateway with the LCD query client and, when configured, the signer.
    pub fn gateway(&self) -> RemoteGateway {
        let gateway = RemoteGateway::new(self.contract_address.clone())
            .with_query_client(Arc::new(LcdClient::new(&self.lcd_url)))
            .with_retry_policy(self.retry);
        match &self.signer_url {
            Some(url) => gateway.with_signing_client(Arc::new(SignerClient::new(
                url,
                self.session_token.clone(),
            ))),
            None => gateway,
        }
    }

    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            fee_denom: self.fee_denom.clone(),
            ..OrchestratorConfig::default()
        }
    }

    pub fn orchestrator(&self) -> TransactionOrchestrator {
        TransactionOrchestrator::new(self.gateway(), self.orchestrator_config())
    }
}
