//! CLI subcommand implementations for user-map

pub mod editor;
pub mod explorer;
pub mod output;
pub mod query;
pub mod session_cmd;
pub mod sign;
pub mod update;

use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use user_map::config::{self, AppConfig, ConfigOverrides, NETWORK_VAR};
use user_map::CliSession;
use user_map_core::TransactionOrchestrator;
use user_map_transport::NetworkPreset;
use user_map_types::env_utils::env_string;

/// State shared by every command of one invocation.
pub struct CliContext {
    pub overrides: ConfigOverrides,
    pub session: CliSession,
    pub session_path: PathBuf,
}

impl CliContext {
    pub fn config(&self) -> Result<AppConfig> {
        Ok(AppConfig::from_env(&self.overrides)?)
    }

    /// Orchestrator for the configured contract, resumed on the saved account.
    pub fn client(&mut self) -> Result<(AppConfig, TransactionOrchestrator)> {
        let config = self.config()?;
        self.session
            .bind(&config.contract_address, config.network.name);
        let client = config.orchestrator();
        if let Some(address) = self.session.address().cloned() {
            client.resume(address, self.session.pending_edit().map(String::from));
        }
        Ok((config, client))
    }

    /// Network for offline commands: an explicit choice, else the one the
    /// session was recorded on.
    pub fn network(&self) -> Result<NetworkPreset> {
        let explicit = self.overrides.network.is_some()
            || self.overrides.lcd_url.is_some()
            || env_string(NETWORK_VAR).is_some();
        if !explicit {
            let saved = self.session.persisted.metadata.network.as_deref();
            if let Some(preset) = saved.and_then(NetworkPreset::from_name) {
                return Ok(preset);
            }
        }
        Ok(config::resolve_network(&self.overrides)?)
    }
}

/// JSON text given inline or read from a file (`-` for stdin).
#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
pub struct TextInput {
    /// JSON text
    #[arg(long)]
    text: Option<String>,

    /// File holding the JSON text
    #[arg(long)]
    file: Option<PathBuf>,
}

impl TextInput {
    pub fn read(&self) -> Result<String> {
        if let Some(text) = &self.text {
            return Ok(text.clone());
        }
        match &self.file {
            Some(path) if path.as_os_str() == "-" => {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("Failed to read stdin")?;
                Ok(buf)
            }
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display())),
            None => anyhow::bail!("provide --text or --file"),
        }
    }
}
