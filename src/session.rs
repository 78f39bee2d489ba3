//! Session persistence across CLI invocations.
//!
//! One-shot commands share the connected account, the last receipt and the
//! last pending edit through `session.json` in the user-map home directory.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use user_map_types::{AddressKey, TxReceipt};

/// Serializable state that is persisted to disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct PersistedSession {
    /// Connected account, if logged in
    pub address: Option<AddressKey>,
    pub last_receipt: Option<TxReceipt>,
    pub pending_edit: Option<String>,
    pub metadata: SessionMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct SessionMetadata {
    pub created_at: Option<String>,
    pub last_modified: Option<String>,
    /// Contract the session was recorded against
    pub contract: Option<String>,
    pub network: Option<String>,
}

/// Runtime session state
#[derive(Debug, Clone)]
pub struct CliSession {
    pub persisted: PersistedSession,
    /// Whether state has been modified
    pub dirty: bool,
}

impl CliSession {
    pub fn new() -> Self {
        Self {
            persisted: PersistedSession {
                metadata: SessionMetadata {
                    created_at: Some(chrono::Utc::now().to_rfc3339()),
                    ..Default::default()
                },
                ..Default::default()
            },
            dirty: false,
        }
    }

    /// Load state from file or create new if not exists
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::new())
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read session file {}", path.display()))?;
        let persisted: PersistedSession =
            serde_json::from_str(&data).context("Failed to parse session file")?;
        Ok(Self {
            persisted,
            dirty: false,
        })
    }

    /// Write the session if it changed.
    pub fn save(&self, path: &Path) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let mut persisted = self.persisted.clone();
        persisted.metadata.last_modified = Some(chrono::Utc::now().to_rfc3339());

        let data = serde_json::to_string_pretty(&persisted).context("Failed to serialize session")?;
        std::fs::write(path, data).context("Failed to write session file")?;
        Ok(())
    }

    /// Remove the session file. Returns whether one existed.
    pub fn clear(path: &Path) -> Result<bool> {
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(path)
            .with_context(|| format!("Failed to remove {}", path.display()))?;
        Ok(true)
    }

    pub fn address(&self) -> Option<&AddressKey> {
        self.persisted.address.as_ref()
    }

    pub fn last_receipt(&self) -> Option<&TxReceipt> {
        self.persisted.last_receipt.as_ref()
    }

    pub fn pending_edit(&self) -> Option<&str> {
        self.persisted.pending_edit.as_deref()
    }

    /// Tie the session to a contract and network. A session recorded for a
    /// different contract is discarded.
    pub fn bind(&mut self, contract: &str, network: &str) {
        let meta = &self.persisted.metadata;
        let same_contract = meta.contract.as_deref() == Some(contract);
        let same_network = meta.network.as_deref() == Some(network);
        if same_contract && same_network {
            return;
        }
        if meta.contract.is_some() && !same_contract {
            tracing::warn!(
                previous = meta.contract.as_deref().unwrap_or_default(),
                contract,
                "session belongs to another contract, starting over"
            );
            let created_at = meta.created_at.clone();
            self.persisted = PersistedSession::default();
            self.persisted.metadata.created_at = created_at;
        }
        self.persisted.metadata.contract = Some(contract.to_string());
        self.persisted.metadata.network = Some(network.to_string());
        self.dirty = true;
    }

    pub fn connect(&mut self, address: AddressKey, pending_edit: String) {
        if self.persisted.address.as_ref() != Some(&address) {
            self.persisted.last_receipt = None;
        }
        self.persisted.address = Some(address);
        self.persisted.pending_edit = Some(pending_edit);
        self.dirty = true;
    }

    pub fn record_receipt(&mut self, receipt: TxReceipt) {
        self.persisted.last_receipt = Some(receipt);
        self.dirty = true;
    }

    pub fn set_pending_edit(&mut self, text: String) {
        self.persisted.pending_edit = Some(text);
        self.dirty = true;
    }
}

impl Default for CliSession {
    fn default() -> Self {
        Self::new()
    }
}
