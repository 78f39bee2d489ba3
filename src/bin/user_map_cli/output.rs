//! Output formatting for the user-map CLI
//!
//! Human-readable text on stdout by default; one pretty-printed JSON object
//! per command under `--json`.

use anyhow::Result;
use serde::Serialize;
use user_map_core::{KvError, LoadSource, RefreshStatus};
use user_map_types::{display_symbol, format_base_units, QueryResult, TxReceipt};

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Error object printed on stdout for `--json` failures.
pub fn format_error_json(command: &str, err: &anyhow::Error) -> String {
    let code = err
        .downcast_ref::<KvError>()
        .map(KvError::code)
        .unwrap_or("error");
    let value = serde_json::json!({
        "success": false,
        "command": command,
        "code": code,
        "error": format!("{:#}", err),
    });
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
}

pub fn format_query_result(result: &QueryResult) -> String {
    match result {
        QueryResult::ValueByUser { address, value } => match value {
            Some(value) => format!("{}\n{}", address, value),
            None => format!("{}\n(no value stored)", address),
        },
        QueryResult::Users { users } => {
            if users.is_empty() {
                return "No users".to_string();
            }
            let mut out = format!("{} user(s):", users.len());
            for user in users {
                out.push_str(&format!("\n  {}", user));
            }
            out
        }
        QueryResult::Map { entries } => {
            if entries.is_empty() {
                return "No entries".to_string();
            }
            let mut out = format!("{} entr{}:", entries.len(), if entries.len() == 1 { "y" } else { "ies" });
            for entry in entries {
                out.push_str(&format!("\n  {}  {}", entry.address, entry.value));
            }
            out
        }
    }
}

pub fn format_balance(amount: u128, denom: &str) -> String {
    format!(
        "{} {} ({} {})",
        format_base_units(amount),
        display_symbol(denom),
        amount,
        denom
    )
}

pub fn format_receipt(receipt: &TxReceipt, explorer_url: &str) -> String {
    format!(
        "Transaction: {}\nHeight:      {}\nExplorer:    {}",
        receipt.transaction_hash, receipt.height, explorer_url
    )
}

pub fn format_refresh(refresh: &RefreshStatus) -> String {
    match refresh {
        RefreshStatus::Synced(value) => format!("Stored value:\n{}", value),
        RefreshStatus::Failed(detail) => {
            format!("Warning: update confirmed, but the new value could not be read back: {}", detail)
        }
        RefreshStatus::Skipped => "Session changed before the value was read back".to_string(),
    }
}

pub fn describe_load(source: &LoadSource) -> &'static str {
    match source {
        LoadSource::Remote => "loaded from contract",
        LoadSource::NoRecord => "no value stored yet",
        LoadSource::Fallback => "could not be loaded, starting from an empty object",
    }
}
