//! login / logout / status

use anyhow::Result;
use clap::Parser;
use serde_json::json;
use user_map::CliSession;
use user_map_core::KvError;
use user_map_types::AddressKey;

use super::output::{describe_load, format_receipt, print_json};
use super::CliContext;

#[derive(Parser, Debug)]
pub struct LoginCmd {
    /// Account to connect (default: the signing session's account)
    #[arg(long)]
    address: Option<String>,
}

impl LoginCmd {
    pub async fn execute(&self, ctx: &mut CliContext, json_output: bool) -> Result<()> {
        let (_config, client) = ctx.client()?;
        let load = match &self.address {
            Some(address) => {
                client.connecting();
                client.connect(AddressKey::new(address)).await?
            }
            None => client.connect_session_account().await?,
        };
        let address = client.account().ok_or(KvError::NotConnected)?;
        ctx.session.connect(address.clone(), load.value.clone());

        if json_output {
            print_json(&json!({
                "success": true,
                "address": address,
                "value": load.value,
                "source": load.source,
            }))?;
        } else {
            println!("Connected {}", address);
            println!("Value ({}):\n{}", describe_load(&load.source), load.value);
        }
        Ok(())
    }
}

pub fn logout(ctx: &mut CliContext, json_output: bool) -> Result<()> {
    let removed = CliSession::clear(&ctx.session_path)?;
    ctx.session = CliSession::new();
    if json_output {
        print_json(&json!({ "success": true, "removed": removed }))?;
    } else if removed {
        println!("Logged out");
    } else {
        println!("No session to clear");
    }
    Ok(())
}

pub fn status(ctx: &CliContext, json_output: bool) -> Result<()> {
    let network = ctx.network()?;
    let persisted = &ctx.session.persisted;
    let explorer_url = persisted
        .last_receipt
        .as_ref()
        .map(|r| network.explorer_tx_url(&r.transaction_hash, r.height));

    if json_output {
        return print_json(&json!({
            "connected": persisted.address.is_some(),
            "address": persisted.address,
            "network": network.name,
            "contract": persisted.metadata.contract,
            "last_receipt": persisted.last_receipt,
            "explorer_url": explorer_url,
            "pending_edit": persisted.pending_edit,
            "created_at": persisted.metadata.created_at,
            "last_modified": persisted.metadata.last_modified,
            "session_file": ctx.session_path.display().to_string(),
        }));
    }

    match &persisted.address {
        Some(address) => println!("Connected: {}", address),
        None => println!("Not connected"),
    }
    println!("Network:   {} ({})", network.name, network.chain_id);
    if let Some(contract) = &persisted.metadata.contract {
        println!("Contract:  {}", contract);
    }
    if let (Some(receipt), Some(url)) = (&persisted.last_receipt, &explorer_url) {
        println!("\nLast update\n{}", format_receipt(receipt, url));
    }
    if let Some(edit) = &persisted.pending_edit {
        println!("\nPending edit:\n{}", edit);
    }
    Ok(())
}
