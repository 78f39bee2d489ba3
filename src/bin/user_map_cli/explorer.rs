use anyhow::{anyhow, Result};
use clap::Parser;
use serde_json::json;

use super::output::print_json;
use super::CliContext;

#[derive(Parser, Debug)]
pub struct ExplorerCmd {
    /// Transaction hash (default: the last recorded update)
    #[arg(long, requires = "height")]
    hash: Option<String>,

    /// Block height of the transaction
    #[arg(long, requires = "hash")]
    height: Option<u64>,
}

impl ExplorerCmd {
    pub fn execute(&self, ctx: &CliContext, json_output: bool) -> Result<()> {
        let (hash, height) = match (&self.hash, self.height) {
            (Some(hash), Some(height)) => (hash.clone(), height),
            _ => {
                let receipt = ctx.session.last_receipt().ok_or_else(|| {
                    anyhow!("no recorded transaction; pass --hash and --height")
                })?;
                (receipt.transaction_hash.clone(), receipt.height)
            }
        };
        let network = ctx.network()?;
        let url = network.explorer_tx_url(&hash, height);

        if json_output {
            print_json(&json!({
                "hash": hash,
                "height": height,
                "network": network.name,
                "url": url,
            }))
        } else {
            println!("{}", url);
            Ok(())
        }
    }
}
