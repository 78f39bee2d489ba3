//! update: the full submit cycle

use anyhow::Result;
use clap::Parser;
use serde_json::json;
use tracing::warn;
use user_map_core::RefreshStatus;

use super::output::{format_receipt, format_refresh, print_json};
use super::{CliContext, TextInput};

#[derive(Parser, Debug)]
pub struct UpdateCmd {
    #[command(flatten)]
    input: TextInput,
}

impl UpdateCmd {
    pub async fn execute(&self, ctx: &mut CliContext, json_output: bool) -> Result<()> {
        let text = self.input.read()?;
        let (config, client) = ctx.client()?;
        client.set_pending_edit(&text);

        let outcome = client.submit().await?;
        let explorer_url = config
            .network
            .explorer_tx_url(&outcome.receipt.transaction_hash, outcome.receipt.height);
        ctx.session.record_receipt(outcome.receipt.clone());
        ctx.session.set_pending_edit(client.pending_edit());
        if let RefreshStatus::Failed(detail) = &outcome.refresh {
            warn!(error = %detail, "stored value not re-read");
        }

        if json_output {
            print_json(&json!({
                "success": true,
                "receipt": outcome.receipt,
                "explorer_url": explorer_url,
                "refresh": outcome.refresh,
            }))
        } else {
            println!("{}", format_receipt(&outcome.receipt, &explorer_url));
            println!("\n{}", format_refresh(&outcome.refresh));
            Ok(())
        }
    }
}
