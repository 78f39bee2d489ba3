use anyhow::Result;
use clap::Parser;
use serde_json::json;

use super::output::print_json;
use super::CliContext;

#[derive(Parser, Debug)]
pub struct SignArbCmd {
    /// Message to sign
    #[arg(long)]
    message: String,
}

impl SignArbCmd {
    pub async fn execute(&self, ctx: &mut CliContext, json_output: bool) -> Result<()> {
        let (_config, client) = ctx.client()?;
        let signature = client.sign_arbitrary(&self.message).await?;
        if json_output {
            print_json(&json!({
                "signer": client.account(),
                "message": self.message,
                "signature": signature,
            }))
        } else {
            println!("{}", signature);
            Ok(())
        }
    }
}
