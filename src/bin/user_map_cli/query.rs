//! Read-only contract queries: value / users / map / balance

use anyhow::Result;
use clap::Parser;
use serde_json::json;
use user_map_types::{format_base_units, AddressKey, QueryResult};

use super::output::{format_balance, format_query_result, print_json};
use super::CliContext;

#[derive(Parser, Debug)]
pub struct ValueCmd {
    /// Account to look up (default: the connected account)
    #[arg(long)]
    user: Option<String>,
}

impl ValueCmd {
    pub async fn execute(&self, ctx: &mut CliContext, json_output: bool) -> Result<()> {
        let (_config, client) = ctx.client()?;
        let address = self.user.as_deref().map(AddressKey::new);
        let result = client.query_value_by_user(address).await?;
        print_result(&result, json_output)
    }
}

fn print_result(result: &QueryResult, json_output: bool) -> Result<()> {
    if json_output {
        print_json(result)
    } else {
        println!("{}", format_query_result(result));
        Ok(())
    }
}

pub async fn users(ctx: &mut CliContext, json_output: bool) -> Result<()> {
    let (_config, client) = ctx.client()?;
    let result = client.query_users().await?;
    print_result(&result, json_output)
}

pub async fn map(ctx: &mut CliContext, json_output: bool) -> Result<()> {
    let (_config, client) = ctx.client()?;
    let result = client.query_map().await?;
    print_result(&result, json_output)
}

pub async fn balance(ctx: &mut CliContext, json_output: bool) -> Result<()> {
    let (config, client) = ctx.client()?;
    let amount = client.balance().await?;
    if json_output {
        print_json(&json!({
            "address": client.account(),
            "denom": config.fee_denom,
            "amount": amount.to_string(),
            "display": format_base_units(amount),
        }))
    } else {
        println!("{}", format_balance(amount, &config.fee_denom));
        Ok(())
    }
}
