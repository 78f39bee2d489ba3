//! Offline editor commands. No configuration or network access needed.

use anyhow::Result;
use clap::Parser;
use serde_json::json;
use user_map_core::{json_guard, KvError, Validation};

use super::output::print_json;
use super::TextInput;

#[derive(Parser, Debug)]
pub struct ValidateCmd {
    #[command(flatten)]
    input: TextInput,
}

impl ValidateCmd {
    pub fn execute(&self, json_output: bool) -> Result<()> {
        let text = json_guard::normalize(&self.input.read()?);
        let validation = json_guard::validate(&text);
        if let Validation::Invalid { reason } = validation {
            return Err(KvError::Validation {
                reason: reason.to_string(),
            }
            .into());
        }

        if json_output {
            print_json(&json!({
                "success": true,
                "validation": validation,
                "normalized": text,
            }))
        } else {
            match validation {
                Validation::Empty => println!("Nothing to validate"),
                _ => println!("Valid JSON"),
            }
            Ok(())
        }
    }
}

#[derive(Parser, Debug)]
pub struct FormatCmd {
    #[command(flatten)]
    input: TextInput,
}

impl FormatCmd {
    pub fn execute(&self, json_output: bool) -> Result<()> {
        let text = json_guard::normalize(&self.input.read()?);
        let formatted = json_guard::format(&text);
        let valid = json_guard::validate(&text).is_valid();

        if json_output {
            print_json(&json!({
                "success": true,
                "valid": valid,
                "formatted": formatted,
            }))
        } else {
            println!("{}", formatted);
            Ok(())
        }
    }
}
