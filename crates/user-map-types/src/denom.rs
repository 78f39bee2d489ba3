//! Native token amounts.

use serde::{Deserialize, Serialize};

/// Fee denomination of the target network.
pub const DEFAULT_FEE_DENOM: &str = "uxion";

/// Base units per whole token (1 XION = 1,000,000 uxion).
pub const BASE_UNITS_PER_TOKEN: u128 = 1_000_000;

/// A balance as reported by the bank module. `amount` is a decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: String,
}

impl Coin {
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Self {
            denom: denom.into(),
            amount: amount.to_string(),
        }
    }

    /// Parse the amount in base units.
    pub fn base_units(&self) -> Result<u128, std::num::ParseIntError> {
        self.amount.trim().parse()
    }
}

/// Render base units as a whole-token decimal (`183` -> `"0.000183"`).
///
/// Trailing zeros of the fraction are dropped; whole amounts print without a
/// decimal point.
pub fn format_base_units(amount: u128) -> String {
    let whole = amount / BASE_UNITS_PER_TOKEN;
    let frac = amount % BASE_UNITS_PER_TOKEN;
    if frac == 0 {
        return whole.to_string();
    }
    let frac = format!("{:06}", frac);
    format!("{}.{}", whole, frac.trim_end_matches('0'))
}

/// Display symbol for a denom: `uxion` -> `XION`.
pub fn display_symbol(denom: &str) -> String {
    denom
        .strip_prefix('u')
        .filter(|rest| !rest.is_empty())
        .unwrap_or(denom)
        .to_ascii_uppercase()
}
