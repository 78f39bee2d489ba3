//! Wallet account identifiers.
//!
//! Addresses are bech32 strings such as `xion1...`. The client treats them as
//! opaque, case-sensitive keys; checksum validation and uniqueness belong to
//! the chain and the contract.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A bech32-encoded account address, compared byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AddressKey(String);

impl AddressKey {
    /// Wrap an address string. Surrounding whitespace is trimmed, case is kept.
    pub fn new(addr: impl AsRef<str>) -> Self {
        Self(addr.as_ref().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Shortened form for display: `xion1abcd...wxyz`.
    pub fn short(&self) -> String {
        let s = &self.0;
        if s.chars().count() <= 16 {
            return s.clone();
        }
        let head: String = s.chars().take(9).collect();
        let skip = s.chars().count() - 4;
        let tail: String = s.chars().skip(skip).collect();
        format!("{}...{}", head, tail)
    }
}

impl fmt::Display for AddressKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AddressKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for AddressKey {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl AsRef<str> for AddressKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_sensitive_and_trimmed() {
        let a = AddressKey::new("  xion1Abc ");
        assert_eq!(a.as_str(), "xion1Abc");
        assert_ne!(a, AddressKey::new("xion1abc"));
    }

    #[test]
    fn test_short() {
        let a = AddressKey::new("xion1w5x0f0h9vk7tshq4qm3q8yvqzpc3exzd3g7v4k");
        assert_eq!(a.short(), "xion1w5x0...7v4k");
        assert_eq!(AddressKey::new("xion1short").short(), "xion1short");
    }
}
