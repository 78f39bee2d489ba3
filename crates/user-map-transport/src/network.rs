use user_map_types::DEFAULT_FEE_DENOM;

const TESTNET_LCD: &str = "https://api.xion-testnet-2.burnt.com";
const MAINNET_LCD: &str = "https://api.xion-mainnet-1.burnt.com";
const EXPLORER_BASE: &str = "https://www.mintscan.io";

/// Static description of a target network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkPreset {
    pub name: &'static str,
    pub chain_id: &'static str,
    pub lcd_url: &'static str,
    pub explorer_slug: &'static str,
    pub fee_denom: &'static str,
}

impl NetworkPreset {
    pub fn testnet() -> Self {
        Self {
            name: "testnet",
            chain_id: "xion-testnet-2",
            lcd_url: TESTNET_LCD,
            explorer_slug: "xion-testnet",
            fee_denom: DEFAULT_FEE_DENOM,
        }
    }

    pub fn mainnet() -> Self {
        Self {
            name: "mainnet",
            chain_id: "xion-mainnet-1",
            lcd_url: MAINNET_LCD,
            explorer_slug: "xion",
            fee_denom: DEFAULT_FEE_DENOM,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "testnet" => Some(Self::testnet()),
            "mainnet" => Some(Self::mainnet()),
            _ => None,
        }
    }

    /// Block-explorer page for a transaction.
    pub fn explorer_tx_url(&self, hash: &str, height: u64) -> String {
        explorer_tx_url(self.explorer_slug, hash, height)
    }
}

pub fn explorer_tx_url(explorer_slug: &str, hash: &str, height: u64) -> String {
    format!(
        "{}/{}/tx/{}?height={}",
        EXPLORER_BASE, explorer_slug, hash, height
    )
}

pub fn infer_network_from_url(url: &str) -> Option<&'static str> {
    let lower = url.to_lowercase();
    if lower.contains("testnet") {
        Some("testnet")
    } else if lower.contains("mainnet") {
        Some("mainnet")
    } else {
        None
    }
}

/// Pick the LCD endpoint: explicit override first, then the network preset.
pub fn resolve_lcd_endpoint(explicit: Option<&str>, network: &NetworkPreset) -> String {
    match explicit.map(str::trim).filter(|v| !v.is_empty()) {
        Some(url) => url.trim_end_matches('/').to_string(),
        None => network.lcd_url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_name() {
        assert_eq!(NetworkPreset::from_name("Testnet").unwrap().chain_id, "xion-testnet-2");
        assert_eq!(NetworkPreset::from_name("mainnet").unwrap().chain_id, "xion-mainnet-1");
        assert!(NetworkPreset::from_name("devnet").is_none());
    }

    #[test]
    fn test_explorer_url() {
        let url = NetworkPreset::testnet().explorer_tx_url("ABCDEF", 1234);
        assert_eq!(url, "https://www.mintscan.io/xion-testnet/tx/ABCDEF?height=1234");
    }

    #[test]
    fn test_infer_network() {
        assert_eq!(infer_network_from_url(TESTNET_LCD), Some("testnet"));
        assert_eq!(infer_network_from_url(MAINNET_LCD), Some("mainnet"));
        assert_eq!(infer_network_from_url("http://localhost:1317"), None);
    }

    #[test]
    fn test_resolve_lcd_endpoint() {
        let net = NetworkPreset::testnet();
        assert_eq!(resolve_lcd_endpoint(None, &net), TESTNET_LCD);
        assert_eq!(resolve_lcd_endpoint(Some("  "), &net), TESTNET_LCD);
        assert_eq!(
            resolve_lcd_endpoint(Some("http://localhost:1317/"), &net),
            "http://localhost:1317"
        );
    }
}
