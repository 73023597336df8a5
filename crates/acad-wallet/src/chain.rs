//! # Target Chain
//!
//! The application runs against exactly one chain. Its descriptor is what
//! a wallet needs to register the chain when it does not know it yet.

use serde::{Deserialize, Serialize};

/// Error code a wallet returns from `wallet_switchEthereumChain` when the
/// requested chain has not been added.
pub const UNKNOWN_CHAIN_ERROR_CODE: i64 = 4902;

/// Native gas currency of a chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeCurrency {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
}

/// Chain descriptor in the shape of `wallet_addEthereumChain` parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainDescriptor {
    /// Hex chain id with `0x` prefix.
    pub chain_id: String,
    pub chain_name: String,
    pub rpc_urls: Vec<String>,
    pub native_currency: NativeCurrency,
    pub block_explorer_urls: Vec<String>,
}

impl ChainDescriptor {
    /// First explorer URL, without a trailing slash.
    pub fn explorer_url(&self) -> Option<&str> {
        self.block_explorer_urls
            .first()
            .map(|u| u.trim_end_matches('/'))
    }

    /// Numeric chain id, if the hex form is well-formed.
    pub fn chain_id_u64(&self) -> Option<u64> {
        let hex = self.chain_id.strip_prefix("0x")?;
        u64::from_str_radix(hex, 16).ok()
    }
}

/// Compare two hex chain ids as wallets report them (case and
/// leading-zero insensitive).
pub fn same_chain_id(a: &str, b: &str) -> bool {
    let parse = |s: &str| {
        s.strip_prefix("0x")
            .and_then(|h| u64::from_str_radix(h, 16).ok())
    };
    match (parse(a), parse(b)) {
        (Some(x), Some(y)) => x == y,
        _ => a.eq_ignore_ascii_case(b),
    }
}

/// BlockDAG Awakening Testnet (chain id 1043).
pub fn blockdag_testnet() -> ChainDescriptor {
    ChainDescriptor {
        chain_id: "0x413".to_string(),
        chain_name: "BlockDAG Awakening Testnet".to_string(),
        rpc_urls: vec!["https://rpc-testnet.blockdag.network".to_string()],
        native_currency: NativeCurrency {
            name: "BDAG".to_string(),
            symbol: "BDAG".to_string(),
            decimals: 18,
        },
        block_explorer_urls: vec!["https://explorer-testnet.blockdag.network".to_string()],
    }
}
