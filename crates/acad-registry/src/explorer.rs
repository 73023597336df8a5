//! Block explorer links for transactions and minted tokens.

use acad_core::{Address, TokenId};
use acad_wallet::ChainDescriptor;

/// Builds explorer URLs for one chain and credential NFT contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorerLinks {
    base: String,
    credential_nft: Address,
}

impl ExplorerLinks {
    pub fn new(explorer_base: &str, credential_nft: Address) -> Self {
        Self {
            base: explorer_base.trim_end_matches('/').to_string(),
            credential_nft,
        }
    }

    /// Links for the chain's first explorer. `None` if it lists none.
    pub fn for_chain(chain: &ChainDescriptor, credential_nft: Address) -> Option<Self> {
        chain.explorer_url().map(|base| Self::new(base, credential_nft))
    }

    /// `<explorer>/tx/<hash>`
    pub fn tx_url(&self, tx_hash: &str) -> String {
        format!("{}/tx/{}", self.base, tx_hash)
    }

    /// `<explorer>/token/<nft>?a=<tokenId>`
    pub fn token_url(&self, token_id: &TokenId) -> String {
        format!("{}/token/{}?a={}", self.base, self.credential_nft, token_id)
    }
}
