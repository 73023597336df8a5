//! `acad explorer`

use acad_core::TokenId;
use acad_registry::{ExplorerLinks, RegistryConfig};
use acad_wallet::blockdag_testnet;
use anyhow::{Context, Result};
use clap::{Args, Subcommand};

#[derive(Args, Debug)]
pub struct ExplorerArgs {
    #[command(subcommand)]
    pub command: ExplorerCommand,
}

#[derive(Subcommand, Debug)]
pub enum ExplorerCommand {
    /// Transaction page.
    Tx { hash: String },
    /// Token page on the credential NFT contract.
    Token { token_id: String },
}

/// Execute `acad explorer`.
pub fn run_explorer(args: &ExplorerArgs) -> Result<u8> {
    let registry = RegistryConfig::from_env()?;
    let links = ExplorerLinks::for_chain(&blockdag_testnet(), registry.credential_nft)
        .context("chain descriptor lists no block explorer")?;
    match &args.command {
        ExplorerCommand::Tx { hash } => println!("{}", links.tx_url(hash)),
        ExplorerCommand::Token { token_id } => {
            let token_id = TokenId::parse(token_id).context("invalid token id")?;
            println!("{}", links.token_url(&token_id));
        }
    }
    Ok(0)
}
