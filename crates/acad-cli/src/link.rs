//! `acad link`

use acad_core::TokenId;
use acad_credential::LinkConfig;
use anyhow::{Context, Result};
use clap::Args;

#[derive(Args, Debug)]
pub struct LinkArgs {
    /// Credential token id.
    pub token_id: String,
}

/// Execute `acad link`. Needs no wallet.
pub fn run_link(args: &LinkArgs) -> Result<u8> {
    let token_id = TokenId::parse(&args.token_id).context("invalid token id")?;
    let links = LinkConfig::from_env()?;
    println!("{}", links.verification_link(token_id.as_str()));
    println!("{}", LinkConfig::qr_file_name(token_id.as_str()));
    Ok(0)
}
