//! `acad authorized`

use anyhow::Result;
use clap::Args;

use crate::context::AppContext;

#[derive(Args, Debug)]
pub struct AuthorizedArgs {}

/// Execute `acad authorized`. Exit code 0 when the wallet account may
/// issue, 2 otherwise.
pub async fn run_authorized(_args: &AuthorizedArgs) -> Result<u8> {
    let mut ctx = AppContext::from_env()?;
    ctx.connect().await?;

    let account = ctx
        .service
        .current_session()
        .account()
        .map(ToString::to_string)
        .unwrap_or_default();
    if ctx.service.is_authorized().await {
        println!("{account} is an authorized issuer");
        Ok(0)
    } else {
        println!("{account} is not an authorized issuer");
        Ok(2)
    }
}
