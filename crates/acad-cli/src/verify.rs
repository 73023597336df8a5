//! `acad verify`

use acad_core::VerificationVerdict;
use acad_credential::VerifyOutcome;
use anyhow::{bail, Result};
use clap::Args;

use crate::context::AppContext;

/// Verify arguments.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Credential token id.
    pub token_id: String,

    /// Address that claims to own the credential.
    #[arg(long)]
    pub owner: Option<String>,

    /// Print the verdict as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute `acad verify`. Exit code 0 when valid, 2 otherwise.
pub async fn run_verify(args: &VerifyArgs) -> Result<u8> {
    let mut ctx = AppContext::from_env()?;
    ctx.connect().await?;

    let verdict = match ctx.service.verify(&args.token_id, args.owner.as_deref()).await {
        VerifyOutcome::Verdict(v) => v,
        VerifyOutcome::ConnectRequired => bail!("connect a wallet to verify credentials"),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&verdict)?);
    } else {
        print_verdict(&args.token_id, &verdict);
    }
    Ok(if verdict.is_valid() { 0 } else { 2 })
}

fn print_verdict(token_id: &str, verdict: &VerificationVerdict) {
    let Some(metadata) = &verdict.metadata else {
        if verdict.current_owner.is_empty() {
            println!("Credential {token_id}: INVALID (not found)");
        } else {
            println!("Credential {token_id}: INVALID (metadata unavailable)");
            println!("  owner:    {}", verdict.current_owner);
            println!("  metadata: {}", verdict.source_reference);
        }
        return;
    };

    let status = if verdict.trusted { "VALID" } else { "INVALID (ownership not confirmed)" };
    println!("Credential {token_id}: {status}");
    println!("  owner:      {}", verdict.current_owner);
    println!("  name:       {}", metadata.name);
    println!("  recipient:  {}", metadata.recipient);
    println!("  issuer:     {}", metadata.issuer);
    println!("  issued:     {}", metadata.issue_date);
    if let Some(major) = &metadata.major {
        println!("  major:      {major}");
    }
    if let Some(gpa) = &metadata.gpa {
        println!("  gpa:        {gpa}");
    }
    if let Some(date) = &metadata.graduation_date {
        println!("  graduated:  {date}");
    }
    if let Some(transcript) = metadata.attachment() {
        println!("  transcript: {transcript}");
    }
    println!("  metadata:   {}", verdict.source_reference);
    if !verdict.ownership_checked {
        println!("  (ownership not asserted; pass --owner to check it)");
    }
}
