//! `acad issue`

use std::path::PathBuf;

use acad_core::MintResult;
use acad_credential::{IssueRequest, LinkConfig};
use acad_registry::ExplorerLinks;
use acad_storage::{Attachment, PinningCredentials};
use acad_wallet::blockdag_testnet;
use anyhow::{bail, Context, Result};
use clap::Args;

use crate::context::AppContext;

/// File types accepted as transcript attachments.
const ATTACHMENT_EXTENSIONS: &[&str] = &["pdf", "jpg", "jpeg", "png"];

/// Issue arguments.
#[derive(Args, Debug)]
pub struct IssueArgs {
    /// Recipient wallet address (0x + 40 hex digits).
    #[arg(long)]
    pub recipient: String,

    /// Recipient's full name.
    #[arg(long)]
    pub name: String,

    /// Degree type, e.g. "Bachelor of Science".
    #[arg(long)]
    pub degree: String,

    #[arg(long)]
    pub major: String,

    /// Grade metric as printed on the transcript.
    #[arg(long)]
    pub gpa: String,

    /// Graduation date (YYYY-MM-DD).
    #[arg(long)]
    pub graduation_date: String,

    #[arg(long, default_value = "")]
    pub description: String,

    /// Transcript or diploma file to attach (.pdf, .jpg, .jpeg or .png).
    #[arg(long)]
    pub transcript: Option<PathBuf>,

    /// Print the result as JSON.
    #[arg(long)]
    pub json: bool,
}

impl IssueArgs {
    fn to_request(&self) -> Result<IssueRequest> {
        let attachment = match &self.transcript {
            Some(path) => {
                let accepted = path
                    .extension()
                    .and_then(|e| e.to_str())
                    .is_some_and(|e| ATTACHMENT_EXTENSIONS.iter().any(|a| a.eq_ignore_ascii_case(e)));
                if !accepted {
                    bail!(
                        "unsupported transcript file {}: expected one of .pdf, .jpg, .jpeg, .png",
                        path.display()
                    );
                }
                let bytes = std::fs::read(path)
                    .with_context(|| format!("failed to read transcript: {}", path.display()))?;
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "transcript".to_string());
                Some(Attachment::new(file_name, bytes))
            }
            None => None,
        };
        let credentials = PinningCredentials::from_env();
        if credentials.is_none() {
            tracing::warn!(
                "PINATA_API_KEY/PINATA_SECRET_KEY not set, metadata goes to the local fallback store \
                 (set ACAD_LOCAL_STORE_PATH to keep it for later commands)"
            );
        }
        Ok(IssueRequest {
            recipient_address: self.recipient.clone(),
            recipient_name: self.name.clone(),
            degree_type: self.degree.clone(),
            major: self.major.clone(),
            gpa: self.gpa.clone(),
            graduation_date: self.graduation_date.clone(),
            description: self.description.clone(),
            attachment,
            credentials,
        })
    }
}

/// Execute `acad issue`.
pub async fn run_issue(args: &IssueArgs) -> Result<u8> {
    let request = args.to_request()?;
    let mut ctx = AppContext::from_env()?;
    ctx.connect().await?;

    let result = ctx.service.issue(&request).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(0);
    }

    let explorer = ExplorerLinks::for_chain(&blockdag_testnet(), ctx.credential_nft.clone());
    print_result(&result, &ctx.service.verification_link(&result.assigned_identifier()), explorer.as_ref());
    Ok(0)
}

fn print_result(result: &MintResult, link: &str, explorer: Option<&ExplorerLinks>) {
    let id = result.assigned_identifier();
    println!("Credential issued");
    println!("  token id:     {id}");
    if !result.is_confirmed() {
        println!("                (no CredentialMinted event in the receipt; check the transaction)");
    }
    println!("  transaction:  {}", result.transaction_hash);
    println!("  metadata:     {}", result.metadata_reference);
    println!("  verify at:    {link}");
    println!("  QR file name: {}", LinkConfig::qr_file_name(&id));
    if let Some(explorer) = explorer {
        println!("  explorer:     {}", explorer.tx_url(&result.transaction_hash));
        if let Some(token_id) = &result.token_id {
            println!("  token page:   {}", explorer.token_url(token_id));
        }
    }
}
