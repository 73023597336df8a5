//! # acad CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use acad_cli::authorized::{run_authorized, AuthorizedArgs};
use acad_cli::explorer::{run_explorer, ExplorerArgs};
use acad_cli::issue::{run_issue, IssueArgs};
use acad_cli::link::{run_link, LinkArgs};
use acad_cli::verify::{run_verify, VerifyArgs};

/// Academic credentials on the BlockDAG testnet.
///
/// Issues credentials as on-chain tokens with content-addressed metadata
/// and verifies them by token id.
#[derive(Parser, Debug)]
#[command(name = "acad", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Issue a credential to a recipient.
    Issue(IssueArgs),

    /// Verify a credential by token id.
    Verify(VerifyArgs),

    /// Check whether the connected wallet is an authorized issuer.
    Authorized(AuthorizedArgs),

    /// Print the shareable verification link for a token id.
    Link(LinkArgs),

    /// Print block explorer links.
    Explorer(ExplorerArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    if cli.log_json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
    }

    tracing::debug!("acad CLI starting");

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            tracing::error!("failed to start async runtime: {e}");
            return ExitCode::from(1);
        }
    };

    let result = runtime.block_on(async {
        match cli.command {
            Commands::Issue(args) => run_issue(&args).await,
            Commands::Verify(args) => run_verify(&args).await,
            Commands::Authorized(args) => run_authorized(&args).await,
            Commands::Link(args) => run_link(&args),
            Commands::Explorer(args) => run_explorer(&args),
        }
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
