//! # acad-cli: Credential Command-Line Interface
//!
//! ## Subcommands
//!
//! - `issue`: Publish metadata and mint a credential to a recipient
//! - `verify`: Look up a credential and report a trust verdict
//! - `authorized`: Check whether the connected wallet may issue
//! - `link`: Print the shareable verification link and QR file name
//! - `explorer`: Print block explorer links for a transaction or token
//!
//! ## Crate Policy
//!
//! - Argument parsing lives here; every decision is delegated to the
//!   library crates.
//! - Handlers return a process exit code; errors are reported by `main`.

pub mod authorized;
pub mod context;
pub mod explorer;
pub mod issue;
pub mod link;
pub mod verify;
