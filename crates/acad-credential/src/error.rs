//! Issuance error types.

use acad_registry::RegistryError;

/// Errors that stop an issuance flow.
#[derive(Debug, thiserror::Error)]
pub enum IssueError {
    /// No connected wallet session.
    #[error("wallet not connected")]
    NotConnected,

    /// The account is not on the issuer authorization list, or the check
    /// could not be completed. Terminal until authorization is granted out
    /// of band.
    #[error("account {account} is not an authorized issuer")]
    NotAuthorized { account: String },

    /// The request failed local validation. Nothing was published.
    #[error("invalid {field}: {reason}")]
    InvalidRequest { field: &'static str, reason: String },

    /// The mint transaction failed. Revert reasons are shown verbatim.
    #[error("{0}")]
    Mint(#[source] RegistryError),
}
