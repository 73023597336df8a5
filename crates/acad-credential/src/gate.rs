//! Issuer authorization check.

use acad_core::Address;
use acad_registry::CredentialRegistry;
use acad_wallet::Session;

/// Answers whether an account may mint. Fails closed.
#[derive(Debug, Clone, Copy, Default)]
pub struct IssuerGate;

impl IssuerGate {
    /// `false` unless the session is connected and the registry positively
    /// confirms `account`. Registry errors count as `false`.
    pub async fn is_authorized(
        &self,
        session: &Session,
        registry: &dyn CredentialRegistry,
        account: &Address,
    ) -> bool {
        if !session.is_connected() {
            return false;
        }
        match registry.is_authorized_issuer(account).await {
            Ok(authorized) => {
                tracing::debug!(%account, authorized, "issuer authorization checked");
                authorized
            }
            Err(e) => {
                tracing::warn!(%account, error = %e, "issuer authorization check failed, treating as unauthorized");
                false
            }
        }
    }
}
