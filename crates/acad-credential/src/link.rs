//! Shareable verification links.

use url::Url;

/// Origin of the development server.
pub const DEFAULT_APP_ORIGIN: &str = "http://localhost:5173";

/// Public origin of the verification page.
#[derive(Debug, Clone)]
pub struct LinkConfig {
    /// Default: `http://localhost:5173`
    pub app_origin: Url,
}

impl LinkConfig {
    /// Load from `ACAD_APP_ORIGIN`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw = std::env::var("ACAD_APP_ORIGIN").unwrap_or_else(|_| DEFAULT_APP_ORIGIN.to_string());
        Self::new(&raw).map_err(|e| match e {
            ConfigError::InvalidUrl(_, reason) => ConfigError::InvalidUrl("ACAD_APP_ORIGIN".to_string(), reason),
        })
    }

    pub fn new(origin: &str) -> Result<Self, ConfigError> {
        let app_origin =
            Url::parse(origin).map_err(|e| ConfigError::InvalidUrl(origin.to_string(), e.to_string()))?;
        Ok(Self { app_origin })
    }

    fn origin(&self) -> &str {
        self.app_origin.as_str().trim_end_matches('/')
    }

    /// `<origin>/verify/<identifier>`. Stable for a given identifier, so it
    /// can be embedded verbatim in a QR code.
    pub fn verification_link(&self, identifier: &str) -> String {
        format!("{}/verify/{}", self.origin(), identifier)
    }

    /// File name for a downloaded QR image of the verification link.
    pub fn qr_file_name(identifier: &str) -> String {
        format!("credential-{identifier}-qr.png")
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
}
