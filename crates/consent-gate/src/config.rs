//! Gateway configuration.
//!
//! Key material must be provisioned explicitly: a missing or malformed
//! encryption key fails startup instead of falling back to a generated key,
//! since an ephemeral key would strand every previously stored ciphertext
//! after a restart.

use consent_gate_core::{CoreError, EncryptionKey};
use thiserror::Error;

/// Environment variable holding the 64-hex-char encryption key.
pub const ENCRYPTION_KEY_VAR: &str = "CONSENT_GATE_ENCRYPTION_KEY";

/// Environment variable holding the bearer token callers must present.
pub const API_TOKEN_VAR: &str = "CONSENT_GATE_API_TOKEN";

/// Environment variable bounding upload payload size in bytes (optional).
pub const MAX_PAYLOAD_VAR: &str = "CONSENT_GATE_MAX_PAYLOAD";

/// Default upload bound: 16 MiB.
pub const DEFAULT_MAX_PAYLOAD: usize = 16 * 1024 * 1024;

/// Errors raised while loading configuration. All are startup-fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required variable is absent.
    #[error("missing required configuration: {0}")]
    Missing(&'static str),

    /// Key material present but unusable.
    #[error("bad encryption key: {0}")]
    BadKey(#[from] CoreError),

    /// Payload bound present but not a positive integer.
    #[error("bad payload bound: {0}")]
    BadPayloadBound(String),
}

/// Configuration for the gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// The single symmetric key all documents are encrypted under.
    pub encryption_key: EncryptionKey,
    /// Bearer secret callers must present.
    pub api_token: String,
    /// Upper bound on upload payload size in bytes.
    pub max_payload_bytes: usize,
}

impl GatewayConfig {
    /// Build a config from explicit values.
    pub fn new(encryption_key: EncryptionKey, api_token: impl Into<String>) -> Self {
        Self {
            encryption_key,
            api_token: api_token.into(),
            max_payload_bytes: DEFAULT_MAX_PAYLOAD,
        }
    }

    /// Override the upload payload bound.
    pub fn with_max_payload(mut self, bytes: usize) -> Self {
        self.max_payload_bytes = bytes;
        self
    }

    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(
            std::env::var(ENCRYPTION_KEY_VAR).ok().as_deref(),
            std::env::var(API_TOKEN_VAR).ok().as_deref(),
            std::env::var(MAX_PAYLOAD_VAR).ok().as_deref(),
        )
    }

    /// Build from optional raw values. Split out from [`Self::from_env`] so
    /// validation is testable without touching process-global state.
    pub fn from_vars(
        key: Option<&str>,
        token: Option<&str>,
        max_payload: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let key = key.ok_or(ConfigError::Missing(ENCRYPTION_KEY_VAR))?;
        let encryption_key = EncryptionKey::from_hex(key)?;

        let api_token = token
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::Missing(API_TOKEN_VAR))?
            .to_string();

        let max_payload_bytes = match max_payload {
            None => DEFAULT_MAX_PAYLOAD,
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|&n| n > 0)
                .ok_or_else(|| ConfigError::BadPayloadBound(raw.to_string()))?,
        };

        Ok(Self {
            encryption_key,
            api_token,
            max_payload_bytes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY_HEX: &str = "4242424242424242424242424242424242424242424242424242424242424242";

    #[test]
    fn test_full_config_parses() {
        let config =
            GatewayConfig::from_vars(Some(KEY_HEX), Some("secure-token-123"), Some("1024")).unwrap();
        assert_eq!(config.api_token, "secure-token-123");
        assert_eq!(config.max_payload_bytes, 1024);
        assert_eq!(config.encryption_key.as_bytes(), &[0x42; 32]);
    }

    #[test]
    fn test_missing_key_is_fatal() {
        // No generated fallback: a restart with a fresh key would make all
        // stored ciphertext unrecoverable.
        let err = GatewayConfig::from_vars(None, Some("t"), None).unwrap_err();
        assert!(matches!(err, ConfigError::Missing(ENCRYPTION_KEY_VAR)));
    }

    #[test]
    fn test_malformed_key_is_fatal() {
        let err = GatewayConfig::from_vars(Some("not-hex"), Some("t"), None).unwrap_err();
        assert!(matches!(err, ConfigError::BadKey(_)));
    }

    #[test]
    fn test_missing_or_empty_token_is_fatal() {
        assert!(GatewayConfig::from_vars(Some(KEY_HEX), None, None).is_err());
        assert!(GatewayConfig::from_vars(Some(KEY_HEX), Some(""), None).is_err());
    }

    #[test]
    fn test_payload_bound_defaults_and_rejects_garbage() {
        let config = GatewayConfig::from_vars(Some(KEY_HEX), Some("t"), None).unwrap();
        assert_eq!(config.max_payload_bytes, DEFAULT_MAX_PAYLOAD);

        assert!(GatewayConfig::from_vars(Some(KEY_HEX), Some("t"), Some("0")).is_err());
        assert!(GatewayConfig::from_vars(Some(KEY_HEX), Some("t"), Some("lots")).is_err());
    }
}
