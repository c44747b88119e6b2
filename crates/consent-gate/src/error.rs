//! Error taxonomy for the gateway.
//!
//! Caller-visible errors carry no internal detail: raw driver messages and
//! cipher failure modes go to the audit trail and operational logs only.
//! In particular, a wrong key and corrupted ciphertext are indistinguishable
//! to the caller, so decryption cannot be used as an integrity oracle.

use consent_gate_core::{CipherError, CoreError};
use consent_gate_store::StoreError;
use thiserror::Error;

/// Errors returned to gateway callers.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Credential missing or wrong. Rejected before any side effect.
    #[error("unauthorized")]
    Unauthorized,

    /// Consent revoked by the subject. Rejected after audit logging.
    #[error("access revoked by subject")]
    Forbidden,

    /// Object absent from the blob store.
    #[error("object not found")]
    NotFound,

    /// Upload payload exceeds the configured bound.
    #[error("payload exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// Malformed subject or object identifier.
    #[error("invalid request: {0}")]
    InvalidRequest(#[from] CoreError),

    /// A storage collaborator is unreachable. Fatal for this request;
    /// retries happen only at the infrastructure-connection level.
    #[error("storage unavailable")]
    StorageUnavailable,

    /// Catch-all for unexpected failures, always paired with an audit entry
    /// where the flow had already started.
    #[error("internal error")]
    Server,
}

impl From<StoreError> for GatewayError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::BlobNotFound(_) => GatewayError::NotFound,
            StoreError::InvalidKey(_) => GatewayError::Server,
            StoreError::Database(_)
            | StoreError::Io(_)
            | StoreError::Migration(_)
            | StoreError::Unavailable(_) => GatewayError::StorageUnavailable,
        }
    }
}

impl From<CipherError> for GatewayError {
    fn from(_: CipherError) -> Self {
        // Both format and integrity failures collapse to an opaque error.
        GatewayError::Server
    }
}

/// Result type for gateway operations.
pub type Result<T> = std::result::Result<T, GatewayError>;
