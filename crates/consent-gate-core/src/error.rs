//! Error types for the core module.

use thiserror::Error;

/// Errors from identifier validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Subject identifier is empty or contains a path separator.
    #[error("invalid subject id: {0}")]
    InvalidSubjectId(String),

    /// Object name is empty or escapes its namespace.
    #[error("invalid object name: {0}")]
    InvalidObjectName(String),

    /// Key material is not 32 bytes of valid hex.
    #[error("invalid key material: {0}")]
    InvalidKeyMaterial(String),
}

/// Errors from the cipher service.
///
/// The two variants are deliberately coarse: callers that surface errors to
/// external parties must not reveal whether a failure came from a wrong key
/// or from corrupted ciphertext.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CipherError {
    /// Input is not well-formed ciphertext (too short to hold nonce + tag).
    #[error("malformed ciphertext: {0}")]
    Format(String),

    /// Authentication failed: wrong key, tampered or corrupted ciphertext.
    #[error("ciphertext failed authentication")]
    Integrity,
}

/// Result type for core operations.
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
