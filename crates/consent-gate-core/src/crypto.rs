//! Authenticated encryption for stored documents.
//!
//! Wraps ChaCha20-Poly1305 under a single 256-bit key. Every encryption
//! draws a fresh random 96-bit nonce, prepended to the ciphertext, so the
//! same plaintext encrypts to different bytes on every call. Decryption
//! refuses to return anything that fails authentication.

use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use rand::RngCore;

use crate::error::{CipherError, CoreError};

/// Length in bytes of the nonce prepended to every ciphertext.
pub const NONCE_LEN: usize = 12;

/// Length in bytes of the Poly1305 authentication tag.
pub const TAG_LEN: usize = 16;

/// A 256-bit symmetric key for document encryption.
///
/// Provisioned once at process start; there is no generated fallback, since
/// an ephemeral key would make all previously stored ciphertext unrecoverable
/// after a restart.
#[derive(Clone)]
pub struct EncryptionKey([u8; 32]);

impl EncryptionKey {
    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Parse from a 64-character hex string.
    pub fn from_hex(s: &str) -> Result<Self, CoreError> {
        let bytes = hex::decode(s.trim())
            .map_err(|e| CoreError::InvalidKeyMaterial(e.to_string()))?;
        let arr: [u8; 32] = bytes
            .try_into()
            .map_err(|_| CoreError::InvalidKeyMaterial("expected 32 bytes".into()))?;
        Ok(Self(arr))
    }

    /// Generate a random key.
    ///
    /// Intended for tests and for operator tooling that mints a key once and
    /// stores it externally; the gateway itself never generates keys.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Get the raw bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl std::fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material.
        write!(f, "EncryptionKey(..)")
    }
}

/// The cipher service: pure transformation over byte buffers, no I/O.
#[derive(Clone)]
pub struct DocumentCipher {
    key: EncryptionKey,
}

impl DocumentCipher {
    /// Create a cipher over the given key.
    pub fn new(key: EncryptionKey) -> Self {
        Self { key }
    }

    /// Encrypt a plaintext payload.
    ///
    /// Output layout: `nonce(12) || aead_ciphertext`. Non-deterministic by
    /// construction; callers must not rely on ciphertext equality.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, CipherError> {
        let cipher = ChaCha20Poly1305::new_from_slice(self.key.as_bytes())
            .map_err(|e| CipherError::Format(e.to_string()))?;

        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let body = cipher
            .encrypt(nonce, plaintext)
            .map_err(|_| CipherError::Integrity)?;

        let mut out = Vec::with_capacity(NONCE_LEN + body.len());
        out.extend_from_slice(&nonce_bytes);
        out.extend_from_slice(&body);
        Ok(out)
    }

    /// Decrypt a payload produced by [`DocumentCipher::encrypt`].
    ///
    /// Fails with [`CipherError::Format`] when the input cannot hold a nonce
    /// and tag, and [`CipherError::Integrity`] when authentication fails.
    /// Never returns partially decrypted or unauthenticated data.
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, CipherError> {
        if ciphertext.len() < NONCE_LEN + TAG_LEN {
            return Err(CipherError::Format(format!(
                "ciphertext too short: {} bytes",
                ciphertext.len()
            )));
        }

        let cipher = ChaCha20Poly1305::new_from_slice(self.key.as_bytes())
            .map_err(|e| CipherError::Format(e.to_string()))?;

        let (nonce_bytes, body) = ciphertext.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);

        cipher.decrypt(nonce, body).map_err(|_| CipherError::Integrity)
    }
}

impl std::fmt::Debug for DocumentCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DocumentCipher(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn cipher() -> DocumentCipher {
        DocumentCipher::new(EncryptionKey::from_bytes([0x42; 32]))
    }

    #[test]
    fn test_roundtrip() {
        let cipher = cipher();
        let ciphertext = cipher.encrypt(b"hello").unwrap();
        assert_eq!(cipher.decrypt(&ciphertext).unwrap(), b"hello");
    }

    #[test]
    fn test_empty_payload_roundtrip() {
        let cipher = cipher();
        let ciphertext = cipher.encrypt(b"").unwrap();
        assert_eq!(ciphertext.len(), NONCE_LEN + TAG_LEN);
        assert_eq!(cipher.decrypt(&ciphertext).unwrap(), b"");
    }

    #[test]
    fn test_fresh_nonce_per_call() {
        let cipher = cipher();
        let c1 = cipher.encrypt(b"same plaintext").unwrap();
        let c2 = cipher.encrypt(b"same plaintext").unwrap();
        assert_ne!(c1, c2);
    }

    #[test]
    fn test_tamper_detected_on_every_byte() {
        let cipher = cipher();
        let ciphertext = cipher.encrypt(b"integrity matters").unwrap();

        for i in 0..ciphertext.len() {
            let mut tampered = ciphertext.clone();
            tampered[i] ^= 0x01;
            assert_eq!(
                cipher.decrypt(&tampered),
                Err(CipherError::Integrity),
                "flipping byte {} must fail authentication",
                i
            );
        }
    }

    #[test]
    fn test_truncated_input_is_format_error() {
        let cipher = cipher();
        let short = vec![0u8; NONCE_LEN + TAG_LEN - 1];
        assert!(matches!(cipher.decrypt(&short), Err(CipherError::Format(_))));
        assert!(matches!(cipher.decrypt(&[]), Err(CipherError::Format(_))));
    }

    #[test]
    fn test_wrong_key_fails_closed() {
        let ciphertext = cipher().encrypt(b"secret").unwrap();
        let other = DocumentCipher::new(EncryptionKey::from_bytes([0x43; 32]));
        assert_eq!(other.decrypt(&ciphertext), Err(CipherError::Integrity));
    }

    #[test]
    fn test_key_hex_roundtrip() {
        let key = EncryptionKey::generate();
        let hex = hex::encode(key.as_bytes());
        let parsed = EncryptionKey::from_hex(&hex).unwrap();
        assert_eq!(parsed.as_bytes(), key.as_bytes());
    }

    #[test]
    fn test_key_hex_rejects_bad_material() {
        assert!(EncryptionKey::from_hex("").is_err());
        assert!(EncryptionKey::from_hex("abcd").is_err());
        assert!(EncryptionKey::from_hex(&"zz".repeat(32)).is_err());
    }

    #[test]
    fn test_debug_never_prints_key() {
        let key = EncryptionKey::from_bytes([0xaa; 32]);
        assert!(!format!("{:?}", key).contains("aa"));
    }

    proptest! {
        #[test]
        fn test_roundtrip_any_payload(payload in prop::collection::vec(any::<u8>(), 0..4096)) {
            let cipher = cipher();
            let ciphertext = cipher.encrypt(&payload).unwrap();
            prop_assert_eq!(cipher.decrypt(&ciphertext).unwrap(), payload);
        }
    }
}
