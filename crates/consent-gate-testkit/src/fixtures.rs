//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use bytes::Bytes;
use consent_gate::{Credential, Gateway, GatewayConfig, UploadOutcome};
use consent_gate_core::{EncryptionKey, ObjectName, SubjectId};
use consent_gate_store::{MemoryBlobStore, MemoryStore};

/// Fixed key every fixture gateway encrypts under.
pub const TEST_KEY: [u8; 32] = [0x42; 32];

/// Bearer token every fixture credential presents.
pub const TEST_TOKEN: &str = "secure-token-123";

/// A test fixture with an in-memory gateway.
pub struct TestFixture {
    pub gateway: Gateway<MemoryStore, MemoryBlobStore>,
}

impl TestFixture {
    /// Create a gateway over fresh in-memory stores with the fixture key,
    /// token, and default payload bound.
    pub fn new() -> Self {
        Self::with_max_payload(None)
    }

    /// Create a fixture with a custom upload payload bound.
    pub fn with_max_payload(max_payload_bytes: Option<usize>) -> Self {
        let mut config = GatewayConfig::new(EncryptionKey::from_bytes(TEST_KEY), TEST_TOKEN);
        if let Some(bytes) = max_payload_bytes {
            config = config.with_max_payload(bytes);
        }
        Self {
            gateway: Gateway::new(config, MemoryStore::new(), MemoryBlobStore::new()),
        }
    }

    /// A credential the fixture gateway accepts.
    pub fn credential(&self) -> Credential {
        Credential::new("research-ai", TEST_TOKEN)
    }

    /// A credential with the wrong bearer token.
    pub fn bad_credential(&self) -> Credential {
        Credential::new("research-ai", "wrong-token")
    }

    /// Parse a subject id, panicking on invalid fixtures.
    pub fn subject(&self, id: &str) -> SubjectId {
        SubjectId::new(id).expect("fixture subject id must be valid")
    }

    /// Parse an object name, panicking on invalid fixtures.
    pub fn object(&self, name: &str) -> ObjectName {
        ObjectName::new(name).expect("fixture object name must be valid")
    }

    /// Upload a document through the gateway, panicking on failure.
    pub async fn upload(&self, subject: &str, name: &str, payload: &[u8]) -> UploadOutcome {
        self.gateway
            .upload(
                &self.subject(subject),
                &self.object(name),
                Bytes::copy_from_slice(payload),
                &self.credential(),
            )
            .await
            .expect("fixture upload must succeed")
    }

    /// Revoke a subject's consent, panicking on failure.
    pub async fn revoke(&self, subject: &str) {
        self.gateway
            .revoke(&self.subject(subject), &self.credential())
            .await
            .expect("fixture revoke must succeed")
    }

    /// Restore a subject's consent, panicking on failure.
    pub async fn grant(&self, subject: &str) {
        self.gateway
            .grant(&self.subject(subject), &self.credential())
            .await
            .expect("fixture grant must succeed")
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}
