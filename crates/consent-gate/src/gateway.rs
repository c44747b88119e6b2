//! The gateway: authentication, consent evaluation, crypto around blob I/O,
//! and audit logging, bound into one request pipeline.
//!
//! Ordering invariants:
//!
//! - Credential verification happens before anything else; an unauthenticated
//!   caller has not established an identity worth logging against, so it
//!   produces no audit entry (applied consistently across all operations).
//! - Consent is evaluated strictly before any decrypted content is produced.
//!   A denied read never touches the blob store.
//! - Every flow that has started emits exactly one terminal audit entry on
//!   every exit path. The append itself is best-effort: its failure goes to
//!   the operational log and never fails the primary operation.
//!
//! The gateway is stateless between requests; it borrows the consent store,
//! blob store and audit log per request and holds no cross-request locks.
//! A revoke that commits after another request passed its consent check is
//! not retroactively enforced on that request - an accepted
//! eventual-consistency boundary of this design.

use std::sync::Arc;

use bytes::Bytes;

use consent_gate_core::{
    AuditAction, AuditEntry, AuditRecord, AuditStatus, DocumentCipher, ObjectName, SubjectId,
};
use consent_gate_store::{AuditLog, BlobStore, ConsentStore};

use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};

/// Caller identity plus the bearer secret proving it.
#[derive(Debug, Clone)]
pub struct Credential {
    requester: String,
    token: String,
}

impl Credential {
    /// Create a credential for a named requester.
    pub fn new(requester: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            requester: requester.into(),
            token: token.into(),
        }
    }

    /// The claimed caller identity, recorded in audit entries.
    pub fn requester(&self) -> &str {
        &self.requester
    }
}

/// Confirmation returned by a successful upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOutcome {
    /// Name the object was stored under.
    pub object_name: ObjectName,
    /// Plaintext payload size in bytes.
    pub payload_bytes: usize,
}

/// The access gateway.
///
/// Generic over one store backing both consent flags and the audit trail
/// (they share a database in every deployment of this system) and one blob
/// store holding ciphertext.
pub struct Gateway<S, B> {
    store: Arc<S>,
    blobs: Arc<B>,
    cipher: DocumentCipher,
    token_digest: blake3::Hash,
    max_payload_bytes: usize,
}

impl<S, B> Gateway<S, B>
where
    S: ConsentStore + AuditLog,
    B: BlobStore,
{
    /// Create a gateway over the given stores.
    pub fn new(config: GatewayConfig, store: S, blobs: B) -> Self {
        Self {
            store: Arc::new(store),
            blobs: Arc::new(blobs),
            cipher: DocumentCipher::new(config.encryption_key),
            token_digest: blake3::hash(config.api_token.as_bytes()),
            max_payload_bytes: config.max_payload_bytes,
        }
    }

    /// Verify the bearer credential.
    ///
    /// Compares blake3 digests rather than raw bytes so the comparison shape
    /// does not depend on where the secrets first differ.
    fn authenticate(&self, credential: &Credential) -> Result<()> {
        if blake3::hash(credential.token.as_bytes()) == self.token_digest {
            Ok(())
        } else {
            tracing::debug!(requester = %credential.requester, "credential rejected");
            Err(GatewayError::Unauthorized)
        }
    }

    /// Best-effort audit append.
    ///
    /// Attempted on every exit path of a started flow; its own failure is
    /// reported operationally and never propagates into the request result.
    async fn record(&self, record: AuditRecord) {
        if let Err(e) = self.store.append(record).await {
            tracing::warn!(error = %e, "audit append failed; primary operation unaffected");
        }
    }

    /// Store a document: encrypt, then write ciphertext to the blob store.
    pub async fn upload(
        &self,
        subject: &SubjectId,
        name: &ObjectName,
        payload: Bytes,
        credential: &Credential,
    ) -> Result<UploadOutcome> {
        self.authenticate(credential)?;

        self.record(AuditRecord::new(
            subject.as_str(),
            AuditAction::UploadAttempt,
            credential.requester(),
            AuditStatus::Pending,
            format!("object={}", name),
        ))
        .await;

        let payload_bytes = payload.len();
        match self.upload_inner(subject, name, payload).await {
            Ok(()) => {
                self.record(AuditRecord::new(
                    subject.as_str(),
                    AuditAction::UploadSuccess,
                    credential.requester(),
                    AuditStatus::Success,
                    format!("object={} size={}", name, payload_bytes),
                ))
                .await;
                tracing::info!(subject = %subject, object = %name, size = payload_bytes, "upload stored");
                Ok(UploadOutcome {
                    object_name: name.clone(),
                    payload_bytes,
                })
            }
            Err(e) => {
                self.record(AuditRecord::new(
                    subject.as_str(),
                    AuditAction::UploadError,
                    credential.requester(),
                    AuditStatus::Error,
                    format!("object={} error={}", name, e),
                ))
                .await;
                Err(e)
            }
        }
    }

    async fn upload_inner(
        &self,
        subject: &SubjectId,
        name: &ObjectName,
        payload: Bytes,
    ) -> Result<()> {
        if payload.len() > self.max_payload_bytes {
            return Err(GatewayError::PayloadTooLarge {
                limit: self.max_payload_bytes,
            });
        }

        let ciphertext = self.cipher.encrypt(&payload).map_err(|e| {
            tracing::error!(error = %e, "encryption failed");
            GatewayError::from(e)
        })?;

        self.blobs
            .put(&name.blob_key(subject), Bytes::from(ciphertext))
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "blob put failed");
                GatewayError::from(e)
            })?;

        Ok(())
    }

    /// Read a document: consent check, fetch, decrypt.
    ///
    /// The consent check always precedes blob access; a revoked subject's
    /// objects are never even fetched.
    pub async fn read(
        &self,
        subject: &SubjectId,
        name: &ObjectName,
        credential: &Credential,
    ) -> Result<Bytes> {
        self.authenticate(credential)?;

        let consented = match self.store.check_consent(subject).await {
            Ok(consented) => consented,
            Err(e) => {
                tracing::warn!(error = %e, "consent lookup failed");
                let mapped = GatewayError::from(e);
                self.record(AuditRecord::new(
                    subject.as_str(),
                    AuditAction::ReadError,
                    credential.requester(),
                    AuditStatus::Error,
                    format!("object={} error={}", name, mapped),
                ))
                .await;
                return Err(mapped);
            }
        };

        if !consented {
            self.record(AuditRecord::new(
                subject.as_str(),
                AuditAction::ReadDenied,
                credential.requester(),
                AuditStatus::Denied,
                format!("object={} consent revoked", name),
            ))
            .await;
            tracing::info!(subject = %subject, object = %name, "read denied by consent");
            return Err(GatewayError::Forbidden);
        }

        match self.read_inner(subject, name).await {
            Ok(plaintext) => {
                self.record(AuditRecord::new(
                    subject.as_str(),
                    AuditAction::ReadSuccess,
                    credential.requester(),
                    AuditStatus::Success,
                    format!("object={} size={}", name, plaintext.len()),
                ))
                .await;
                Ok(plaintext)
            }
            Err(e) => {
                self.record(AuditRecord::new(
                    subject.as_str(),
                    AuditAction::ReadError,
                    credential.requester(),
                    AuditStatus::Error,
                    format!("object={} error={}", name, e),
                ))
                .await;
                Err(e)
            }
        }
    }

    async fn read_inner(&self, subject: &SubjectId, name: &ObjectName) -> Result<Bytes> {
        let ciphertext = self
            .blobs
            .get(&name.blob_key(subject))
            .await
            .map_err(|e| {
                tracing::debug!(error = %e, "blob get failed");
                GatewayError::from(e)
            })?;

        let plaintext = self.cipher.decrypt(&ciphertext).map_err(|e| {
            // Full failure mode goes to the operational log only; the caller
            // sees an opaque error either way.
            tracing::error!(subject = %subject, object = %name, error = %e, "decryption failed");
            GatewayError::from(e)
        })?;

        Ok(Bytes::from(plaintext))
    }

    /// Revoke the subject's consent. Takes effect for every read that begins
    /// after the upsert commits.
    pub async fn revoke(&self, subject: &SubjectId, credential: &Credential) -> Result<()> {
        self.set_consent(subject, false, credential).await
    }

    /// Restore the subject's consent.
    pub async fn grant(&self, subject: &SubjectId, credential: &Credential) -> Result<()> {
        self.set_consent(subject, true, credential).await
    }

    async fn set_consent(
        &self,
        subject: &SubjectId,
        given: bool,
        credential: &Credential,
    ) -> Result<()> {
        self.authenticate(credential)?;

        let action = if given {
            AuditAction::GrantConsent
        } else {
            AuditAction::RevokeConsent
        };

        match self.store.set_consent(subject, given).await {
            Ok(()) => {
                self.record(AuditRecord::new(
                    subject.as_str(),
                    action,
                    credential.requester(),
                    AuditStatus::Success,
                    format!("consent_given={given}"),
                ))
                .await;
                tracing::info!(subject = %subject, consent_given = given, "consent updated");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "consent upsert failed");
                let mapped = GatewayError::from(e);
                self.record(AuditRecord::new(
                    subject.as_str(),
                    action,
                    credential.requester(),
                    AuditStatus::Error,
                    format!("error={mapped}"),
                ))
                .await;
                Err(mapped)
            }
        }
    }

    /// Most recent audit entries, newest first.
    pub async fn recent_audit(&self, limit: u32, credential: &Credential) -> Result<Vec<AuditEntry>> {
        self.authenticate(credential)?;

        self.store.recent(limit).await.map_err(|e| {
            tracing::warn!(error = %e, "audit query failed");
            GatewayError::from(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use consent_gate_store::{MemoryBlobStore, MemoryStore, StoreError};

    const TOKEN: &str = "secure-token-123";

    fn config() -> GatewayConfig {
        GatewayConfig::new(
            consent_gate_core::EncryptionKey::from_bytes([0x42; 32]),
            TOKEN,
        )
    }

    fn gateway() -> Gateway<MemoryStore, MemoryBlobStore> {
        Gateway::new(config(), MemoryStore::new(), MemoryBlobStore::new())
    }

    fn credential() -> Credential {
        Credential::new("research-ai", TOKEN)
    }

    fn subject() -> SubjectId {
        SubjectId::new("patient_12345").unwrap()
    }

    fn object() -> ObjectName {
        ObjectName::new("doc.txt").unwrap()
    }

    #[tokio::test]
    async fn test_bad_credential_rejected_without_audit() {
        let gateway = gateway();
        let bad = Credential::new("research-ai", "wrong-token");

        let err = gateway
            .read(&subject(), &object(), &bad)
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Unauthorized));

        let err = gateway
            .upload(&subject(), &object(), Bytes::from_static(b"x"), &bad)
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Unauthorized));

        let err = gateway.revoke(&subject(), &bad).await.unwrap_err();
        assert!(matches!(err, GatewayError::Unauthorized));

        assert!(matches!(
            gateway.recent_audit(10, &bad).await.unwrap_err(),
            GatewayError::Unauthorized
        ));

        // No identity was established, so nothing was logged.
        let entries = gateway.recent_audit(100, &credential()).await.unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    async fn test_oversized_payload_rejected_and_audited() {
        let gateway = Gateway::new(
            config().with_max_payload(4),
            MemoryStore::new(),
            MemoryBlobStore::new(),
        );

        let err = gateway
            .upload(
                &subject(),
                &object(),
                Bytes::from_static(b"way too big"),
                &credential(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::PayloadTooLarge { limit: 4 }));

        let entries = gateway.recent_audit(10, &credential()).await.unwrap();
        assert_eq!(entries[0].action, AuditAction::UploadError);
        assert_eq!(entries[1].action, AuditAction::UploadAttempt);
    }

    #[tokio::test]
    async fn test_upload_emits_attempt_then_success() {
        let gateway = gateway();

        let outcome = gateway
            .upload(&subject(), &object(), Bytes::from_static(b"hello"), &credential())
            .await
            .unwrap();
        assert_eq!(outcome.payload_bytes, 5);

        let entries = gateway.recent_audit(10, &credential()).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].action, AuditAction::UploadSuccess);
        assert_eq!(entries[0].status, AuditStatus::Success);
        assert!(entries[0].details.contains("size=5"));
        assert_eq!(entries[1].action, AuditAction::UploadAttempt);
        assert_eq!(entries[1].status, AuditStatus::Pending);
        assert_eq!(entries[0].requester, "research-ai");
    }

    /// Store whose audit appends always fail but whose consent flags work.
    struct BrokenAuditStore(MemoryStore);

    #[async_trait]
    impl ConsentStore for BrokenAuditStore {
        async fn check_consent(&self, subject: &SubjectId) -> consent_gate_store::Result<bool> {
            self.0.check_consent(subject).await
        }

        async fn set_consent(
            &self,
            subject: &SubjectId,
            given: bool,
        ) -> consent_gate_store::Result<()> {
            self.0.set_consent(subject, given).await
        }
    }

    #[async_trait]
    impl AuditLog for BrokenAuditStore {
        async fn append(
            &self,
            _record: consent_gate_core::AuditRecord,
        ) -> consent_gate_store::Result<consent_gate_core::AuditEntry> {
            Err(StoreError::Unavailable("audit log down".into()))
        }

        async fn recent(
            &self,
            limit: u32,
        ) -> consent_gate_store::Result<Vec<consent_gate_core::AuditEntry>> {
            self.0.recent(limit).await
        }
    }

    #[tokio::test]
    async fn test_audit_failure_does_not_fail_primary_operation() {
        let gateway = Gateway::new(
            config(),
            BrokenAuditStore(MemoryStore::new()),
            MemoryBlobStore::new(),
        );

        gateway
            .upload(&subject(), &object(), Bytes::from_static(b"hello"), &credential())
            .await
            .unwrap();
        let plaintext = gateway
            .read(&subject(), &object(), &credential())
            .await
            .unwrap();
        assert_eq!(plaintext, Bytes::from_static(b"hello"));

        gateway.revoke(&subject(), &credential()).await.unwrap();
        assert!(matches!(
            gateway.read(&subject(), &object(), &credential()).await,
            Err(GatewayError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn test_corrupted_blob_reads_as_opaque_server_error() {
        let store = MemoryStore::new();
        let blobs = MemoryBlobStore::new();
        // Not produced by the cipher: decrypt must fail closed.
        blobs
            .put("patient_12345/doc.txt", Bytes::from_static(&[0u8; 64]))
            .await
            .unwrap();

        let gateway = Gateway::new(config(), store, blobs);
        let err = gateway
            .read(&subject(), &object(), &credential())
            .await
            .unwrap_err();
        assert!(matches!(err, GatewayError::Server));

        let entries = gateway.recent_audit(10, &credential()).await.unwrap();
        assert_eq!(entries[0].action, AuditAction::ReadError);
    }
}
