//! Storage traits: the abstract interfaces the gateway orchestrates.
//!
//! All methods are async so that SQLite (via `spawn_blocking`) and genuinely
//! async backends can sit behind the same seams. The gateway holds no
//! cross-request locks; every mutation here is a single-key upsert or a log
//! append, assumed atomic at the storage layer.

use async_trait::async_trait;
use bytes::Bytes;

use consent_gate_core::{AuditEntry, AuditRecord, SubjectId};

use crate::error::Result;

/// Durable mapping from subject to consent flag.
///
/// # Design Notes
///
/// - **Default-allow**: absence of a record means the subject consents. This
///   is a deliberate, auditable bootstrap policy; implementations must not
///   flip it to deny-by-default.
/// - Only storage unavailability is an error; a missing record never is.
#[async_trait]
pub trait ConsentStore: Send + Sync {
    /// Returns `false` only when a record exists with the flag cleared.
    async fn check_consent(&self, subject: &SubjectId) -> Result<bool>;

    /// Idempotent upsert of the consent flag.
    async fn set_consent(&self, subject: &SubjectId, given: bool) -> Result<()>;
}

/// Append-only, time-ordered record of gateway decisions.
#[async_trait]
pub trait AuditLog: Send + Sync {
    /// Persist a record, assigning its `id` and `timestamp`.
    ///
    /// The store, not the caller, stamps the entry; callers cannot forge
    /// creation times.
    async fn append(&self, record: AuditRecord) -> Result<AuditEntry>;

    /// Most recent entries first, at most `limit` of them.
    async fn recent(&self, limit: u32) -> Result<Vec<AuditEntry>>;
}

/// Opaque byte payloads keyed by string.
///
/// Keys follow the `subject_id/object_name` convention, which gives natural
/// per-subject grouping without the store understanding subjects. The store
/// only ever sees ciphertext.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store or overwrite bytes under a key. Idempotent.
    async fn put(&self, key: &str, bytes: Bytes) -> Result<()>;

    /// Fetch bytes, failing with [`StoreError::BlobNotFound`] on a missing key.
    ///
    /// [`StoreError::BlobNotFound`]: crate::error::StoreError::BlobNotFound
    async fn get(&self, key: &str) -> Result<Bytes>;
}
