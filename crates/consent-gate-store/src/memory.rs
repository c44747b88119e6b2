//! In-memory implementation of the consent store and audit log.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use consent_gate_core::{AuditEntry, AuditRecord, SubjectId};

use crate::error::{Result, StoreError};
use crate::traits::{AuditLog, ConsentStore};

/// In-memory store implementing [`ConsentStore`] and [`AuditLog`].
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
pub struct MemoryStore {
    inner: RwLock<MemoryStoreInner>,
}

struct MemoryStoreInner {
    /// Consent flags by subject. Absent means consenting.
    consents: HashMap<String, bool>,

    /// Audit entries in append order.
    entries: Vec<AuditEntry>,

    /// Next audit id to assign.
    next_id: i64,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(MemoryStoreInner {
                consents: HashMap::new(),
                entries: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConsentStore for MemoryStore {
    async fn check_consent(&self, subject: &SubjectId) -> Result<bool> {
        let inner = self
            .inner
            .read()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {e}")))?;
        Ok(inner.consents.get(subject.as_str()).copied().unwrap_or(true))
    }

    async fn set_consent(&self, subject: &SubjectId, given: bool) -> Result<()> {
        let mut inner = self
            .inner
            .write()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {e}")))?;
        inner.consents.insert(subject.as_str().to_string(), given);
        Ok(())
    }
}

#[async_trait]
impl AuditLog for MemoryStore {
    async fn append(&self, record: AuditRecord) -> Result<AuditEntry> {
        let mut inner = self
            .inner
            .write()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {e}")))?;

        let entry = AuditEntry {
            id: inner.next_id,
            timestamp: now_millis(),
            subject_id: record.subject_id,
            action: record.action,
            requester: record.requester,
            status: record.status,
            details: record.details,
        };
        inner.next_id += 1;
        inner.entries.push(entry.clone());

        Ok(entry)
    }

    async fn recent(&self, limit: u32) -> Result<Vec<AuditEntry>> {
        let inner = self
            .inner
            .read()
            .map_err(|e| StoreError::Unavailable(format!("lock poisoned: {e}")))?;

        Ok(inner
            .entries
            .iter()
            .rev()
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as i64
}
