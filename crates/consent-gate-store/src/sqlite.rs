//! SQLite implementation of the consent store and audit log.
//!
//! This is the primary durable backend. It uses rusqlite with bundled
//! SQLite, wrapped in async via `tokio::spawn_blocking`, and backs both the
//! consent table and the audit trail in one database.

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use consent_gate_core::{AuditEntry, AuditRecord, SubjectId};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::{AuditLog, ConsentStore};

/// SQLite-based store implementing [`ConsentStore`] and [`AuditLog`].
///
/// Thread-safe via an internal mutex. All operations run on the blocking
/// thread pool to avoid stalling the async runtime.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open with startup retries.
    ///
    /// Infrastructure-level bootstrap: retries opening and migrating up to
    /// `attempts` times with a fixed `delay` between tries. Per-request
    /// operations never retry; connectivity failures there surface as errors.
    pub async fn open_with_retry(
        path: impl Into<PathBuf>,
        attempts: u32,
        delay: Duration,
    ) -> Result<Self> {
        let path = path.into();

        for attempt in 1..=attempts {
            let path = path.clone();
            let opened = tokio::task::spawn_blocking(move || Self::open(path))
                .await
                .map_err(|e| StoreError::Unavailable(format!("blocking task failed: {e}")))?;

            match opened {
                Ok(store) => {
                    tracing::info!(attempt, "consent database ready");
                    return Ok(store);
                }
                Err(e) if attempt < attempts => {
                    tracing::warn!(attempt, error = %e, "consent database not ready, retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }

        Err(StoreError::Unavailable("no attempts configured".into()))
    }

    /// Run a closure against the connection on the blocking pool.
    async fn blocking<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|e| StoreError::Unavailable(format!("connection mutex poisoned: {e}")))?;
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::Unavailable(format!("blocking task failed: {e}")))?
    }
}

// Helper to convert a row to an AuditEntry.
fn row_to_entry(row: &rusqlite::Row<'_>) -> rusqlite::Result<AuditEntry> {
    let action_label: String = row.get("action")?;
    let status_label: String = row.get("status")?;

    let parse_err = |idx: usize, name: &str| {
        rusqlite::Error::InvalidColumnType(idx, name.into(), rusqlite::types::Type::Text)
    };

    Ok(AuditEntry {
        id: row.get("id")?,
        timestamp: row.get("created_at")?,
        subject_id: row.get("subject_id")?,
        action: action_label.parse().map_err(|_| parse_err(2, "action"))?,
        requester: row.get("requester")?,
        status: status_label.parse().map_err(|_| parse_err(4, "status"))?,
        details: row.get("details")?,
    })
}

#[async_trait]
impl ConsentStore for SqliteStore {
    async fn check_consent(&self, subject: &SubjectId) -> Result<bool> {
        let subject = subject.as_str().to_string();

        self.blocking(move |conn| {
            let stored: Option<i64> = conn
                .query_row(
                    "SELECT consent_given FROM consents WHERE subject_id = ?1",
                    params![subject],
                    |row| row.get(0),
                )
                .optional()?;

            // Absence of a record defaults to consenting. Storage failure
            // above does not.
            Ok(stored.map_or(true, |flag| flag != 0))
        })
        .await
    }

    async fn set_consent(&self, subject: &SubjectId, given: bool) -> Result<()> {
        let subject = subject.as_str().to_string();

        self.blocking(move |conn| {
            conn.execute(
                "INSERT INTO consents (subject_id, consent_given, updated_at)
                 VALUES (?1, ?2, ?3)
                 ON CONFLICT(subject_id) DO UPDATE SET
                    consent_given = excluded.consent_given,
                    updated_at = excluded.updated_at",
                params![subject, given as i64, now_millis()],
            )?;
            Ok(())
        })
        .await
    }
}

#[async_trait]
impl AuditLog for SqliteStore {
    async fn append(&self, record: AuditRecord) -> Result<AuditEntry> {
        self.blocking(move |conn| {
            let created_at = now_millis();

            conn.execute(
                "INSERT INTO audit_log (subject_id, action, requester, status, details, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    record.subject_id,
                    record.action.as_str(),
                    record.requester,
                    record.status.as_str(),
                    record.details,
                    created_at,
                ],
            )?;

            Ok(AuditEntry {
                id: conn.last_insert_rowid(),
                timestamp: created_at,
                subject_id: record.subject_id,
                action: record.action,
                requester: record.requester,
                status: record.status,
                details: record.details,
            })
        })
        .await
    }

    async fn recent(&self, limit: u32) -> Result<Vec<AuditEntry>> {
        self.blocking(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT id, subject_id, action, requester, status, details, created_at
                 FROM audit_log ORDER BY id DESC LIMIT ?1",
            )?;

            let entries = stmt
                .query_map(params![limit], row_to_entry)?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(entries)
        })
        .await
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
