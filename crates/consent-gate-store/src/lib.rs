//! # Consent Gate Store
//!
//! Storage abstraction for the consent gate. Provides trait-based interfaces
//! for the three collaborators the gateway borrows per request:
//!
//! - [`ConsentStore`] - per-subject consent flags (default-allow on absence)
//! - [`AuditLog`] - append-only access trail, ids and timestamps assigned here
//! - [`BlobStore`] - opaque ciphertext payloads keyed by string
//!
//! ## Implementations
//!
//! - [`SqliteStore`] - rusqlite (bundled) backing both consent flags and the
//!   audit trail, wrapped in async via `tokio::spawn_blocking`
//! - [`MemoryStore`] - same semantics, in memory, for tests
//! - [`FsBlobStore`] - one file per object under a root directory
//! - [`MemoryBlobStore`] - in-memory blob map for tests
//!
//! ## Design Notes
//!
//! - **Default-allow**: `check_consent` returns `true` for unknown subjects;
//!   only a stored `false` denies. Storage being unreachable is an error,
//!   never a silent default.
//! - **Idempotent upserts**: `set_consent` inserts or overwrites; repeated
//!   calls with the same value succeed.
//! - **Append-only audit**: no update or delete paths exist for entries.

pub mod blob;
pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use blob::{FsBlobStore, MemoryBlobStore};
pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::{AuditLog, BlobStore, ConsentStore};
