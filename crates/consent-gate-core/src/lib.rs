//! # Consent Gate Core
//!
//! Core primitives for the consent gate: subject/object identifiers, the
//! audit entry model, and the authenticated-encryption cipher that guards
//! every stored document.
//!
//! ## Overview
//!
//! This crate has no I/O. Everything here is a pure data type or a pure
//! transformation over byte buffers, which keeps the cipher and the audit
//! model independently testable.
//!
//! ## Key Types
//!
//! - [`SubjectId`] / [`ObjectName`] - validated identifiers for data owners
//!   and their stored documents
//! - [`AuditEntry`] / [`AuditRecord`] - immutable access-trail records
//! - [`DocumentCipher`] / [`EncryptionKey`] - ChaCha20-Poly1305 encryption
//!   of document payloads under a single operator-provisioned key
//!
//! ## Usage
//!
//! ```rust
//! use consent_gate_core::{DocumentCipher, EncryptionKey};
//!
//! let cipher = DocumentCipher::new(EncryptionKey::from_bytes([0x42; 32]));
//! let ciphertext = cipher.encrypt(b"scan results").unwrap();
//! let plaintext = cipher.decrypt(&ciphertext).unwrap();
//! assert_eq!(plaintext, b"scan results");
//! ```

pub mod audit;
pub mod crypto;
pub mod error;
pub mod types;

pub use audit::{AuditAction, AuditEntry, AuditRecord, AuditStatus};
pub use crypto::{DocumentCipher, EncryptionKey, NONCE_LEN, TAG_LEN};
pub use error::{CipherError, CoreError};
pub use types::{ObjectName, SubjectId};
