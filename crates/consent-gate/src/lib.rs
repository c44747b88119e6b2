//! # Consent Gate
//!
//! The unified API for the consent gateway - consent-gated access to
//! encrypted documents with an append-only audit trail.
//!
//! ## Overview
//!
//! Every document is encrypted before it leaves the gateway and decrypted
//! only after the owning subject's consent flag has been checked. Every
//! access attempt - stored, served, denied, or failed - lands in the audit
//! trail.
//!
//! - **Upload**: encrypt the payload, store ciphertext in the blob store
//! - **Read**: consent check first, then fetch and decrypt
//! - **Revoke / Grant**: flip the subject's consent flag, effective for
//!   every read that begins afterwards
//!
//! ## Usage
//!
//! ```rust,no_run
//! use bytes::Bytes;
//! use consent_gate::{Credential, Gateway, GatewayConfig};
//! use consent_gate_core::{ObjectName, SubjectId};
//! use consent_gate_store::{FsBlobStore, SqliteStore};
//!
//! async fn example() {
//!     let config = GatewayConfig::from_env().unwrap();
//!     let store = SqliteStore::open("gate.db").unwrap();
//!     let blobs = FsBlobStore::new("blobs").unwrap();
//!
//!     let gateway = Gateway::new(config, store, blobs);
//!     let credential = Credential::new("research-ai", "secure-token-123");
//!
//!     let subject = SubjectId::new("patient_12345").unwrap();
//!     let name = ObjectName::new("doc.txt").unwrap();
//!
//!     gateway
//!         .upload(&subject, &name, Bytes::from_static(b"notes"), &credential)
//!         .await
//!         .unwrap();
//!     let plaintext = gateway.read(&subject, &name, &credential).await.unwrap();
//!     assert_eq!(plaintext, Bytes::from_static(b"notes"));
//! }
//! ```

pub mod config;
pub mod error;
pub mod gateway;

pub use config::{ConfigError, GatewayConfig};
pub use error::{GatewayError, Result};
pub use gateway::{Credential, Gateway, UploadOutcome};

// Re-export the component crates for convenience.
pub use consent_gate_core as core;
pub use consent_gate_store as store;
