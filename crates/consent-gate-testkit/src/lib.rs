//! # Consent Gate Testkit
//!
//! Testing utilities for the consent gateway.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Fixtures**: A ready-made in-memory gateway with a fixed key and token
//! - **Generators**: Proptest strategies for subjects, object names, payloads
//!
//! ## Test Fixtures
//!
//! Quickly set up a gateway scenario:
//!
//! ```rust,no_run
//! use consent_gate_testkit::TestFixture;
//!
//! async fn example() {
//!     let fixture = TestFixture::new();
//!     fixture.upload("patient_12345", "doc.txt", b"notes").await;
//!     let plaintext = fixture
//!         .gateway
//!         .read(
//!             &fixture.subject("patient_12345"),
//!             &fixture.object("doc.txt"),
//!             &fixture.credential(),
//!         )
//!         .await
//!         .unwrap();
//!     assert_eq!(&plaintext[..], b"notes");
//! }
//! ```
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use consent_gate_testkit::generators;
//!
//! proptest! {
//!     #[test]
//!     fn subject_ids_never_contain_slashes(subject in generators::subject_id()) {
//!         prop_assert!(!subject.as_str().contains('/'));
//!     }
//! }
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{TestFixture, TEST_KEY, TEST_TOKEN};
