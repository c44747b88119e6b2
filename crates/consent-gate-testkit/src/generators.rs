//! Proptest generators for property-based testing.

use proptest::prelude::*;

use consent_gate_core::{AuditAction, AuditStatus, ObjectName, SubjectId};

/// Generate a valid subject id: non-empty, no path separators.
pub fn subject_id() -> impl Strategy<Value = SubjectId> {
    "[a-zA-Z0-9_-]{1,32}".prop_map(|s| SubjectId::new(s).unwrap())
}

/// Generate a valid object name: one to three path segments.
pub fn object_name() -> impl Strategy<Value = ObjectName> {
    prop::collection::vec("[a-zA-Z0-9_.-]{1,16}", 1..=3)
        .prop_filter("segments must not be . or ..", |segments| {
            segments.iter().all(|s| s != "." && s != "..")
        })
        .prop_map(|segments| ObjectName::new(segments.join("/")).unwrap())
}

/// Generate payload bytes of specified max length.
pub fn payload(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..=max_len)
}

/// Generate a requester identity string.
pub fn requester() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9-]{0,24}".prop_map(String::from)
}

/// Generate an audit action.
pub fn audit_action() -> impl Strategy<Value = AuditAction> {
    prop_oneof![
        Just(AuditAction::UploadAttempt),
        Just(AuditAction::UploadSuccess),
        Just(AuditAction::UploadError),
        Just(AuditAction::ReadSuccess),
        Just(AuditAction::ReadDenied),
        Just(AuditAction::ReadError),
        Just(AuditAction::RevokeConsent),
        Just(AuditAction::GrantConsent),
    ]
}

/// Generate an audit status.
pub fn audit_status() -> impl Strategy<Value = AuditStatus> {
    prop_oneof![
        Just(AuditStatus::Pending),
        Just(AuditStatus::Success),
        Just(AuditStatus::Denied),
        Just(AuditStatus::Error),
    ]
}
