//! Audit trail model.
//!
//! Every state-changing or data-revealing gateway decision produces one
//! terminal audit entry. Entries are append-only: the store assigns `id` and
//! `timestamp` on insert and nothing ever mutates them afterwards.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What a gateway decision was about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AuditAction {
    UploadAttempt,
    UploadSuccess,
    UploadError,
    ReadSuccess,
    ReadDenied,
    ReadError,
    RevokeConsent,
    GrantConsent,
}

impl AuditAction {
    /// Stable wire/storage label for this action.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::UploadAttempt => "upload-attempt",
            AuditAction::UploadSuccess => "upload-success",
            AuditAction::UploadError => "upload-error",
            AuditAction::ReadSuccess => "read-success",
            AuditAction::ReadDenied => "read-denied",
            AuditAction::ReadError => "read-error",
            AuditAction::RevokeConsent => "revoke-consent",
            AuditAction::GrantConsent => "grant-consent",
        }
    }
}

impl FromStr for AuditAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "upload-attempt" => Ok(AuditAction::UploadAttempt),
            "upload-success" => Ok(AuditAction::UploadSuccess),
            "upload-error" => Ok(AuditAction::UploadError),
            "read-success" => Ok(AuditAction::ReadSuccess),
            "read-denied" => Ok(AuditAction::ReadDenied),
            "read-error" => Ok(AuditAction::ReadError),
            "revoke-consent" => Ok(AuditAction::RevokeConsent),
            "grant-consent" => Ok(AuditAction::GrantConsent),
            other => Err(format!("unknown audit action: {other}")),
        }
    }
}

impl fmt::Display for AuditAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome recorded with an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditStatus {
    Pending,
    Success,
    Denied,
    Error,
}

impl AuditStatus {
    /// Stable wire/storage label for this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditStatus::Pending => "pending",
            AuditStatus::Success => "success",
            AuditStatus::Denied => "denied",
            AuditStatus::Error => "error",
        }
    }
}

impl FromStr for AuditStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(AuditStatus::Pending),
            "success" => Ok(AuditStatus::Success),
            "denied" => Ok(AuditStatus::Denied),
            "error" => Ok(AuditStatus::Error),
            other => Err(format!("unknown audit status: {other}")),
        }
    }
}

impl fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A record as submitted by the gateway, before the store assigns
/// `id` and `timestamp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// The subject whose data the decision concerned.
    pub subject_id: String,
    /// What kind of decision this was.
    pub action: AuditAction,
    /// Identity of the caller making the request.
    pub requester: String,
    /// Outcome of the decision.
    pub status: AuditStatus,
    /// Free-text context (payload size, sanitized error message, ...).
    pub details: String,
}

impl AuditRecord {
    /// Build a record for a subject and action.
    pub fn new(
        subject_id: impl Into<String>,
        action: AuditAction,
        requester: impl Into<String>,
        status: AuditStatus,
        details: impl Into<String>,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            action,
            requester: requester.into(),
            status,
            details: details.into(),
        }
    }
}

/// A persisted audit entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Monotonically increasing sequence number, assigned by the store.
    pub id: i64,
    /// Creation instant (Unix ms), assigned by the store, not the caller.
    pub timestamp: i64,
    /// The subject whose data the decision concerned.
    pub subject_id: String,
    /// What kind of decision this was.
    pub action: AuditAction,
    /// Identity of the caller making the request.
    pub requester: String,
    /// Outcome of the decision.
    pub status: AuditStatus,
    /// Free-text context.
    pub details: String,
}
