//! Identifiers for subjects and their stored objects.
//!
//! Blob keys are derived as `subject_id + "/" + object_name`, so subject ids
//! must not contain the separator and object names must not climb out of
//! their namespace.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Identifier of a data owner (e.g. a patient).
///
/// Opaque to the gateway apart from validation: non-empty and free of `/`,
/// which would make derived blob keys ambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectId(String);

impl SubjectId {
    /// Validate and wrap a subject identifier.
    pub fn new(id: impl Into<String>) -> Result<Self, CoreError> {
        let id = id.into();
        if id.is_empty() {
            return Err(CoreError::InvalidSubjectId("empty".into()));
        }
        if id.contains('/') {
            return Err(CoreError::InvalidSubjectId(id));
        }
        Ok(Self(id))
    }

    /// The identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Name of a stored document, unique per subject.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectName(String);

impl ObjectName {
    /// Validate and wrap an object name.
    ///
    /// Rejects empty names and names whose path components could escape the
    /// subject's namespace when a filesystem-backed blob store maps keys to
    /// paths.
    pub fn new(name: impl Into<String>) -> Result<Self, CoreError> {
        let name = name.into();
        if name.is_empty() {
            return Err(CoreError::InvalidObjectName("empty".into()));
        }
        if name.split('/').any(|part| part.is_empty() || part == "." || part == "..") {
            return Err(CoreError::InvalidObjectName(name));
        }
        Ok(Self(name))
    }

    /// The name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Derive the blob-store key for this object under a subject.
    pub fn blob_key(&self, subject: &SubjectId) -> String {
        format!("{}/{}", subject.as_str(), self.0)
    }
}

impl fmt::Display for ObjectName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subject_id_accepts_plain_ids() {
        let id = SubjectId::new("patient_12345").unwrap();
        assert_eq!(id.as_str(), "patient_12345");
    }

    #[test]
    fn test_subject_id_rejects_empty_and_separator() {
        assert!(SubjectId::new("").is_err());
        assert!(SubjectId::new("a/b").is_err());
    }

    #[test]
    fn test_object_name_rejects_traversal() {
        assert!(ObjectName::new("").is_err());
        assert!(ObjectName::new("../secret").is_err());
        assert!(ObjectName::new("a//b").is_err());
        assert!(ObjectName::new("./x").is_err());
    }

    #[test]
    fn test_object_name_allows_nested_names() {
        let name = ObjectName::new("scans/2026/irm.dat").unwrap();
        assert_eq!(name.as_str(), "scans/2026/irm.dat");
    }

    #[test]
    fn test_blob_key_layout() {
        let subject = SubjectId::new("p1").unwrap();
        let name = ObjectName::new("doc.txt").unwrap();
        assert_eq!(name.blob_key(&subject), "p1/doc.txt");
    }
}
