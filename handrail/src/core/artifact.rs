//! Artifact record for persisted point-in-time captures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A persisted surface capture.
///
/// Created by the artifact sink on each capture call and never mutated.
/// The key maps to a deterministic path, so a repeated capture under the
/// same key produces a new artifact overwriting the prior file — that
/// overwrite is deliberate, not accidental.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// The capture key, usually a step name.
    pub key: String,
    /// Where the capture was written.
    pub path: PathBuf,
    /// When the capture was taken (UTC).
    pub captured_at: DateTime<Utc>,
}

impl Artifact {
    /// Creates an artifact stamped with the current time.
    #[must_use]
    pub fn new(key: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            key: key.into(),
            path: path.into(),
            captured_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_creation() {
        let artifact = Artifact::new("qr-page", "/tmp/captures/qr-page.png");
        assert_eq!(artifact.key, "qr-page");
        assert_eq!(artifact.path, PathBuf::from("/tmp/captures/qr-page.png"));
    }

    #[test]
    fn test_artifact_serialize_roundtrip() {
        let artifact = Artifact::new("result", "captures/result.png");
        let json = serde_json::to_string(&artifact).unwrap();
        let back: Artifact = serde_json::from_str(&json).unwrap();
        assert_eq!(back, artifact);
    }
}
