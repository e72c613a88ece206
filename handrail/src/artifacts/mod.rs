//! Artifact sink: persists surface captures keyed by step name.

use crate::actuator::Actuator;
use crate::core::Artifact;
use crate::errors::FlowResult;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes full-surface captures under one destination directory.
///
/// Each key maps to a deterministic path (`<dir>/<key>.png`), so repeated
/// captures under the same key overwrite the prior file. That is the
/// intended checkpoint semantic: the file always holds the latest capture
/// for that step.
#[derive(Debug, Clone)]
pub struct ArtifactSink {
    dir: PathBuf,
}

impl ArtifactSink {
    /// Creates a sink writing under `dir`. The directory does not need to
    /// exist yet; it is created on first capture.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The destination directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// The deterministic path a key maps to.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.png"))
    }

    /// Captures the surface and writes it under `key`.
    ///
    /// Creates the destination directory if it is absent.
    ///
    /// # Errors
    ///
    /// Returns [`crate::errors::FlowError::Io`] if the destination is
    /// unwritable, or any error the actuator reports while capturing.
    pub async fn capture(&self, actuator: &dyn Actuator, key: &str) -> FlowResult<Artifact> {
        let bytes = actuator.screenshot().await?;
        tokio::fs::create_dir_all(&self.dir).await?;

        let path = self.path_for(key);
        tokio::fs::write(&path, &bytes).await?;

        info!(key = %key, path = %path.display(), bytes = bytes.len(), "Capture saved");
        Ok(Artifact::new(key, path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedActuator;

    #[tokio::test]
    async fn test_capture_creates_missing_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("captures").join("nested");
        let sink = ArtifactSink::new(&dir);
        let actuator = ScriptedActuator::new();

        let artifact = sink.capture(&actuator, "qr-page").await.unwrap();

        assert_eq!(artifact.key, "qr-page");
        assert_eq!(artifact.path, dir.join("qr-page.png"));
        assert!(artifact.path.exists());
    }

    #[tokio::test]
    async fn test_same_key_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let sink = ArtifactSink::new(tmp.path());

        let actuator = ScriptedActuator::new();
        actuator.set_screenshot_bytes(b"first".to_vec());
        let first = sink.capture(&actuator, "result").await.unwrap();

        actuator.set_screenshot_bytes(b"second".to_vec());
        let second = sink.capture(&actuator, "result").await.unwrap();

        assert_eq!(first.path, second.path);
        let contents = std::fs::read(&second.path).unwrap();
        assert_eq!(contents, b"second");
    }

    #[tokio::test]
    async fn test_unwritable_destination_is_io_error() {
        let tmp = tempfile::tempdir().unwrap();
        // A file where the directory should be makes create_dir_all fail.
        let blocker = tmp.path().join("captures");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let sink = ArtifactSink::new(&blocker);
        let actuator = ScriptedActuator::new();

        let err = sink.capture(&actuator, "x").await;
        assert!(matches!(err, Err(crate::errors::FlowError::Io(_))));
    }

    #[test]
    fn test_deterministic_path() {
        let sink = ArtifactSink::new("/tmp/captures");
        assert_eq!(
            sink.path_for("android-result"),
            PathBuf::from("/tmp/captures/android-result.png")
        );
    }
}
