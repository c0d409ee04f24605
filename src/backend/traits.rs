use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;

use crate::job::{JobSpec, Metadata};

/// Opaque failure from the extraction backend.
///
/// The message is surfaced to the user verbatim; the core never classifies it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct BackendError {
    message: String,
}

impl BackendError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Location reported by a successful fetch
pub type SavedPath = PathBuf;

/// Narrow interface over the external media-extraction capability.
///
/// Every call is a single attempt; retrying is left to the caller.
#[async_trait]
pub trait MediaBackend: Send + Sync {
    /// Name of the backend (for logging)
    fn name(&self) -> &'static str;

    /// Read-only metadata query, no files written
    async fn probe(&self, url: &str) -> Result<Metadata, BackendError>;

    /// Best audio stream transcoded to `spec.audio_format()`
    async fn fetch_audio(&self, spec: &JobSpec) -> Result<SavedPath, BackendError>;

    /// Best (or `spec.video_quality()`) video merged with audio into one container
    async fn fetch_video(&self, spec: &JobSpec) -> Result<SavedPath, BackendError>;
}
