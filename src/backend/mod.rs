//! Backend adapter over the external media extractor
//!
//! - [`MediaBackend`] - probe / fetch audio / fetch video
//! - [`YtDlpBackend`] - implementation driving the `yt-dlp` command line
//! - [`YtDlpSettings`] - headers, extractor hints and templates handed to it

mod traits;
mod ytdlp;

pub use traits::{BackendError, MediaBackend, SavedPath};
pub use ytdlp::{YtDlpBackend, YtDlpSettings};
