use std::path::PathBuf;
use thiserror::Error;

use super::types::{AudioFormat, JobSpec, MediaSelection, Mode, RawJobInput};

/// Quality used when a video job leaves it blank
pub const DEFAULT_VIDEO_QUALITY: &str = "best";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing output directory")]
    MissingOutput,
    #[error("Missing URL")]
    MissingUrl,
    #[error("Malformed URL: must start with http:// or https://")]
    MalformedUrl,
    #[error("Unsupported audio format '{0}' (expected one of mp3, m4a, wav, flac, aac)")]
    UnsupportedFormat(String),
}

/// Validate raw input into a [`JobSpec`].
///
/// Checks run in a fixed order and the first failure wins: output directory,
/// URL presence, URL scheme, then audio format. Pure: no network or
/// filesystem access.
pub fn build(input: &RawJobInput) -> Result<JobSpec, ValidationError> {
    let output_dir = input.output_dir.trim();
    if output_dir.is_empty() {
        return Err(ValidationError::MissingOutput);
    }

    let url = validate_url(&input.url)?;

    let raw = input.format_or_quality.trim();
    let selection = match input.mode {
        Mode::Audio if raw.is_empty() => MediaSelection::Audio {
            format: AudioFormat::default(),
        },
        Mode::Audio => MediaSelection::Audio {
            format: raw.parse().map_err(ValidationError::UnsupportedFormat)?,
        },
        Mode::Video if raw.is_empty() => MediaSelection::Video {
            quality: DEFAULT_VIDEO_QUALITY.to_string(),
        },
        Mode::Video => MediaSelection::Video {
            quality: raw.to_string(),
        },
    };

    Ok(JobSpec {
        url: url.to_string(),
        selection,
        output_dir: PathBuf::from(output_dir),
        allow_playlist: input.allow_playlist,
    })
}

/// URL checks shared by job submission and metadata probes
pub fn validate_url(raw: &str) -> Result<&str, ValidationError> {
    let url = raw.trim();
    if url.is_empty() {
        return Err(ValidationError::MissingUrl);
    }

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ValidationError::MalformedUrl);
    }

    Ok(url)
}
