use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use uuid::Uuid;

use crate::humanize::HumanDuration;

pub type JobId = Uuid;

/// Characters of the description kept for display
pub const DESCRIPTION_DISPLAY_CHARS: usize = 200;

/// What the user wants out of the URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Audio,
    Video,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Audio => f.write_str("audio"),
            Mode::Video => f.write_str("video"),
        }
    }
}

/// Audio containers the backend is asked to transcode into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AudioFormat {
    #[default]
    Mp3,
    M4a,
    Wav,
    Flac,
    Aac,
}

impl AudioFormat {
    pub const ALL: [AudioFormat; 5] = [
        AudioFormat::Mp3,
        AudioFormat::M4a,
        AudioFormat::Wav,
        AudioFormat::Flac,
        AudioFormat::Aac,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "mp3",
            AudioFormat::M4a => "m4a",
            AudioFormat::Wav => "wav",
            AudioFormat::Flac => "flac",
            AudioFormat::Aac => "aac",
        }
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AudioFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|format| format.as_str() == wanted)
            .ok_or_else(|| s.trim().to_string())
    }
}

/// Mode-specific part of a job. Carrying the format inside the variant keeps
/// audio format and video quality mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaSelection {
    Audio { format: AudioFormat },
    Video { quality: String },
}

/// Raw, unvalidated input collected by the front end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawJobInput {
    pub url: String,
    pub output_dir: String,
    pub mode: Mode,
    /// Audio format for `Mode::Audio`, quality string for `Mode::Video`
    pub format_or_quality: String,
    pub allow_playlist: bool,
}

impl RawJobInput {
    pub fn audio(url: impl Into<String>, output_dir: impl Into<String>, format: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            output_dir: output_dir.into(),
            mode: Mode::Audio,
            format_or_quality: format.into(),
            allow_playlist: false,
        }
    }

    pub fn video(url: impl Into<String>, output_dir: impl Into<String>, quality: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            output_dir: output_dir.into(),
            mode: Mode::Video,
            format_or_quality: quality.into(),
            allow_playlist: false,
        }
    }

    pub fn with_playlist(mut self, allow_playlist: bool) -> Self {
        self.allow_playlist = allow_playlist;
        self
    }
}

/// Validated, immutable description of one job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSpec {
    pub(super) url: String,
    pub(super) selection: MediaSelection,
    pub(super) output_dir: PathBuf,
    pub(super) allow_playlist: bool,
}

impl JobSpec {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn mode(&self) -> Mode {
        match self.selection {
            MediaSelection::Audio { .. } => Mode::Audio,
            MediaSelection::Video { .. } => Mode::Video,
        }
    }

    pub fn selection(&self) -> &MediaSelection {
        &self.selection
    }

    /// Present only for audio jobs
    pub fn audio_format(&self) -> Option<AudioFormat> {
        match &self.selection {
            MediaSelection::Audio { format } => Some(*format),
            MediaSelection::Video { .. } => None,
        }
    }

    /// Present only for video jobs
    pub fn video_quality(&self) -> Option<&str> {
        match &self.selection {
            MediaSelection::Audio { .. } => None,
            MediaSelection::Video { quality } => Some(quality),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn allow_playlist(&self) -> bool {
        self.allow_playlist
    }
}

/// Outcome carried by the terminal event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobResult {
    Success { saved_to: PathBuf },
    Failure { message: String },
}

impl JobResult {
    pub fn failure(message: impl Into<String>) -> Self {
        JobResult::Failure {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, JobResult::Success { .. })
    }
}

/// Job lifecycle: Idle -> Validating -> Running -> Succeeded | Failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Idle,
    Validating,
    Running,
    Succeeded,
    Failed,
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            JobState::Idle => "idle",
            JobState::Validating => "validating",
            JobState::Running => "running",
            JobState::Succeeded => "succeeded",
            JobState::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Probe result. Display-only, never persisted.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Metadata {
    pub title: Option<String>,
    pub uploader: Option<String>,
    /// Seconds
    pub duration: Option<f64>,
    pub description: Option<String>,
    /// Set when the description was cut to the display limit
    #[serde(default)]
    pub description_truncated: bool,
}

impl Metadata {
    /// Keeps at most [`DESCRIPTION_DISPLAY_CHARS`] characters of the description
    pub fn with_description(mut self, description: Option<String>) -> Self {
        let cut = description
            .as_deref()
            .and_then(|text| text.char_indices().nth(DESCRIPTION_DISPLAY_CHARS))
            .map(|(idx, _)| idx);

        self.description_truncated = cut.is_some();
        self.description = match (description, cut) {
            (Some(text), Some(idx)) => Some(text[..idx].to_string()),
            (text, _) => text,
        };
        self
    }
}

impl fmt::Display for Metadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NA: &str = "N/A";
        writeln!(f, "Title: {}", self.title.as_deref().unwrap_or(NA))?;
        writeln!(f, "Uploader: {}", self.uploader.as_deref().unwrap_or(NA))?;
        match self.duration {
            Some(secs) => writeln!(
                f,
                "Duration: {} seconds ({})",
                secs.round() as u64,
                HumanDuration::from_secs_f64(secs)
            )?,
            None => writeln!(f, "Duration: {NA}")?,
        }
        match &self.description {
            Some(text) if self.description_truncated => write!(f, "Description: {text}..."),
            Some(text) => write!(f, "Description: {text}"),
            None => write!(f, "Description: {NA}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_format_parse_is_case_insensitive() {
        assert_eq!("WAV".parse::<AudioFormat>(), Ok(AudioFormat::Wav));
        assert_eq!(" flac ".parse::<AudioFormat>(), Ok(AudioFormat::Flac));
        assert_eq!("ogg".parse::<AudioFormat>(), Err("ogg".to_string()));
    }

    #[test]
    fn test_description_truncated_to_display_limit() {
        let long = "é".repeat(250);
        let metadata = Metadata::default().with_description(Some(long));

        let kept = metadata.description.as_ref().unwrap();
        assert_eq!(kept.chars().count(), DESCRIPTION_DISPLAY_CHARS);
        assert!(metadata.description_truncated);
        assert!(metadata.to_string().ends_with("..."));
    }

    #[test]
    fn test_description_at_limit_not_marked_truncated() {
        let exact = "a".repeat(DESCRIPTION_DISPLAY_CHARS);
        let metadata = Metadata::default().with_description(Some(exact));
        assert!(!metadata.description_truncated);
        assert!(!metadata.to_string().ends_with("..."));
    }

    #[test]
    fn test_short_description_kept_whole() {
        let metadata = Metadata::default().with_description(Some("short".to_string()));
        assert_eq!(metadata.description.as_deref(), Some("short"));
        assert!(metadata.to_string().ends_with("Description: short"));
    }

    #[test]
    fn test_metadata_display_missing_fields() {
        let rendered = Metadata::default().to_string();
        assert!(rendered.contains("Title: N/A"));
        assert!(rendered.contains("Duration: N/A"));
    }

    #[test]
    fn test_metadata_display_duration() {
        let metadata = Metadata {
            title: Some("Track".to_string()),
            uploader: Some("Artist".to_string()),
            duration: Some(3725.0),
            ..Default::default()
        };

        let rendered = metadata.to_string();
        assert!(rendered.contains("Duration: 3725 seconds (1:02:05)"));
    }
}
