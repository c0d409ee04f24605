use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

use crate::job::AudioFormat;

/// Top-level configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub defaults: DefaultsConfig,
}

/// Extractor invocation settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    #[serde(default = "default_binary")]
    pub binary: String,
    /// Arguments placed before every invocation
    #[serde(default)]
    pub binary_args: Vec<String>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Per-extractor hints (e.g. `youtube = "player_client=android,web"`)
    #[serde(default = "default_extractor_args")]
    pub extractor_args: BTreeMap<String, String>,
    /// Extra request headers
    #[serde(default)]
    pub http_headers: BTreeMap<String, String>,
    /// Target audio bitrate in kbps
    #[serde(default = "default_audio_quality")]
    pub audio_quality: u32,
    #[serde(default = "default_merge_output_format")]
    pub merge_output_format: String,
    #[serde(default = "default_output_template")]
    pub output_template: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            binary_args: Vec::new(),
            user_agent: default_user_agent(),
            extractor_args: default_extractor_args(),
            http_headers: BTreeMap::new(),
            audio_quality: default_audio_quality(),
            merge_output_format: default_merge_output_format(),
            output_template: default_output_template(),
        }
    }
}

fn default_binary() -> String {
    "yt-dlp".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
        .to_string()
}

fn default_extractor_args() -> BTreeMap<String, String> {
    [(
        "youtube".to_string(),
        "player_client=android,web;skip=dash,hls".to_string(),
    )]
    .into()
}

fn default_audio_quality() -> u32 {
    192
}

fn default_merge_output_format() -> String {
    "mp4".to_string()
}

fn default_output_template() -> String {
    "%(title)s.%(ext)s".to_string()
}

/// Front-end defaults used when the user leaves a field out
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default)]
    pub audio_format: AudioFormat,
    #[serde(default = "default_video_quality")]
    pub video_quality: String,
    #[serde(default)]
    pub allow_playlist: bool,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            audio_format: AudioFormat::default(),
            video_quality: default_video_quality(),
            allow_playlist: false,
        }
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_video_quality() -> String {
    crate::job::DEFAULT_VIDEO_QUALITY.to_string()
}
