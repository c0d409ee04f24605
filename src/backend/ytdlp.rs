use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};
use tokio::process::Command;
use tracing::{debug, warn};

use super::traits::{BackendError, MediaBackend, SavedPath};
use crate::config::BackendConfig;
use crate::job::{JobSpec, MediaSelection, Metadata};

const AUDIO_SELECTOR: &str = "bestaudio/best";
const BEST_VIDEO_SELECTOR: &str = "bestvideo+bestaudio/best";

/// Everything the adapter passes to yt-dlp besides the job itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YtDlpSettings {
    pub binary: String,
    /// Placed before every invocation (e.g. `-m yt_dlp` for a Python interpreter)
    pub binary_args: Vec<String>,
    pub user_agent: String,
    /// extractor -> argument string, passed as `--extractor-args extractor:args`
    pub extractor_args: BTreeMap<String, String>,
    pub http_headers: BTreeMap<String, String>,
    /// Target audio bitrate in kbps
    pub audio_quality: u32,
    pub merge_output_format: String,
    pub output_template: String,
}

impl From<&BackendConfig> for YtDlpSettings {
    fn from(config: &BackendConfig) -> Self {
        Self {
            binary: config.binary.clone(),
            binary_args: config.binary_args.clone(),
            user_agent: config.user_agent.clone(),
            extractor_args: config.extractor_args.clone(),
            http_headers: config.http_headers.clone(),
            audio_quality: config.audio_quality,
            merge_output_format: config.merge_output_format.clone(),
            output_template: config.output_template.clone(),
        }
    }
}

impl Default for YtDlpSettings {
    fn default() -> Self {
        Self::from(&BackendConfig::default())
    }
}

/// Subset of `--dump-json` output we display
#[derive(Debug, Deserialize)]
struct ProbeInfo {
    title: Option<String>,
    uploader: Option<String>,
    duration: Option<f64>,
    description: Option<String>,
}

/// [`MediaBackend`] driving the yt-dlp command line
#[derive(Debug, Clone, Default)]
pub struct YtDlpBackend {
    settings: YtDlpSettings,
}

impl YtDlpBackend {
    pub fn new(settings: YtDlpSettings) -> Self {
        Self { settings }
    }

    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(YtDlpSettings::from(config))
    }

    /// Arguments for a probe of `url`
    pub fn probe_args(&self, url: &str) -> Vec<String> {
        let mut args = self.settings.binary_args.clone();
        args.extend(
            ["--dump-json", "--skip-download", "--no-playlist", "--no-warnings"]
                .map(String::from),
        );
        self.push_request_args(&mut args);
        args.push(url.to_string());
        args
    }

    /// Arguments for the download described by `spec`
    pub fn download_args(&self, spec: &JobSpec) -> Vec<String> {
        let mut args = self.settings.binary_args.clone();

        match spec.selection() {
            MediaSelection::Audio { format } => {
                args.extend([
                    "-f".to_string(),
                    AUDIO_SELECTOR.to_string(),
                    "--extract-audio".to_string(),
                    "--audio-format".to_string(),
                    format.to_string(),
                    "--audio-quality".to_string(),
                    format!("{}K", self.settings.audio_quality),
                ]);
            }
            MediaSelection::Video { quality } => {
                args.extend([
                    "-f".to_string(),
                    video_selector(quality).to_string(),
                    "--merge-output-format".to_string(),
                    self.settings.merge_output_format.clone(),
                ]);
            }
        }

        let playlist = if spec.allow_playlist() { "--yes-playlist" } else { "--no-playlist" };
        args.push(playlist.to_string());

        let template = spec.output_dir().join(&self.settings.output_template);
        args.push("-o".to_string());
        args.push(template.to_string_lossy().into_owned());

        self.push_request_args(&mut args);

        // Report final file locations on stdout
        args.extend(["--print", "after_move:filepath", "--no-simulate"].map(String::from));
        args.push(spec.url().to_string());
        args
    }

    fn push_request_args(&self, args: &mut Vec<String>) {
        args.push("--user-agent".to_string());
        args.push(self.settings.user_agent.clone());

        for (extractor, value) in &self.settings.extractor_args {
            args.push("--extractor-args".to_string());
            args.push(format!("{}:{}", extractor, value));
        }

        for (name, value) in &self.settings.http_headers {
            args.push("--add-header".to_string());
            args.push(format!("{}:{}", name, value));
        }
    }

    async fn run(&self, args: Vec<String>) -> Result<Output, BackendError> {
        debug!(binary = %self.settings.binary, ?args, "Invoking extractor");

        let output = Command::new(&self.settings.binary)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| {
                BackendError::new(format!("failed to launch {}: {}", self.settings.binary, e))
            })?;

        if output.status.success() {
            Ok(output)
        } else {
            let message = failure_message(&output);
            warn!(binary = %self.settings.binary, status = %output.status, error = %message, "Extractor failed");
            Err(BackendError::new(message))
        }
    }

    async fn fetch(&self, spec: &JobSpec) -> Result<SavedPath, BackendError> {
        let output = self.run(self.download_args(spec)).await?;
        let saved = saved_path(&output.stdout, spec.output_dir());
        debug!(url = spec.url(), saved = %saved.display(), "Extractor finished");
        Ok(saved)
    }
}

#[async_trait]
impl MediaBackend for YtDlpBackend {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn probe(&self, url: &str) -> Result<Metadata, BackendError> {
        let output = self.run(self.probe_args(url)).await?;
        parse_probe(&output.stdout)
    }

    async fn fetch_audio(&self, spec: &JobSpec) -> Result<SavedPath, BackendError> {
        self.fetch(spec).await
    }

    async fn fetch_video(&self, spec: &JobSpec) -> Result<SavedPath, BackendError> {
        self.fetch(spec).await
    }
}

fn video_selector(quality: &str) -> &str {
    if quality == "best" { BEST_VIDEO_SELECTOR } else { quality }
}

/// One reported file is the saved path; a playlist (or nothing) maps to the directory
fn saved_path(stdout: &[u8], output_dir: &Path) -> PathBuf {
    let mut files = stdout
        .split(|byte| *byte == b'\n')
        .map(<[u8]>::trim_ascii)
        .filter(|line| !line.is_empty());

    match (files.next(), files.next()) {
        (Some(only), None) => path_from_bytes(only),
        _ => output_dir.to_path_buf(),
    }
}

/// File names are arbitrary bytes on Unix; keep them as reported
#[cfg(unix)]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    PathBuf::from(OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
fn path_from_bytes(bytes: &[u8]) -> PathBuf {
    PathBuf::from(String::from_utf8_lossy(bytes).into_owned())
}

fn failure_message(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let lines: Vec<&str> = stderr
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if let Some(error) = lines.iter().rev().find_map(|line| line.strip_prefix("ERROR:")) {
        return error.trim().to_string();
    }

    match lines.last() {
        Some(line) => line.to_string(),
        None => format!("extractor exited with {}", output.status),
    }
}

fn parse_probe(stdout: &[u8]) -> Result<Metadata, BackendError> {
    let text = String::from_utf8_lossy(stdout);
    let line = text
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .ok_or_else(|| BackendError::new("extractor returned no metadata"))?;

    let info: ProbeInfo = serde_json::from_str(line)
        .map_err(|e| BackendError::new(format!("invalid metadata from extractor: {}", e)))?;

    Ok(Metadata {
        title: info.title,
        uploader: info.uploader,
        duration: info.duration,
        ..Default::default()
    }
    .with_description(info.description))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::{self, RawJobInput};

    fn position(args: &[String], flag: &str) -> usize {
        args.iter()
            .position(|a| a == flag)
            .unwrap_or_else(|| panic!("missing {flag} in {args:?}"))
    }

    fn value_of<'a>(args: &'a [String], flag: &str) -> &'a str {
        &args[position(args, flag) + 1]
    }

    #[test]
    fn test_audio_args() {
        let backend = YtDlpBackend::default();
        let spec = job::build(&RawJobInput::audio("https://soundcloud.com/a/b", "./out", "wav")).unwrap();

        let args = backend.download_args(&spec);
        assert_eq!(value_of(&args, "-f"), "bestaudio/best");
        assert!(args.contains(&"--extract-audio".to_string()));
        assert_eq!(value_of(&args, "--audio-format"), "wav");
        assert_eq!(value_of(&args, "--audio-quality"), "192K");
        assert!(args.contains(&"--no-playlist".to_string()));
        assert_eq!(
            value_of(&args, "-o"),
            Path::new("./out").join("%(title)s.%(ext)s").to_string_lossy()
        );
        assert_eq!(args.last().unwrap(), "https://soundcloud.com/a/b");
    }

    #[test]
    fn test_video_args_best_quality() {
        let backend = YtDlpBackend::default();
        let spec = job::build(&RawJobInput::video("https://example.com/v", "out", "best").with_playlist(true)).unwrap();

        let args = backend.download_args(&spec);
        assert_eq!(value_of(&args, "-f"), "bestvideo+bestaudio/best");
        assert_eq!(value_of(&args, "--merge-output-format"), "mp4");
        assert!(args.contains(&"--yes-playlist".to_string()));
        assert!(!args.contains(&"--no-playlist".to_string()));
        assert!(!args.contains(&"--extract-audio".to_string()));
    }

    #[test]
    fn test_video_args_explicit_quality() {
        let backend = YtDlpBackend::default();
        let spec = job::build(&RawJobInput::video("https://example.com/v", "out", "worst")).unwrap();

        assert_eq!(value_of(&backend.download_args(&spec), "-f"), "worst");
    }

    #[test]
    fn test_request_args_come_from_settings() {
        let mut settings = YtDlpSettings::default();
        settings.user_agent = "TestAgent/1.0".to_string();
        settings.extractor_args = [("soundcloud".to_string(), "formats=mp3".to_string())].into();
        settings.http_headers = [("Referer".to_string(), "https://example.com".to_string())].into();
        settings.binary_args = vec!["-m".to_string(), "yt_dlp".to_string()];

        let args = YtDlpBackend::new(settings).probe_args("https://example.com/x");
        assert_eq!(&args[..2], ["-m", "yt_dlp"]);
        assert_eq!(value_of(&args, "--user-agent"), "TestAgent/1.0");
        assert_eq!(value_of(&args, "--extractor-args"), "soundcloud:formats=mp3");
        assert_eq!(value_of(&args, "--add-header"), "Referer:https://example.com");
        assert!(args.contains(&"--skip-download".to_string()));
    }

    #[test]
    fn test_default_settings_carry_youtube_hints() {
        let args = YtDlpBackend::default().probe_args("https://example.com/x");
        assert_eq!(
            value_of(&args, "--extractor-args"),
            "youtube:player_client=android,web;skip=dash,hls"
        );
        assert!(value_of(&args, "--user-agent").starts_with("Mozilla/5.0"));
    }

    #[test]
    fn test_saved_path_single_file() {
        let saved = saved_path(b"\n./out/Track.wav\n", Path::new("./out"));
        assert_eq!(saved, PathBuf::from("./out/Track.wav"));
    }

    #[test]
    fn test_saved_path_playlist_falls_back_to_dir() {
        let saved = saved_path(b"./out/A.mp3\n./out/B.mp3\n", Path::new("./out"));
        assert_eq!(saved, PathBuf::from("./out"));

        let saved = saved_path(b"", Path::new("./out"));
        assert_eq!(saved, PathBuf::from("./out"));
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_path_keeps_non_utf8_bytes() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let saved = saved_path(b"./out/caf\xe9.mp3\r\n", Path::new("./out"));
        assert_eq!(saved, PathBuf::from(OsStr::from_bytes(b"./out/caf\xe9.mp3")));
    }

    #[test]
    fn test_parse_probe() {
        let json = br#"{"id":"x","title":"Track","uploader":"Artist","duration":212,"description":"hello"}"#;

        let metadata = parse_probe(json).unwrap();
        assert_eq!(metadata.title.as_deref(), Some("Track"));
        assert_eq!(metadata.uploader.as_deref(), Some("Artist"));
        assert_eq!(metadata.duration, Some(212.0));
        assert_eq!(metadata.description.as_deref(), Some("hello"));
    }

    #[test]
    fn test_parse_probe_rejects_garbage() {
        assert!(parse_probe(b"").is_err());
        assert!(parse_probe(b"not json").is_err());
    }
}
