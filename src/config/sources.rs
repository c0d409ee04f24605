use super::models::Config;
use config::{ConfigError, Environment, File};
use std::env;
use std::path::PathBuf;

const CONFIG_ENV_VAR: &str = "MEDIAFETCH_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config/mediafetch.toml";
const ENV_PREFIX: &str = "MEDIAFETCH";
const ENV_SEPARATOR: &str = "__";
const LIST_SEPARATOR: &str = " ";

/// Sequence-valued keys, split on [`LIST_SEPARATOR`] when read from the environment
const LIST_KEYS: [&str; 1] = ["backend.binary_args"];

/// Path of the TOML file: `MEDIAFETCH_CONFIG` or the default location
pub fn config_path() -> PathBuf {
    env::var(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Load configuration from multiple sources with priority:
/// 1. Defaults (embedded in structs)
/// 2. TOML file (if exists)
/// 3. Environment variables from .env file (via dotenvy)
/// 4. System environment variables (highest priority)
pub fn load() -> Result<Config, ConfigError> {
    // Missing .env is fine
    let _ = dotenvy::dotenv();

    load_from_sources(config_path())
}

/// Load configuration from a specific path and environment
pub fn load_from_sources(config_path: PathBuf) -> Result<Config, ConfigError> {
    build(config_path, environment())
}

/// MEDIAFETCH__BACKEND__BINARY -> backend.binary
///
/// List keys take space-separated values:
/// `MEDIAFETCH__BACKEND__BINARY_ARGS="-m yt_dlp"`
fn environment() -> Environment {
    let mut env = Environment::with_prefix(ENV_PREFIX)
        .separator(ENV_SEPARATOR)
        .try_parsing(true)
        .list_separator(LIST_SEPARATOR);

    for key in LIST_KEYS {
        env = env.with_list_parse_key(key);
    }

    env
}

fn build(config_path: PathBuf, environment: Environment) -> Result<Config, ConfigError> {
    let mut builder = config::Config::builder();

    if config_path.exists() {
        tracing::info!("Loading configuration from: {}", config_path.display());
        builder = builder.add_source(File::from(config_path).required(false));
    } else {
        tracing::debug!(
            "Configuration file not found at {}, using defaults and environment overrides",
            config_path.display()
        );
    }

    let config = builder.add_source(environment).build()?;
    config.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::AudioFormat;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_defaults_only() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        let config = load_from_sources(config_path).unwrap();
        assert_eq!(config.backend.binary, "yt-dlp");
        assert_eq!(config.defaults.audio_format, AudioFormat::Mp3);
    }

    #[test]
    fn test_load_from_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let toml_content = r#"
[backend]
binary = "python3"
binary_args = ["-m", "yt_dlp"]
audio_quality = 320
merge_output_format = "mkv"

[backend.extractor_args]
youtube = "player_client=web"

[backend.http_headers]
referer = "https://example.com"

[defaults]
output_dir = "music"
audio_format = "m4a"
video_quality = "worst"
allow_playlist = true
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = load_from_sources(config_path).unwrap();
        assert_eq!(config.backend.binary, "python3");
        assert_eq!(config.backend.binary_args, vec!["-m", "yt_dlp"]);
        assert_eq!(config.backend.audio_quality, 320);
        assert_eq!(config.backend.merge_output_format, "mkv");
        assert_eq!(config.backend.extractor_args["youtube"], "player_client=web");
        assert_eq!(config.backend.http_headers["referer"], "https://example.com");
        assert_eq!(config.defaults.output_dir, PathBuf::from("music"));
        assert_eq!(config.defaults.audio_format, AudioFormat::M4a);
        assert_eq!(config.defaults.video_quality, "worst");
        assert!(config.defaults.allow_playlist);
    }

    fn env_source(vars: &[(&str, &str)]) -> Environment {
        let vars = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        environment().source(Some(vars))
    }

    #[test]
    fn test_env_overrides_list_key() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.toml");

        let env = env_source(&[
            ("MEDIAFETCH__BACKEND__BINARY", "python3"),
            ("MEDIAFETCH__BACKEND__BINARY_ARGS", "-m yt_dlp"),
        ]);

        let config = build(config_path, env).unwrap();
        assert_eq!(config.backend.binary, "python3");
        assert_eq!(config.backend.binary_args, vec!["-m", "yt_dlp"]);
    }

    #[test]
    fn test_env_overrides_file_values() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");
        fs::write(
            &config_path,
            "[backend]\naudio_quality = 128\nbinary_args = [\"--verbose\"]\n\n[defaults]\naudio_format = \"wav\"\n",
        )
        .unwrap();

        let env = env_source(&[
            ("MEDIAFETCH__BACKEND__AUDIO_QUALITY", "320"),
            ("MEDIAFETCH__BACKEND__BINARY_ARGS", "-m yt_dlp"),
            ("MEDIAFETCH__DEFAULTS__ALLOW_PLAYLIST", "true"),
        ]);

        let config = build(config_path, env).unwrap();
        assert_eq!(config.backend.audio_quality, 320);
        assert_eq!(config.backend.binary_args, vec!["-m", "yt_dlp"]);
        assert_eq!(config.defaults.audio_format, AudioFormat::Wav);
        assert!(config.defaults.allow_playlist);
    }
}
