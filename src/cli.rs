use clap::{ArgGroup, Parser};
use std::path::PathBuf;

const EXAMPLES: &str = "\
Examples:
  # Download audio as MP3
  mediafetch -a \"https://soundcloud.com/artist/track\"

  # Download video
  mediafetch -v \"https://youtube.com/watch?v=...\"

  # Specify output directory
  mediafetch -a \"https://...\" -o ./my_music

  # Get info without downloading
  mediafetch -i \"https://...\"";

#[derive(Parser, Debug)]
#[command(name = "mediafetch")]
#[command(about = "Download audio and video from various platforms", long_about = None)]
#[command(after_help = EXAMPLES)]
#[command(group(ArgGroup::new("mode").required(true).args(["audio", "video", "info"])))]
pub struct Cli {
    /// URL to download from
    pub url: Option<String>,

    /// Download audio only
    #[arg(short, long)]
    pub audio: bool,

    /// Download video
    #[arg(short, long)]
    pub video: bool,

    /// Get info about the URL without downloading
    #[arg(short, long)]
    pub info: bool,

    /// Audio format (mp3, m4a, wav, flac, aac) [default: from config, mp3]
    #[arg(short, long)]
    pub format: Option<String>,

    /// Video quality (best, worst or a format selector) [default: from config, best]
    #[arg(short, long)]
    pub quality: Option<String>,

    /// Output directory [default: from config, downloads]
    #[arg(short, long)]
    pub output: Option<String>,

    /// Download the whole playlist/album instead of a single item
    #[arg(short, long)]
    pub playlist: bool,

    /// Configuration file [default: $MEDIAFETCH_CONFIG or config/mediafetch.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Audio,
    Video,
    Info,
}

impl Cli {
    /// The mode group guarantees exactly one flag is set
    pub fn action(&self) -> Action {
        if self.info {
            Action::Info
        } else if self.video {
            Action::Video
        } else {
            Action::Audio
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audio_flags() {
        let cli = Cli::try_parse_from(["mediafetch", "-a", "https://x.com/t", "-f", "wav", "-o", "./out"]).unwrap();
        assert_eq!(cli.action(), Action::Audio);
        assert_eq!(cli.url.as_deref(), Some("https://x.com/t"));
        assert_eq!(cli.format.as_deref(), Some("wav"));
        assert_eq!(cli.output.as_deref(), Some("./out"));
        assert!(!cli.playlist);
    }

    #[test]
    fn test_video_and_info_flags() {
        let cli = Cli::try_parse_from(["mediafetch", "--video", "-q", "worst", "-p", "https://x.com"]).unwrap();
        assert_eq!(cli.action(), Action::Video);
        assert_eq!(cli.quality.as_deref(), Some("worst"));
        assert!(cli.playlist);

        let cli = Cli::try_parse_from(["mediafetch", "-i", "https://x.com"]).unwrap();
        assert_eq!(cli.action(), Action::Info);
    }

    #[test]
    fn test_mode_required_and_exclusive() {
        assert!(Cli::try_parse_from(["mediafetch", "https://x.com"]).is_err());
        assert!(Cli::try_parse_from(["mediafetch", "-a", "-v", "https://x.com"]).is_err());
    }

    #[test]
    fn test_url_optional_at_parse_time() {
        let cli = Cli::try_parse_from(["mediafetch", "-a"]).unwrap();
        assert!(cli.url.is_none());
    }
}
