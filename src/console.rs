use mediafetch::backend::YtDlpBackend;
use mediafetch::config::Config;
use mediafetch::controller::{JobView, PresentationController, SubmitOutcome};
use mediafetch::humanize::HumanDuration;
use mediafetch::job::{Metadata, Mode, RawJobInput};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;
use tokio::runtime::Handle;
use tracing::info;

use crate::cli::{Action, Cli};

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Terminal front end: status on stdout, failures on stderr
#[derive(Debug, Default)]
pub struct ConsoleView {
    started: Option<Instant>,
}

impl JobView for ConsoleView {
    fn set_submit_enabled(&mut self, enabled: bool) {
        // Disabled for the lifetime of a job; used here to time it
        if enabled {
            if let Some(started) = self.started.take() {
                info!(elapsed = %HumanDuration::from(started.elapsed()), "Job complete");
            }
        } else {
            self.started = Some(Instant::now());
        }
    }

    fn show_status(&mut self, message: &str) {
        println!("{}", message);
    }

    fn show_success(&mut self, saved_to: &Path) {
        println!("Download succeeded. Saved to: {}", saved_to.display());
    }

    fn show_failure(&mut self, message: &str) {
        eprintln!("Error: {}", message);
    }

    fn show_metadata(&mut self, metadata: &Metadata) {
        println!("\n{}", metadata);
    }
}

/// Run one CLI request through the controller. Exit code 0 on success, 1 otherwise.
pub async fn run(cli: Cli) -> Result<ExitCode, AnyError> {
    let config = match &cli.config {
        Some(path) => Config::load_from_path(path.clone())?,
        None => Config::load()?,
    };

    let backend = Arc::new(YtDlpBackend::from_config(&config.backend));
    let mut controller = PresentationController::new(Handle::current(), backend, ConsoleView::default());
    let url = cli.url.clone().unwrap_or_default();

    let mode = match cli.action() {
        Action::Info => {
            println!("Getting info for: {}", url);
            let probed = controller.on_metadata_request(&url).await;
            return Ok(exit_code(probed.is_ok()));
        }
        Action::Audio => Mode::Audio,
        Action::Video => Mode::Video,
    };

    let format_or_quality = match mode {
        Mode::Audio => cli
            .format
            .clone()
            .unwrap_or_else(|| config.defaults.audio_format.to_string()),
        Mode::Video => cli
            .quality
            .clone()
            .unwrap_or_else(|| config.defaults.video_quality.clone()),
    };

    let input = RawJobInput {
        url,
        output_dir: cli
            .output
            .clone()
            .unwrap_or_else(|| config.defaults.output_dir.display().to_string()),
        mode,
        format_or_quality,
        allow_playlist: cli.playlist || config.defaults.allow_playlist,
    };

    let event = match controller.on_submit(input) {
        SubmitOutcome::Finished(event) => event,
        SubmitOutcome::Started(_) => controller
            .wait_terminal()
            .await
            .ok_or("job finished without a terminal event")?,
        SubmitOutcome::Ignored => return Err("submission ignored: a job is already running".into()),
    };

    Ok(exit_code(event.result.is_success()))
}

fn exit_code(success: bool) -> ExitCode {
    if success { ExitCode::SUCCESS } else { ExitCode::from(1) }
}
