//! Job runner - drives one job through its state machine

use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{TerminalEvent, TerminalSender};
use crate::backend::MediaBackend;
use crate::job::{self, JobId, JobResult, JobSpec, JobState, Mode, RawJobInput};
use crate::observability::Metrics;

/// Executes exactly one job.
///
/// `submit` consumes the runner, so a runner can only be submitted once and
/// only from `Idle`. After the terminal event is sent the runner is dropped.
pub struct JobRunner {
    job_id: JobId,
    backend: Arc<dyn MediaBackend>,
    metrics: Arc<Metrics>,
    handle: Handle,
    state: JobState,
}

impl JobRunner {
    pub fn new(backend: Arc<dyn MediaBackend>, metrics: Arc<Metrics>, handle: Handle) -> Self {
        Self {
            job_id: Uuid::now_v7(),
            backend,
            metrics,
            handle,
            state: JobState::Idle,
        }
    }

    pub fn job_id(&self) -> JobId {
        self.job_id
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    /// Validate `input` and, if valid, dispatch the backend call to a worker task.
    ///
    /// Returns `Running` once the job is dispatched, or `Failed` when
    /// validation rejected it. In the failure case the terminal event has
    /// already been sent on `sink` and no backend call was made.
    pub fn submit(mut self, input: &RawJobInput, sink: TerminalSender) -> JobState {
        self.transition(JobState::Validating);

        let spec = match job::build(input) {
            Ok(spec) => spec,
            Err(err) => {
                warn!(job_id = %self.job_id, error = %err, "Job rejected");
                self.metrics.job_rejected();
                self.transition(JobState::Failed);
                self.report(sink, JobResult::failure(err.to_string()));
                return JobState::Failed;
            }
        };

        self.metrics.job_submitted();
        self.transition(JobState::Running);
        info!(
            job_id = %self.job_id,
            url = spec.url(),
            mode = %spec.mode(),
            output_dir = %spec.output_dir().display(),
            backend = self.backend.name(),
            "Job started"
        );

        let handle = self.handle.clone();
        handle.spawn(self.run(spec, sink));
        JobState::Running
    }

    async fn run(mut self, spec: JobSpec, sink: TerminalSender) {
        let result = self.execute(&spec).await;

        match &result {
            JobResult::Success { saved_to } => {
                info!(job_id = %self.job_id, saved_to = %saved_to.display(), "Job succeeded");
                self.metrics.job_succeeded();
                self.transition(JobState::Succeeded);
            }
            JobResult::Failure { message } => {
                warn!(job_id = %self.job_id, error = %message, "Job failed");
                self.metrics.job_failed();
                self.transition(JobState::Failed);
            }
        }

        self.report(sink, result);
    }

    /// Output directory first, then exactly one backend call
    async fn execute(&self, spec: &JobSpec) -> JobResult {
        let output_dir = spec.output_dir();
        if let Err(e) = tokio::fs::create_dir_all(output_dir).await {
            return JobResult::failure(format!(
                "failed to create output directory {}: {}",
                output_dir.display(),
                e
            ));
        }

        let outcome = match spec.mode() {
            Mode::Audio => self.backend.fetch_audio(spec).await,
            Mode::Video => self.backend.fetch_video(spec).await,
        };

        // Partial files from a failed fetch are left to the backend
        match outcome {
            Ok(saved_to) => JobResult::Success { saved_to },
            Err(err) => JobResult::Failure {
                message: err.to_string(),
            },
        }
    }

    fn transition(&mut self, next: JobState) {
        debug!(job_id = %self.job_id, from = %self.state, to = %next, "Job state transition");
        self.state = next;
    }

    fn report(&self, sink: TerminalSender, result: JobResult) {
        let event = TerminalEvent {
            job_id: self.job_id,
            result,
        };

        if sink.send(event).is_err() {
            warn!(job_id = %self.job_id, "Terminal event dropped: receiver gone");
        }
    }
}
