//! Presentation controller: the boundary the interactive front end talks to
//!
//! The controller lives on the interaction thread and is the only owner of
//! UI-facing state (job state flag, in-flight job, view). Submissions go
//! through [`PresentationController::on_submit`]; the worker reports back over
//! a oneshot channel that the front end drains with
//! [`PresentationController::poll_terminal`] (per frame) or
//! [`PresentationController::wait_terminal`].

mod view;

pub use view::JobView;

use std::sync::Arc;
use thiserror::Error;
use tokio::runtime::Handle;
use tokio::sync::oneshot::error::TryRecvError;
use tracing::{debug, info};

use crate::backend::{BackendError, MediaBackend};
use crate::job::{self, JobId, JobResult, JobState, Metadata, RawJobInput, ValidationError};
use crate::observability::Metrics;
use crate::worker::{JobRunner, TerminalEvent, TerminalReceiver, terminal_channel};

const LOST_WORKER_MESSAGE: &str = "job worker exited without reporting";

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// What happened to a submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Dispatched to a worker; the terminal event arrives later
    Started(JobId),
    /// Rejected by validation; already rendered
    Finished(TerminalEvent),
    /// A job is still running; nothing changed
    Ignored,
}

struct InFlight {
    job_id: JobId,
    events: TerminalReceiver,
}

pub struct PresentationController<V: JobView> {
    backend: Arc<dyn MediaBackend>,
    metrics: Arc<Metrics>,
    handle: Handle,
    view: V,
    state: JobState,
    in_flight: Option<InFlight>,
}

impl<V: JobView> PresentationController<V> {
    /// `handle` is the runtime worker tasks are spawned on
    pub fn new(handle: Handle, backend: Arc<dyn MediaBackend>, mut view: V) -> Self {
        view.set_submit_enabled(true);
        Self {
            backend,
            metrics: Arc::new(Metrics::new()),
            handle,
            view,
            state: JobState::Idle,
            in_flight: None,
        }
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn in_flight_job(&self) -> Option<JobId> {
        self.in_flight.as_ref().map(|job| job.job_id)
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    /// Submit a job. A no-op while another job is running.
    pub fn on_submit(&mut self, input: RawJobInput) -> SubmitOutcome {
        if let Some(job) = &self.in_flight {
            debug!(job_id = %job.job_id, "Submission ignored: job still running");
            return SubmitOutcome::Ignored;
        }

        self.state = JobState::Validating;
        self.view.set_submit_enabled(false);
        self.view.show_status("Validating input...");

        let runner = JobRunner::new(self.backend.clone(), self.metrics.clone(), self.handle.clone());
        let job_id = runner.job_id();
        let (sink, mut events) = terminal_channel();

        match runner.submit(&input, sink) {
            JobState::Running => {
                self.state = JobState::Running;
                self.view.show_status("Downloading... please wait");
                self.in_flight = Some(InFlight { job_id, events });
                SubmitOutcome::Started(job_id)
            }
            _ => {
                // Validation failures are reported synchronously
                let event = events.try_recv().unwrap_or_else(|_| lost_worker(job_id));
                SubmitOutcome::Finished(self.finish(event))
            }
        }
    }

    /// Non-blocking check for the in-flight job's terminal event.
    ///
    /// Returns the event once, after rendering it and re-enabling submission.
    pub fn poll_terminal(&mut self) -> Option<TerminalEvent> {
        let in_flight = self.in_flight.as_mut()?;

        let event = match in_flight.events.try_recv() {
            Ok(event) => event,
            Err(TryRecvError::Empty) => return None,
            Err(TryRecvError::Closed) => lost_worker(in_flight.job_id),
        };

        self.in_flight = None;
        Some(self.finish(event))
    }

    /// Wait for the in-flight job's terminal event. `None` when idle.
    ///
    /// Cancel safe: dropping the future leaves the job in flight.
    pub async fn wait_terminal(&mut self) -> Option<TerminalEvent> {
        let in_flight = self.in_flight.as_mut()?;

        let event = match (&mut in_flight.events).await {
            Ok(event) => event,
            Err(_) => lost_worker(in_flight.job_id),
        };

        self.in_flight = None;
        Some(self.finish(event))
    }

    /// Probe `url` and render its metadata. Awaited directly by the caller;
    /// no job is created and the job state is left untouched.
    pub async fn on_metadata_request(&mut self, url: &str) -> Result<Metadata, ControllerError> {
        let url = match job::validate_url(url) {
            Ok(url) => url,
            Err(err) => {
                self.view.show_failure(&err.to_string());
                return Err(err.into());
            }
        };

        self.metrics.probe();
        self.view.show_status("Fetching info...");
        debug!(url, backend = self.backend.name(), "Probing");

        match self.backend.probe(url).await {
            Ok(metadata) => {
                self.view.show_metadata(&metadata);
                Ok(metadata)
            }
            Err(err) => {
                self.view.show_failure(err.message());
                Err(err.into())
            }
        }
    }

    fn finish(&mut self, event: TerminalEvent) -> TerminalEvent {
        self.state = if event.result.is_success() {
            JobState::Succeeded
        } else {
            JobState::Failed
        };

        match &event.result {
            JobResult::Success { saved_to } => self.view.show_success(saved_to),
            JobResult::Failure { message } => self.view.show_failure(message),
        }

        info!(job_id = %event.job_id, state = %self.state, "Job finished");

        self.view.set_submit_enabled(true);
        self.state = JobState::Idle;
        event
    }
}

fn lost_worker(job_id: JobId) -> TerminalEvent {
    TerminalEvent {
        job_id,
        result: JobResult::failure(LOST_WORKER_MESSAGE),
    }
}
