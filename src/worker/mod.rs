//! Job execution off the interaction thread
//!
//! A [`JobRunner`] owns one job from submission to its terminal event. The
//! backend call runs on a task spawned for that job alone; the result comes
//! back over a oneshot channel, so each job can report at most once.

pub mod runner;

pub use runner::JobRunner;

use tokio::sync::oneshot;

use crate::job::{JobId, JobResult};

/// Single success/failure notification for a job
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerminalEvent {
    pub job_id: JobId,
    pub result: JobResult,
}

pub type TerminalSender = oneshot::Sender<TerminalEvent>;
pub type TerminalReceiver = oneshot::Receiver<TerminalEvent>;

/// Channel carrying one job's terminal event
pub fn terminal_channel() -> (TerminalSender, TerminalReceiver) {
    oneshot::channel()
}
