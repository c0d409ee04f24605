//! Human-readable duration formatting

use std::fmt;
use std::time::Duration;

/// Duration rendered as `m:ss` or `h:mm:ss`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct HumanDuration(pub Duration);

impl HumanDuration {
    /// Negative, non-finite and out-of-range inputs clamp to zero
    pub fn from_secs_f64(secs: f64) -> Self {
        Self(Duration::try_from_secs_f64(secs).unwrap_or(Duration::ZERO))
    }
}

impl fmt::Display for HumanDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Round to the nearest second so 59.6s prints as 1:00
        let total = (self.0.as_millis() + 500) / 1000;
        let hours = total / 3600;
        let minutes = (total % 3600) / 60;
        let seconds = total % 60;

        if hours > 0 {
            write!(f, "{}:{:02}:{:02}", hours, minutes, seconds)
        } else {
            write!(f, "{}:{:02}", minutes, seconds)
        }
    }
}

impl From<Duration> for HumanDuration {
    fn from(value: Duration) -> Self {
        Self(value)
    }
}
