use std::path::Path;

use crate::job::Metadata;

/// Rendering surface driven by the controller.
///
/// All calls happen on the interaction thread that owns the controller.
pub trait JobView {
    /// Enable or disable the submission control
    fn set_submit_enabled(&mut self, enabled: bool);

    /// Transient status line (validating, downloading, probing)
    fn show_status(&mut self, message: &str);

    fn show_success(&mut self, saved_to: &Path);

    fn show_failure(&mut self, message: &str);

    fn show_metadata(&mut self, metadata: &Metadata);
}
