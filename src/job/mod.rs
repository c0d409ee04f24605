//! Job descriptions for mediafetch
//!
//! Raw front-end input ([`RawJobInput`]) is validated by [`build`] into an
//! immutable [`JobSpec`], which is all the worker and the backend ever see.
//!
//! ```rust
//! use mediafetch::job::{self, AudioFormat, RawJobInput};
//!
//! let input = RawJobInput::audio("https://soundcloud.com/a/b", "./out", "wav");
//! let spec = job::build(&input).unwrap();
//! assert_eq!(spec.audio_format(), Some(AudioFormat::Wav));
//! ```

mod builder;
mod types;

pub use builder::{DEFAULT_VIDEO_QUALITY, ValidationError, build, validate_url};
pub use types::{
    AudioFormat, DESCRIPTION_DISPLAY_CHARS, JobId, JobResult, JobSpec, JobState, MediaSelection,
    Metadata, Mode, RawJobInput,
};
