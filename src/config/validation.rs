use super::models::Config;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("backend.binary must not be empty")]
    MissingBinary,

    #[error("backend.audio_quality must be positive")]
    InvalidAudioQuality,

    #[error("backend.output_template '{template}' must contain %(ext)s")]
    InvalidOutputTemplate { template: String },

    #[error("backend.merge_output_format must not be empty")]
    MissingMergeFormat,

    #[error("defaults.video_quality must not be empty")]
    MissingVideoQuality,
}

/// Validate the entire configuration
pub fn validate(config: &Config) -> Result<(), ValidationError> {
    validate_backend(config)?;
    validate_defaults(config)?;
    Ok(())
}

fn validate_backend(config: &Config) -> Result<(), ValidationError> {
    let backend = &config.backend;

    if backend.binary.trim().is_empty() {
        return Err(ValidationError::MissingBinary);
    }

    if backend.audio_quality == 0 {
        return Err(ValidationError::InvalidAudioQuality);
    }

    // Without the extension placeholder every file lands under the same name
    if backend.output_template.trim().is_empty() || !backend.output_template.contains("%(ext)s") {
        return Err(ValidationError::InvalidOutputTemplate {
            template: backend.output_template.clone(),
        });
    }

    if backend.merge_output_format.trim().is_empty() {
        return Err(ValidationError::MissingMergeFormat);
    }

    Ok(())
}

/// `defaults.audio_format` is checked by deserialization
fn validate_defaults(config: &Config) -> Result<(), ValidationError> {
    if config.defaults.video_quality.trim().is_empty() {
        return Err(ValidationError::MissingVideoQuality);
    }

    Ok(())
}
