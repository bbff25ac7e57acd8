use thiserror::Error;

/// Errors surfaced by effect selection, engine construction, and conversion.
///
/// Numeric overflow and resample length changes are not errors: samples are
/// saturated on store and the output length is visible on the returned block.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Unknown effect '{name}'")]
    UnknownEffect { name: String },

    #[error(
        "Ring buffer capacity must be between 1 and {max} samples",
        max = crate::dsp::ring_buffer::MAX_CAPACITY
    )]
    InvalidCapacity,

    #[error("Sample rate must be positive, got {rate}")]
    InvalidSampleRate { rate: u32 },

    #[error("Invalid parameter for {effect}: {reason}")]
    InvalidParameter { effect: &'static str, reason: String },

    #[error("Unsupported input format: {channels} channel(s), {bits} bits per sample")]
    UnsupportedFormat { channels: u16, bits: u16 },

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[cfg(feature = "wav")]
    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),
}

impl EngineError {
    /// True for errors caused by a bad effect identifier or parameter set.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            EngineError::UnknownEffect { .. }
                | EngineError::InvalidCapacity
                | EngineError::InvalidSampleRate { .. }
                | EngineError::InvalidParameter { .. }
                | EngineError::Config(_)
        )
    }

    pub(crate) fn invalid(effect: &'static str, reason: impl Into<String>) -> Self {
        EngineError::InvalidParameter {
            effect,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configuration_errors_are_classified() {
        assert!(EngineError::UnknownEffect { name: "Reverb".into() }.is_configuration());
        assert!(EngineError::InvalidCapacity.is_configuration());
        assert!(EngineError::InvalidSampleRate { rate: 0 }.is_configuration());
        assert!(!EngineError::UnsupportedFormat { channels: 2, bits: 16 }.is_configuration());
    }

    #[test]
    fn display_names_the_effect() {
        let err = EngineError::UnknownEffect { name: "Chipmunk".into() };
        assert_eq!(format!("{err}"), "Unknown effect 'Chipmunk'");
        let err = EngineError::invalid("echo", "delay must be at least one sample");
        assert_eq!(
            format!("{err}"),
            "Invalid parameter for echo: delay must be at least one sample"
        );
    }
}
