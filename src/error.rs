//! Error types for WaveShaper
//!
//! Every engine operation is deterministic, so a failure on a given input
//! always fails the same way. Each error carries a recovery hint aimed at
//! the caller fixing the input rather than retrying.

use thiserror::Error;

/// Result type alias using WaveshaperError
pub type Result<T> = std::result::Result<T, WaveshaperError>;

/// All possible errors in WaveShaper
#[derive(Error, Debug)]
pub enum WaveshaperError {
    // Buffer errors
    #[error("Audio buffer is empty")]
    EmptyBuffer,

    #[error("Invalid sample rate: {sample_rate} Hz")]
    InvalidSampleRate { sample_rate: u32 },

    #[error("Non-finite sample at index {index}")]
    NonFiniteSample { index: usize },

    #[error("Invalid channel count: {channels}")]
    InvalidChannelCount { channels: u16 },

    // Transform errors
    #[error("Invalid frame parameters: frame_size={frame_size}, hop_size={hop_size} ({reason})")]
    InvalidFrameParameters {
        frame_size: usize,
        hop_size: usize,
        reason: String,
    },

    // Shaping errors
    #[error("Invalid {band} gain: {value} (valid range: {min}..={max})")]
    InvalidGain {
        band: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Invalid band cutoffs: bass={bass_hz} Hz, mid={mid_hz} Hz")]
    InvalidCutoffs { bass_hz: f64, mid_hz: f64 },

    #[error("Invalid compression fraction: {value} (valid range: 0.0..1.0)")]
    InvalidCompressionFraction { value: f64 },

    // Preview errors
    #[error("Invalid preview resolution: {resolution}")]
    InvalidResolution { resolution: usize },

    // Configuration errors
    #[error("Configuration error in {path}: {reason}")]
    ConfigError { path: String, reason: String },

    // Generic I/O
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl WaveshaperError {
    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyBuffer => "EMPTY_BUFFER",
            Self::InvalidSampleRate { .. } => "INVALID_SAMPLE_RATE",
            Self::NonFiniteSample { .. } => "NON_FINITE_SAMPLE",
            Self::InvalidChannelCount { .. } => "INVALID_CHANNEL_COUNT",
            Self::InvalidFrameParameters { .. } => "INVALID_FRAME_PARAMETERS",
            Self::InvalidGain { .. } => "INVALID_GAIN",
            Self::InvalidCutoffs { .. } => "INVALID_CUTOFFS",
            Self::InvalidCompressionFraction { .. } => "INVALID_COMPRESSION_FRACTION",
            Self::InvalidResolution { .. } => "INVALID_RESOLUTION",
            Self::ConfigError { .. } => "CONFIG_ERROR",
            Self::IoError(_) => "IO_ERROR",
            Self::SerializationError(_) => "SERIALIZATION_ERROR",
        }
    }

    /// Returns a suggested recovery action for this error
    pub fn recovery_hint(&self) -> &'static str {
        match self {
            Self::EmptyBuffer => "Load audio with at least one sample before processing",
            Self::InvalidSampleRate { .. } => "Use a positive sample rate such as 44100 or 48000 Hz",
            Self::NonFiniteSample { .. } => "Replace NaN or infinite samples before processing",
            Self::InvalidChannelCount { .. } => "Use at least one channel",
            Self::InvalidFrameParameters { .. } => {
                "Use a positive frame size (ideally a power of two) and 0 < hop size <= frame size"
            }
            Self::InvalidGain { .. } => "Keep each band gain between 0.0 and 4.0",
            Self::InvalidCutoffs { .. } => "Use cutoffs with 0 < bass cutoff < mid cutoff",
            Self::InvalidCompressionFraction { .. } => {
                "Use a compression fraction of at least 0.0 and strictly below 1.0"
            }
            Self::InvalidResolution { .. } => "Request at least one preview point",
            Self::ConfigError { .. } => "Fix the listed field in the configuration file",
            _ => "Check the error details and try again",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = WaveshaperError::InvalidFrameParameters {
            frame_size: 0,
            hop_size: 0,
            reason: "frame size must be positive".to_string(),
        };
        assert_eq!(err.error_code(), "INVALID_FRAME_PARAMETERS");
        assert_eq!(WaveshaperError::EmptyBuffer.error_code(), "EMPTY_BUFFER");
    }

    #[test]
    fn test_gain_error_message() {
        let err = WaveshaperError::InvalidGain {
            band: "bass",
            value: 4.0001,
            min: 0.0,
            max: 4.0,
        };
        assert!(err.to_string().contains("bass"));
        assert!(!err.recovery_hint().is_empty());
    }
}
