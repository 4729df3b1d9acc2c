//! WaveShaper - frequency-domain audio engine
//!
//! Decomposes a mono waveform into overlapping spectral frames, reshapes the
//! frames with three-band gain and magnitude-based coefficient pruning, and
//! reconstructs a playable buffer together with a size estimate and
//! waveform previews.
//!
//! # Pipeline
//!
//! ```text
//! SampleBuffer -> SpectralTransform::forward -> Spectrogram
//!              -> BandGainShaper -> CoefficientPruner
//!              -> Reconstructor -> SampleBuffer -> WaveformSampler
//! ```
//!
//! Each stage is a pure function over its inputs. File decoding, playback
//! and rendering are left to the host application.

pub mod audio;
pub mod cli;
pub mod config;
pub mod dsp;
pub mod engine;
pub mod error;
pub mod preview;
pub mod spectral;

// Re-export commonly used types
pub use audio::SampleBuffer;
pub use config::EngineConfig;
pub use dsp::{CompressionSettings, EqSettings, SizeEstimate};
pub use engine::{Engine, ProcessedAudio};
pub use error::{Result, WaveshaperError};
pub use preview::{PreviewMode, PreviewPair, WaveformPreview};
pub use spectral::{Spectrogram, Spectrum};
