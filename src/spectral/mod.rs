//! Spectral decomposition
//!
//! Framed forward transform from a [`SampleBuffer`](crate::audio::SampleBuffer)
//! into a [`Spectrogram`], and weighted overlap-add back again.

mod spectrum;
mod transform;

pub use spectrum::{Spectrogram, Spectrum};
pub use transform::{forward, frame_count, inverse, SpectralTransform, SynthesisWindow};
