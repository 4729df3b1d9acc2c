//! Sample buffer implementation
//!
//! SampleBuffer holds decoded mono PCM with its sample rate. Buffers are
//! never empty, hold only finite samples, and are only ever read by the engine; every stage produces a
//! new buffer instead of writing into its input.

use crate::error::{Result, WaveshaperError};

/// Mono audio samples normalized to -1.0..1.0 with metadata
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<f32>,
    /// Sample rate in Hz
    sample_rate: u32,
}

impl SampleBuffer {
    /// Create a new mono buffer
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Result<Self> {
        if samples.is_empty() {
            return Err(WaveshaperError::EmptyBuffer);
        }
        if sample_rate == 0 {
            return Err(WaveshaperError::InvalidSampleRate { sample_rate });
        }
        if let Some(index) = samples.iter().position(|s| !s.is_finite()) {
            return Err(WaveshaperError::NonFiniteSample { index });
        }
        Ok(Self {
            samples,
            sample_rate,
        })
    }

    /// Create a mono buffer from interleaved multi-channel samples by
    /// averaging each frame across channels
    pub fn from_interleaved(samples: &[f32], channels: u16, sample_rate: u32) -> Result<Self> {
        if channels == 0 {
            return Err(WaveshaperError::InvalidChannelCount { channels });
        }
        let channels = channels as usize;
        if samples.len() % channels != 0 {
            return Err(WaveshaperError::InvalidChannelCount {
                channels: channels as u16,
            });
        }
        let mono = samples
            .chunks_exact(channels)
            .map(|frame| frame.iter().sum::<f32>() / channels as f32)
            .collect();
        Self::new(mono, sample_rate)
    }

    /// Create a silent buffer with the given duration
    pub fn silence(duration_secs: f32, sample_rate: u32) -> Result<Self> {
        let num_samples = (duration_secs * sample_rate as f32) as usize;
        Self::new(vec![0.0; num_samples], sample_rate)
    }

    /// Create a unit-amplitude sine wave test tone
    pub fn sine_wave(frequency: f32, duration_secs: f32, sample_rate: u32) -> Result<Self> {
        let num_samples = (duration_secs * sample_rate as f32) as usize;
        let samples = (0..num_samples)
            .map(|i| {
                let t = i as f64 / sample_rate as f64;
                (2.0 * std::f64::consts::PI * frequency as f64 * t).sin() as f32
            })
            .collect();
        Self::new(samples, sample_rate)
    }

    /// Get a reference to the samples
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Consume the buffer, returning its samples
    pub fn into_samples(self) -> Vec<f32> {
        self.samples
    }

    /// Get the sample rate
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of samples
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the buffer has no samples
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Get the duration in seconds
    pub fn duration(&self) -> f32 {
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Peak absolute amplitude
    pub fn peak(&self) -> f32 {
        self.samples.iter().map(|s| s.abs()).fold(0.0_f32, f32::max)
    }

    /// Return a copy scaled so its peak equals `target`
    ///
    /// Silent buffers are returned unchanged.
    pub fn normalize_peak(&self, target: f32) -> Self {
        let peak = self.peak();
        if peak <= 0.0 {
            return self.clone();
        }
        let gain = target / peak;
        Self {
            samples: self.samples.iter().map(|s| s * gain).collect(),
            sample_rate: self.sample_rate,
        }
    }

    /// Quantize to signed 16-bit PCM for a playback collaborator
    pub fn to_pcm16(&self) -> Vec<i16> {
        self.samples
            .iter()
            .map(|&s| (s.clamp(-1.0, 1.0) * i16::MAX as f32).round() as i16)
            .collect()
    }

    /// Check if buffers are approximately equal within tolerance
    pub fn is_approx_equal(&self, other: &SampleBuffer, tolerance: f32) -> bool {
        self.sample_rate == other.sample_rate
            && self.samples.len() == other.samples.len()
            && self
                .samples
                .iter()
                .zip(other.samples.iter())
                .all(|(a, b)| (a - b).abs() <= tolerance)
    }
}
