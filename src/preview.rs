//! Waveform previews for rendering
//!
//! Downsamples a buffer to a fixed number of amplitude points. The buffer
//! is split into `resolution` windows of equal width with the final window
//! absorbing the remainder.

use serde::{Deserialize, Serialize};

use crate::audio::SampleBuffer;
use crate::error::{Result, WaveshaperError};

/// Default number of preview points
pub const DEFAULT_RESOLUTION: usize = 500;

/// Per-window amplitude statistic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewMode {
    /// Peak absolute amplitude; keeps transients visible
    #[default]
    Peak,
    /// Root mean square amplitude
    Rms,
}

/// Fixed-length amplitude envelope of a buffer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaveformPreview {
    pub points: Vec<f32>,
    pub mode: PreviewMode,
}

impl WaveformPreview {
    pub fn resolution(&self) -> usize {
        self.points.len()
    }
}

/// Original and processed previews, rendered side by side
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewPair {
    pub original: WaveformPreview,
    pub processed: WaveformPreview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveformSampler {
    resolution: usize,
    mode: PreviewMode,
}

impl WaveformSampler {
    pub fn new(resolution: usize, mode: PreviewMode) -> Result<Self> {
        if resolution == 0 {
            return Err(WaveshaperError::InvalidResolution { resolution });
        }
        Ok(Self { resolution, mode })
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn mode(&self) -> PreviewMode {
        self.mode
    }

    pub fn sample(&self, buffer: &SampleBuffer) -> WaveformPreview {
        let samples = buffer.samples();
        let len = samples.len();
        // Buffers shorter than the resolution get one sample per point and
        // zero-filled trailing points
        let width = (len / self.resolution).max(1);

        let points = (0..self.resolution)
            .map(|i| {
                let start = i * width;
                let end = if i + 1 == self.resolution {
                    len
                } else {
                    (start + width).min(len)
                };
                if start >= end {
                    return 0.0;
                }
                window_value(&samples[start..end], self.mode)
            })
            .collect();

        WaveformPreview {
            points,
            mode: self.mode,
        }
    }

    pub fn sample_pair(&self, original: &SampleBuffer, processed: &SampleBuffer) -> PreviewPair {
        PreviewPair {
            original: self.sample(original),
            processed: self.sample(processed),
        }
    }
}

impl Default for WaveformSampler {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            mode: PreviewMode::Peak,
        }
    }
}

fn window_value(window: &[f32], mode: PreviewMode) -> f32 {
    match mode {
        PreviewMode::Peak => window.iter().map(|s| s.abs()).fold(0.0_f32, f32::max),
        PreviewMode::Rms => {
            let sum: f64 = window.iter().map(|&s| (s as f64) * (s as f64)).sum();
            (sum / window.len() as f64).sqrt() as f32
        }
    }
}

/// Peak preview of `buffer` with `resolution` points
pub fn sample(buffer: &SampleBuffer, resolution: usize) -> Result<WaveformPreview> {
    Ok(WaveformSampler::new(resolution, PreviewMode::Peak)?.sample(buffer))
}
