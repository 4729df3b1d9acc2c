//! Spectrum and spectrogram types

use rustfft::num_complex::Complex;

use crate::error::{Result, WaveshaperError};

/// Complex coefficients for one frame of audio
///
/// `bins.len() == frame_size`. Bins above `frame_size / 2` are the conjugate
/// mirror of the lower half for real-valued input.
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrum {
    pub bins: Vec<Complex<f64>>,
    pub frame_size: usize,
    pub sample_rate: u32,
    /// Position of this frame within the source buffer, in frames
    pub frame_index: usize,
    /// Frame advance step in samples
    pub hop_size: usize,
}

impl Spectrum {
    /// New spectrum with this frame's metadata and the given bins
    pub fn with_bins(&self, bins: Vec<Complex<f64>>) -> Self {
        Self {
            bins,
            frame_size: self.frame_size,
            sample_rate: self.sample_rate,
            frame_index: self.frame_index,
            hop_size: self.hop_size,
        }
    }

    /// Ensure the bin count matches `frame_size`
    pub fn check_bins(&self) -> Result<()> {
        if self.frame_size == 0 || self.bins.len() != self.frame_size {
            return Err(WaveshaperError::InvalidFrameParameters {
                frame_size: self.frame_size,
                hop_size: self.hop_size,
                reason: format!(
                    "frame {} has {} bins, expected {}",
                    self.frame_index,
                    self.bins.len(),
                    self.frame_size
                ),
            });
        }
        Ok(())
    }

    /// Frequency in Hz of bin `k`, folding mirrored bins onto their
    /// positive-frequency twin
    pub fn bin_frequency(&self, k: usize) -> f64 {
        if self.frame_size == 0 {
            return 0.0;
        }
        let folded = k.min(self.frame_size.saturating_sub(k));
        folded as f64 * self.sample_rate as f64 / self.frame_size as f64
    }

    /// Nyquist frequency for this frame's sample rate
    pub fn nyquist(&self) -> f64 {
        self.sample_rate as f64 / 2.0
    }

    /// Index of this frame's first sample in the source buffer
    pub fn start_sample(&self) -> usize {
        self.frame_index * self.hop_size
    }

    pub fn magnitudes(&self) -> Vec<f64> {
        self.bins.iter().map(|c| c.norm()).collect()
    }

    /// Number of bins that are exactly zero
    pub fn zero_count(&self) -> usize {
        self.bins
            .iter()
            .filter(|c| c.re == 0.0 && c.im == 0.0)
            .count()
    }

    /// Sum of squared magnitudes of bins whose frequency lies in `[low_hz, high_hz)`
    pub fn band_energy(&self, low_hz: f64, high_hz: f64) -> f64 {
        self.bins
            .iter()
            .enumerate()
            .filter(|(k, _)| {
                let f = self.bin_frequency(*k);
                f >= low_hz && f < high_hz
            })
            .map(|(_, c)| c.norm_sqr())
            .sum()
    }
}

/// Ordered frames of a buffer together with the framing used to produce them
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    pub frames: Vec<Spectrum>,
    pub frame_size: usize,
    pub hop_size: usize,
    pub sample_rate: u32,
    /// Length of the analysed buffer; reconstruction trims padding back to it
    pub source_len: usize,
}

impl Spectrogram {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Apply `f` to every frame, keeping the framing metadata
    pub fn try_map<F, E>(&self, mut f: F) -> std::result::Result<Self, E>
    where
        F: FnMut(&Spectrum) -> std::result::Result<Spectrum, E>,
    {
        let frames = self.frames.iter().map(&mut f).collect::<std::result::Result<Vec<_>, E>>()?;
        Ok(Self {
            frames,
            frame_size: self.frame_size,
            hop_size: self.hop_size,
            sample_rate: self.sample_rate,
            source_len: self.source_len,
        })
    }

    /// Energy in `[low_hz, high_hz)` summed over all frames
    pub fn band_energy(&self, low_hz: f64, high_hz: f64) -> f64 {
        self.frames
            .iter()
            .map(|frame| frame.band_energy(low_hz, high_hz))
            .sum()
    }
}
