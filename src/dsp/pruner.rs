//! Magnitude-threshold coefficient pruning
//!
//! Zeroes the quietest bins of each frame and estimates how many bytes the
//! surviving coefficients would take to store. Ranking is by raw magnitude;
//! there is no perceptual weighting.

use log::{debug, trace};
use num_traits::Zero;
use rustfft::num_complex::Complex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, WaveshaperError};
use crate::spectral::{Spectrogram, Spectrum};

/// Storage cost of one surviving complex coefficient
pub const BYTES_PER_COEFFICIENT: usize = 8;

/// Fixed per-frame header cost
pub const FRAME_HEADER_BYTES: usize = 16;

/// Fixed cost of the container holding all frames
pub const CONTAINER_OVERHEAD_BYTES: usize = 44;

/// Fraction of each frame's coefficients to discard, in `[0.0, 1.0)`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CompressionSettings {
    pub target_fraction: f64,
}

impl CompressionSettings {
    pub fn new(target_fraction: f64) -> Result<Self> {
        let settings = Self { target_fraction };
        settings.validate()?;
        Ok(settings)
    }

    /// No pruning
    pub fn lossless() -> Self {
        Self::default()
    }

    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.target_fraction) {
            return Err(WaveshaperError::InvalidCompressionFraction {
                value: self.target_fraction,
            });
        }
        Ok(())
    }

    /// Number of bins zeroed in a frame of `frame_size` bins
    pub fn prune_count(&self, frame_size: usize) -> usize {
        ((self.target_fraction * frame_size as f64).floor() as usize).min(frame_size)
    }
}

/// Estimated encoded size of a pruned spectrogram
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeEstimate {
    pub frames: usize,
    /// Non-zero coefficients left across all frames
    pub surviving_coefficients: usize,
    pub total_bytes: usize,
}

impl SizeEstimate {
    /// Ratio of the estimate to an uncompressed PCM size (1.0 = same size)
    pub fn compression_ratio(&self, original_pcm_bytes: usize) -> f64 {
        if original_pcm_bytes == 0 {
            return 0.0;
        }
        self.total_bytes as f64 / original_pcm_bytes as f64
    }
}

/// Bytes needed for one frame with `surviving` non-zero coefficients
pub fn frame_bytes(surviving: usize) -> usize {
    FRAME_HEADER_BYTES + surviving * BYTES_PER_COEFFICIENT
}

fn nonzero_count(bins: &[Complex<f64>]) -> usize {
    bins.iter().filter(|c| !c.is_zero()).count()
}

/// Zeroes the smallest-magnitude coefficients of spectra
#[derive(Debug, Clone, Copy, Default)]
pub struct CoefficientPruner;

impl CoefficientPruner {
    pub fn new() -> Self {
        Self
    }

    /// Prune one frame, returning the new spectrum and its estimated bytes
    ///
    /// Exactly `floor(target_fraction * frame_size)` bins are zeroed, taken in
    /// ascending magnitude order with ties broken by ascending bin index.
    pub fn prune(
        &self,
        spectrum: &Spectrum,
        settings: &CompressionSettings,
    ) -> Result<(Spectrum, usize)> {
        settings.validate()?;
        spectrum.check_bins()?;

        let count = settings.prune_count(spectrum.bins.len());
        if count == 0 {
            let bytes = frame_bytes(nonzero_count(&spectrum.bins));
            return Ok((spectrum.clone(), bytes));
        }

        let magnitudes = spectrum.magnitudes();
        let mut order: Vec<usize> = (0..magnitudes.len()).collect();
        // Stable sort keeps ascending index order among equal magnitudes
        order.sort_by(|&a, &b| magnitudes[a].total_cmp(&magnitudes[b]));

        let mut bins = spectrum.bins.clone();
        for &k in &order[..count] {
            bins[k] = Complex::zero();
        }

        let bytes = frame_bytes(nonzero_count(&bins));
        trace!(
            "pruned frame {}: {} of {} bins zeroed, {} bytes",
            spectrum.frame_index,
            count,
            bins.len(),
            bytes
        );
        Ok((spectrum.with_bins(bins), bytes))
    }

    /// Prune every frame and total the size estimate
    pub fn prune_all(
        &self,
        spectrogram: &Spectrogram,
        settings: &CompressionSettings,
    ) -> Result<(Spectrogram, SizeEstimate)> {
        settings.validate()?;

        let mut frame_total = 0;
        let pruned = spectrogram.try_map(|frame| {
            let (pruned, bytes) = self.prune(frame, settings)?;
            frame_total += bytes;
            Ok::<_, WaveshaperError>(pruned)
        })?;

        let surviving_coefficients = pruned.frames.iter().map(|f| nonzero_count(&f.bins)).sum();
        let estimate = SizeEstimate {
            frames: pruned.len(),
            surviving_coefficients,
            total_bytes: frame_total + CONTAINER_OVERHEAD_BYTES,
        };

        debug!(
            "prune: fraction={:.3}, {} frames, {} coefficients kept, ~{} bytes",
            settings.target_fraction,
            estimate.frames,
            estimate.surviving_coefficients,
            estimate.total_bytes
        );
        Ok((pruned, estimate))
    }
}
