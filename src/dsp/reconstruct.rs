//! Reconstruction of shaped spectra into a playable buffer

use log::debug;
use serde::{Deserialize, Serialize};

use crate::audio::SampleBuffer;
use crate::error::{Result, WaveshaperError};
use crate::spectral::{SpectralTransform, Spectrogram};

/// How the reconstructed level is brought into `[-1, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputLevel {
    /// Clamp out-of-range samples, leave everything else untouched
    #[default]
    Clamp,
    /// Scale so the peak sits at full scale, then clamp
    NormalizePeak,
}

/// Inverse-transforms shaped spectra, preserving frame order and hop alignment
#[derive(Debug, Clone)]
pub struct Reconstructor {
    transform: SpectralTransform,
    output_level: OutputLevel,
}

impl Reconstructor {
    pub fn new(transform: SpectralTransform) -> Self {
        Self {
            transform,
            output_level: OutputLevel::default(),
        }
    }

    pub fn with_output_level(mut self, output_level: OutputLevel) -> Self {
        self.output_level = output_level;
        self
    }

    pub fn output_level(&self) -> OutputLevel {
        self.output_level
    }

    /// Rebuild a buffer from a spectrogram
    ///
    /// Frames may arrive in any order but their indices must be exactly
    /// `0..n` with the spectrogram's hop. Output samples are clamped to
    /// `[-1, 1]`. Spectra holding NaN or infinite coefficients are rejected.
    pub fn reconstruct(&self, mut spectrogram: Spectrogram) -> Result<SampleBuffer> {
        spectrogram.frames.sort_by_key(|frame| frame.frame_index);

        for (expected, frame) in spectrogram.frames.iter().enumerate() {
            if frame.frame_index != expected {
                return Err(WaveshaperError::InvalidFrameParameters {
                    frame_size: frame.frame_size,
                    hop_size: frame.hop_size,
                    reason: format!(
                        "frame sequence has a gap or duplicate at index {} (found {})",
                        expected, frame.frame_index
                    ),
                });
            }
            if frame.hop_size != spectrogram.hop_size {
                return Err(WaveshaperError::InvalidFrameParameters {
                    frame_size: frame.frame_size,
                    hop_size: frame.hop_size,
                    reason: format!(
                        "frame {} is not aligned to hop size {}",
                        frame.frame_index, spectrogram.hop_size
                    ),
                });
            }
        }

        let raw = self.transform.inverse(&spectrogram)?;
        let leveled = match self.output_level {
            OutputLevel::Clamp => raw,
            OutputLevel::NormalizePeak => raw.normalize_peak(1.0),
        };

        let sample_rate = leveled.sample_rate();
        let mut clamped = 0usize;
        let samples = leveled
            .into_samples()
            .into_iter()
            .map(|s| {
                if s.abs() > 1.0 {
                    clamped += 1;
                }
                s.clamp(-1.0, 1.0)
            })
            .collect();

        if clamped > 0 {
            debug!("reconstruct: clamped {} samples to [-1, 1]", clamped);
        }

        SampleBuffer::new(samples, sample_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spectral::SynthesisWindow;

    fn transform() -> SpectralTransform {
        SpectralTransform::new(256, 128, SynthesisWindow::Hann).unwrap()
    }

    fn sine(amplitude: f32) -> SampleBuffer {
        let samples = (0..2000)
            .map(|i| amplitude * (2.0 * std::f32::consts::PI * 500.0 * i as f32 / 8000.0).sin())
            .collect();
        SampleBuffer::new(samples, 8000).unwrap()
    }

    #[test]
    fn test_reconstruct_matches_input() {
        let buffer = sine(0.8);
        let spectra = transform().forward(&buffer).unwrap();
        let restored = Reconstructor::new(transform()).reconstruct(spectra).unwrap();
        assert!(restored.is_approx_equal(&buffer, 1e-6));
    }

    #[test]
    fn test_out_of_order_frames_are_reordered() {
        let buffer = sine(0.8);
        let mut spectra = transform().forward(&buffer).unwrap();
        spectra.frames.reverse();
        let restored = Reconstructor::new(transform()).reconstruct(spectra).unwrap();
        assert!(restored.is_approx_equal(&buffer, 1e-6));
    }

    #[test]
    fn test_missing_frame_rejected() {
        let mut spectra = transform().forward(&sine(0.8)).unwrap();
        spectra.frames.remove(3);
        let result = Reconstructor::new(transform()).reconstruct(spectra);
        assert!(matches!(
            result,
            Err(WaveshaperError::InvalidFrameParameters { .. })
        ));
    }

    #[test]
    fn test_misaligned_hop_rejected() {
        let mut spectra = transform().forward(&sine(0.8)).unwrap();
        spectra.frames[2].hop_size = 64;
        let result = Reconstructor::new(transform()).reconstruct(spectra);
        assert!(result.is_err());
    }

    #[test]
    fn test_output_is_clamped() {
        let mut spectra = transform().forward(&sine(0.9)).unwrap();
        for frame in &mut spectra.frames {
            for bin in &mut frame.bins {
                *bin *= 3.0;
            }
        }
        let restored = Reconstructor::new(transform()).reconstruct(spectra).unwrap();
        assert!(restored.samples().iter().all(|s| (-1.0..=1.0).contains(s)));
        assert_eq!(restored.peak(), 1.0);
    }

    #[test]
    fn test_non_finite_coefficients_rejected() {
        let mut spectra = transform().forward(&sine(0.5)).unwrap();
        spectra.frames[4].bins[10].re = f64::NAN;
        let result = Reconstructor::new(transform()).reconstruct(spectra);
        assert!(matches!(
            result,
            Err(WaveshaperError::NonFiniteSample { .. })
        ));
    }

    #[test]
    fn test_normalize_peak_level() {
        let spectra = transform().forward(&sine(0.25)).unwrap();
        let restored = Reconstructor::new(transform())
            .with_output_level(OutputLevel::NormalizePeak)
            .reconstruct(spectra)
            .unwrap();
        assert!((restored.peak() - 1.0).abs() < 1e-6);
    }
}
