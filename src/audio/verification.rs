//! Audio verification utilities
//!
//! Objective level measurements for checking engine output without
//! listening to it.
//!
//! # Measurements
//! - RMS (Root Mean Square) level
//! - Peak level
//! - Crest factor (peak/RMS ratio)
//! - Clipping detection
//! - DC offset detection
//! - Magnitude at a frequency (Hann-windowed FFT)

use crate::audio::SampleBuffer;
use rustfft::{num_complex::Complex, FftPlanner};
use serde::Serialize;

/// Threshold for considering a sample as clipped (at digital maximum)
const CLIP_THRESHOLD: f32 = 0.9999;

/// Convert linear amplitude to decibels
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        f32::NEG_INFINITY
    } else {
        20.0 * linear.log10()
    }
}

/// Level measurements for one buffer
#[derive(Debug, Clone, Serialize)]
pub struct AudioAnalysis {
    /// RMS level in linear scale (0.0 to 1.0+)
    pub rms_linear: f32,
    /// RMS level in decibels (relative to 0 dBFS)
    pub rms_db: f32,
    /// Peak level in linear scale
    pub peak_linear: f32,
    /// Peak level in decibels
    pub peak_db: f32,
    /// Crest factor (peak/RMS) in dB
    pub crest_factor_db: f32,
    /// Number of samples at the digital maximum
    pub clipped_samples: usize,
    /// DC offset (mean of all samples)
    pub dc_offset: f32,
    /// Duration in seconds
    pub duration: f32,
    pub sample_rate: u32,
}

impl AudioAnalysis {
    /// Analyze a sample buffer
    pub fn analyze(buffer: &SampleBuffer) -> Self {
        let samples = buffer.samples();

        let rms_linear = calculate_rms(samples);
        let rms_db = linear_to_db(rms_linear);
        let peak_linear = calculate_peak(samples);
        let peak_db = linear_to_db(peak_linear);

        let crest_factor_db = if rms_linear > 0.0 {
            peak_db - rms_db
        } else {
            0.0
        };

        Self {
            rms_linear,
            rms_db,
            peak_linear,
            peak_db,
            crest_factor_db,
            clipped_samples: count_clipped_samples(samples),
            dc_offset: calculate_dc_offset(samples),
            duration: buffer.duration(),
            sample_rate: buffer.sample_rate(),
        }
    }

    /// Check if audio is silent (RMS below threshold)
    pub fn is_silent(&self, threshold_db: f32) -> bool {
        self.rms_db < threshold_db
    }

    /// Generate a summary string for display
    pub fn summary(&self) -> String {
        let mut s = format!(
            "Duration: {:.2}s @ {} Hz\n\
             RMS: {:.1} dBFS | Peak: {:.1} dBFS | Crest: {:.1} dB\n\
             DC Offset: {:.4}",
            self.duration,
            self.sample_rate,
            self.rms_db,
            self.peak_db,
            self.crest_factor_db,
            self.dc_offset
        );

        if self.clipped_samples > 0 {
            s.push_str(&format!("\nClipping: {} samples", self.clipped_samples));
        }

        s
    }
}

/// Calculate RMS (Root Mean Square) of samples
pub fn calculate_rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_squares / samples.len() as f64).sqrt() as f32
}

/// Calculate peak (maximum absolute value) of samples
pub fn calculate_peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0_f32, f32::max)
}

/// Count samples that are clipped (at or near digital maximum)
pub fn count_clipped_samples(samples: &[f32]) -> usize {
    samples.iter().filter(|s| s.abs() >= CLIP_THRESHOLD).count()
}

/// Calculate DC offset (mean of samples)
pub fn calculate_dc_offset(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f64 = samples.iter().map(|&s| s as f64).sum();
    (sum / samples.len() as f64) as f32
}

/// Magnitude in dB at the bin nearest `frequency`, measured over the first
/// `fft_size` samples with a Hann window
pub fn magnitude_at_frequency(buffer: &SampleBuffer, frequency: f32, fft_size: usize) -> f32 {
    let samples = buffer.samples();
    if fft_size == 0 || samples.len() < fft_size {
        return f32::NEG_INFINITY;
    }

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(fft_size);

    let mut bins: Vec<Complex<f32>> = samples
        .iter()
        .take(fft_size)
        .enumerate()
        .map(|(i, &s)| {
            let window =
                0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / fft_size as f32).cos());
            Complex::new(s * window, 0.0)
        })
        .collect();
    fft.process(&mut bins);

    let bin_hz = buffer.sample_rate() as f32 / fft_size as f32;
    let target_bin = (frequency / bin_hz).round() as usize;

    bins.get(target_bin)
        .filter(|_| target_bin <= fft_size / 2)
        .map(|c| linear_to_db(c.norm() / (fft_size as f32 / 2.0)))
        .unwrap_or(f32::NEG_INFINITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rms_sine_wave() {
        // A sine wave with amplitude 1.0 should have RMS of ~0.707
        let buffer = SampleBuffer::sine_wave(440.0, 1.0, 44100).unwrap();
        let rms = calculate_rms(buffer.samples());
        assert!((rms - 0.707).abs() < 0.01);
    }

    #[test]
    fn test_peak_sine_wave() {
        let buffer = SampleBuffer::sine_wave(440.0, 1.0, 44100).unwrap();
        let peak = calculate_peak(buffer.samples());
        assert!((peak - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_db_conversion() {
        assert!((linear_to_db(1.0) - 0.0).abs() < 0.001);
        assert!((linear_to_db(0.5) - (-6.02)).abs() < 0.1);
        assert_eq!(linear_to_db(0.0), f32::NEG_INFINITY);
    }

    #[test]
    fn test_audio_analysis() {
        let buffer = SampleBuffer::sine_wave(440.0, 1.0, 44100)
            .unwrap()
            .normalize_peak(0.9);
        let analysis = AudioAnalysis::analyze(&buffer);

        // RMS of 0.9 amplitude sine: 0.9 * 0.707 = 0.636, or about -3.9 dB
        assert!((analysis.rms_db - (-3.9)).abs() < 0.2);
        assert!((analysis.peak_db - (-0.9)).abs() < 0.2);
        assert!((analysis.crest_factor_db - 3.01).abs() < 0.1);
        assert_eq!(analysis.clipped_samples, 0);
        assert!(analysis.dc_offset.abs() < 0.01);
        assert!(!analysis.is_silent(-60.0));
        assert!(analysis.summary().contains("@ 44100 Hz"));
        assert!(!analysis.summary().contains("Clipping"));
    }

    #[test]
    fn test_silence_and_clipping_summary() {
        let silent = AudioAnalysis::analyze(&SampleBuffer::silence(0.1, 8000).unwrap());
        assert!(silent.is_silent(-60.0));

        let clipped = SampleBuffer::new(vec![1.0, -1.0, 0.2, 0.0], 8000).unwrap();
        let analysis = AudioAnalysis::analyze(&clipped);
        assert_eq!(analysis.clipped_samples, 2);
        assert!(analysis.summary().contains("Clipping: 2 samples"));
    }

    #[test]
    fn test_magnitude_at_frequency() {
        let buffer = SampleBuffer::sine_wave(440.0, 1.0, 44100).unwrap();
        let mag_440 = magnitude_at_frequency(&buffer, 440.0, 4096);
        let mag_1000 = magnitude_at_frequency(&buffer, 1000.0, 4096);
        assert!(mag_440 > mag_1000 + 20.0);
    }
}
