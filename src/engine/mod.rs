//! Processing pipeline
//!
//! Runs one full recompute: forward transform, EQ, pruning, reconstruction
//! and previews of both buffers. The engine holds no mutable state, so one
//! instance can serve concurrent callers that each bring their own buffers.
//! Debouncing and cancellation of stale requests are up to the caller.

use log::{debug, info};
use serde::Serialize;

use crate::audio::SampleBuffer;
use crate::config::EngineConfig;
use crate::dsp::{
    BandGainShaper, CoefficientPruner, CompressionSettings, EqSettings, Reconstructor,
    SizeEstimate,
};
use crate::error::Result;
use crate::preview::{PreviewPair, WaveformSampler};
use crate::spectral::SpectralTransform;

/// Result of one recompute
#[derive(Debug, Clone)]
pub struct ProcessedAudio {
    /// Buffer for the playback collaborator
    pub buffer: SampleBuffer,
    /// Original and processed previews for rendering
    pub previews: PreviewPair,
    /// Estimated size for display
    pub size: SizeEstimate,
}

/// Summary of a recompute, for logs and reports
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingSummary {
    pub samples: usize,
    pub sample_rate: u32,
    pub frames: usize,
    pub estimated_bytes: usize,
    pub pcm16_bytes: usize,
    pub compression_ratio: f64,
}

impl ProcessedAudio {
    pub fn summary(&self) -> ProcessingSummary {
        let pcm16_bytes = self.buffer.len() * std::mem::size_of::<i16>();
        ProcessingSummary {
            samples: self.buffer.len(),
            sample_rate: self.buffer.sample_rate(),
            frames: self.size.frames,
            estimated_bytes: self.size.total_bytes,
            pcm16_bytes,
            compression_ratio: self.size.compression_ratio(pcm16_bytes),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    transform: SpectralTransform,
    shaper: BandGainShaper,
    pruner: CoefficientPruner,
    reconstructor: Reconstructor,
    sampler: WaveformSampler,
}

impl Engine {
    /// Build every stage from a validated config
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;

        let transform = SpectralTransform::new(config.frame_size, config.hop_size, config.window)?;
        let shaper = BandGainShaper::with_cutoffs(config.bass_cutoff_hz, config.mid_cutoff_hz)?;
        let reconstructor =
            Reconstructor::new(transform.clone()).with_output_level(config.output_level);
        let sampler = WaveformSampler::new(config.preview_resolution, config.preview_mode)?;

        info!(
            "Engine ready: frame_size={}, hop_size={}, window={:?}",
            config.frame_size, config.hop_size, config.window
        );

        Ok(Self {
            config,
            transform,
            shaper,
            pruner: CoefficientPruner::new(),
            reconstructor,
            sampler,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Forward → EQ → prune → reconstruct → previews
    pub fn process(
        &self,
        buffer: &SampleBuffer,
        eq: &EqSettings,
        compression: &CompressionSettings,
    ) -> Result<ProcessedAudio> {
        eq.validate()?;
        compression.validate()?;

        let spectra = self.transform.forward(buffer)?;
        let shaped = self.shaper.apply_all(&spectra, eq)?;
        let (pruned, size) = self.pruner.prune_all(&shaped, compression)?;
        let processed = self.reconstructor.reconstruct(pruned)?;
        let previews = self.sampler.sample_pair(buffer, &processed);

        debug!(
            "processed {} samples in {} frames, ~{} bytes",
            processed.len(),
            size.frames,
            size.total_bytes
        );

        Ok(ProcessedAudio {
            buffer: processed,
            previews,
            size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WaveshaperError;

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_engine_is_send_sync() {
        assert_send_sync::<Engine>();
    }

    #[test]
    fn test_flat_settings_pass_through() {
        let engine = Engine::new(EngineConfig::default()).unwrap();
        let input = SampleBuffer::sine_wave(440.0, 0.5, 44100)
            .unwrap()
            .normalize_peak(0.5);
        let output = engine
            .process(&input, &EqSettings::flat(), &CompressionSettings::lossless())
            .unwrap();

        assert!(output.buffer.is_approx_equal(&input, 1e-6));
        assert_eq!(output.previews.original, output.previews.processed);
        assert_eq!(output.previews.original.resolution(), 500);
    }

    #[test]
    fn test_invalid_settings_rejected_before_processing() {
        let engine = Engine::new(EngineConfig::default()).unwrap();
        let input = SampleBuffer::sine_wave(440.0, 0.1, 44100).unwrap();
        let bad_eq = EqSettings {
            bass_gain: 4.0001,
            ..EqSettings::flat()
        };
        assert!(matches!(
            engine.process(&input, &bad_eq, &CompressionSettings::lossless()),
            Err(WaveshaperError::InvalidGain { .. })
        ));
        let bad_compression = CompressionSettings {
            target_fraction: 1.0,
        };
        assert!(matches!(
            engine.process(&input, &EqSettings::flat(), &bad_compression),
            Err(WaveshaperError::InvalidCompressionFraction { .. })
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EngineConfig {
            hop_size: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            Engine::new(config),
            Err(WaveshaperError::InvalidFrameParameters { .. })
        ));
    }

    #[test]
    fn test_summary_reports_ratio() {
        let engine = Engine::new(EngineConfig::default()).unwrap();
        let input = SampleBuffer::sine_wave(440.0, 0.5, 44100).unwrap();
        let output = engine
            .process(&input, &EqSettings::flat(), &CompressionSettings::new(0.9).unwrap())
            .unwrap();
        let summary = output.summary();
        assert_eq!(summary.samples, input.len());
        assert_eq!(summary.pcm16_bytes, input.len() * 2);
        assert!(summary.compression_ratio > 0.0);
    }
}
