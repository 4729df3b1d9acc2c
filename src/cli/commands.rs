//! CLI Command Implementations

use std::fs;
use std::path::Path;

use log::{info, warn};
use serde::Serialize;

use crate::audio::{AudioAnalysis, SampleBuffer};
use crate::cli::ProcessArgs;
use crate::config::EngineConfig;
use crate::dsp::{CompressionSettings, EqSettings};
use crate::engine::{Engine, ProcessingSummary};
use crate::error::Result;

/// Processed output below this RMS level is reported as silent
const SILENCE_THRESHOLD_DB: f32 = -90.0;

#[derive(Debug, Serialize)]
struct ProcessReport {
    eq: EqSettings,
    compression: CompressionSettings,
    summary: ProcessingSummary,
    original: AudioAnalysis,
    processed: AudioAnalysis,
}

/// Resolve the engine config from an optional file path.
pub fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::load(path),
        None => Ok(EngineConfig::default()),
    }
}

/// Process a synthesised tone and print a JSON report.
pub fn process(config: EngineConfig, args: &ProcessArgs) -> Result<()> {
    let eq = EqSettings::new(args.bass, args.mid, args.treble)?;
    let compression = CompressionSettings::new(args.compression)?;

    let input = SampleBuffer::sine_wave(args.tone, args.duration, args.sample_rate)?
        .normalize_peak(args.amplitude.clamp(0.0, 1.0));
    info!(
        "Processing {:.1} Hz tone: {} samples @ {} Hz",
        args.tone,
        input.len(),
        input.sample_rate()
    );

    let engine = Engine::new(config)?;
    let output = engine.process(&input, &eq, &compression)?;

    let report = ProcessReport {
        eq,
        compression,
        summary: output.summary(),
        original: AudioAnalysis::analyze(&input),
        processed: AudioAnalysis::analyze(&output.buffer),
    };
    info!("Original:\n{}", report.original.summary());
    info!("Processed:\n{}", report.processed.summary());
    if report.processed.is_silent(SILENCE_THRESHOLD_DB) {
        warn!(
            "Processed output is silent (below {} dBFS); check the band gains",
            SILENCE_THRESHOLD_DB
        );
    }
    println!("{}", serde_json::to_string_pretty(&report)?);

    if let Some(path) = &args.preview_out {
        fs::write(path, serde_json::to_string_pretty(&output.previews)?)?;
        info!("Previews written to {}", path.display());
    }

    Ok(())
}

/// Print the effective engine config.
pub fn print_config(config: &EngineConfig) -> Result<()> {
    println!("{}", config.to_json_pretty()?);
    Ok(())
}
