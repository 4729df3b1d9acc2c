//! Audio Quality Tests
//!
//! Objective measurements of engine output quality.

use waveshaper::audio::verification::{calculate_dc_offset, calculate_rms, linear_to_db};
use waveshaper::preview::{sample, PreviewMode};
use waveshaper::spectral::SynthesisWindow;
use waveshaper::{
    CompressionSettings, Engine, EngineConfig, EqSettings, SampleBuffer, WaveshaperError,
};

fn engine_with(window: SynthesisWindow) -> Engine {
    Engine::new(EngineConfig {
        window,
        ..EngineConfig::default()
    })
    .unwrap()
}

// === Passthrough Tests ===

#[test]
fn test_passthrough_various_sample_rates() {
    for sample_rate in [8000, 44100, 48000, 96000] {
        let input = SampleBuffer::sine_wave(440.0, 0.5, sample_rate)
            .unwrap()
            .normalize_peak(0.7);
        let output = engine_with(SynthesisWindow::Hann)
            .process(&input, &EqSettings::flat(), &CompressionSettings::lossless())
            .unwrap();
        assert!(
            output.buffer.is_approx_equal(&input, 1e-6),
            "Passthrough failed at {} Hz",
            sample_rate
        );
    }
}

#[test]
fn test_passthrough_both_windows() {
    let input = SampleBuffer::sine_wave(3000.0, 0.3, 44100)
        .unwrap()
        .normalize_peak(0.7);
    for window in [SynthesisWindow::Rectangular, SynthesisWindow::Hann] {
        let output = engine_with(window)
            .process(&input, &EqSettings::flat(), &CompressionSettings::lossless())
            .unwrap();
        assert!(output.buffer.is_approx_equal(&input, 1e-6), "{:?}", window);
    }
}

// === Artifact Detection Tests ===

#[test]
fn test_silence_remains_silence() {
    let silence = SampleBuffer::silence(0.5, 44100).unwrap();
    let output = engine_with(SynthesisWindow::Hann)
        .process(
            &silence,
            &EqSettings::new(4.0, 4.0, 4.0).unwrap(),
            &CompressionSettings::new(0.5).unwrap(),
        )
        .unwrap();

    let rms = calculate_rms(output.buffer.samples());
    assert!(rms == 0.0 || linear_to_db(rms) < -120.0);
}

#[test]
fn test_no_dc_offset_introduced() {
    let input = SampleBuffer::sine_wave(440.0, 1.0, 44100)
        .unwrap()
        .normalize_peak(0.5);
    let output = engine_with(SynthesisWindow::Hann)
        .process(
            &input,
            &EqSettings::new(1.0, 2.0, 0.5).unwrap(),
            &CompressionSettings::new(0.3).unwrap(),
        )
        .unwrap();
    let dc = calculate_dc_offset(output.buffer.samples());
    assert!(dc.abs() < 0.01, "Processing introduced DC offset: {}", dc);
}

#[test]
fn test_no_inf_or_nan_values() {
    let input = SampleBuffer::sine_wave(440.0, 0.5, 44100).unwrap();
    let output = engine_with(SynthesisWindow::Rectangular)
        .process(
            &input,
            &EqSettings::new(4.0, 0.0, 4.0).unwrap(),
            &CompressionSettings::new(0.99).unwrap(),
        )
        .unwrap();
    for &sample in output.buffer.samples() {
        assert!(sample.is_finite(), "Processing produced non-finite value: {}", sample);
    }
}

#[test]
fn test_single_nan_sample_never_reaches_engine() {
    let mut samples = vec![0.5; 4096];
    samples[2048] = f32::NAN;
    let result = SampleBuffer::new(samples, 44100);
    assert!(matches!(
        result,
        Err(WaveshaperError::NonFiniteSample { index: 2048 })
    ));
}

#[test]
fn test_zeroed_bands_silence_output() {
    let input = SampleBuffer::sine_wave(440.0, 0.5, 44100)
        .unwrap()
        .normalize_peak(0.5);
    let output = engine_with(SynthesisWindow::Hann)
        .process(
            &input,
            &EqSettings::new(0.0, 0.0, 0.0).unwrap(),
            &CompressionSettings::lossless(),
        )
        .unwrap();
    assert!(output.buffer.samples().iter().all(|&s| s == 0.0));
    assert!(output.previews.processed.points.iter().all(|&p| p == 0.0));
}

// === Preview Tests ===

#[test]
fn test_preview_tracks_envelope() {
    // Half loud, half quiet
    let mut samples = vec![0.0_f32; 1000];
    for (i, s) in samples.iter_mut().enumerate() {
        let amplitude = if i < 500 { 0.8 } else { 0.1 };
        *s = amplitude * if i % 2 == 0 { 1.0 } else { -1.0 };
    }
    let buffer = SampleBuffer::new(samples, 8000).unwrap();
    let preview = sample(&buffer, 10).unwrap();

    assert_eq!(preview.mode, PreviewMode::Peak);
    assert!(preview.points[..5].iter().all(|&p| (p - 0.8).abs() < 1e-6));
    assert!(preview.points[5..].iter().all(|&p| (p - 0.1).abs() < 1e-6));
}
