//! Framed FFT and weighted overlap-add
//!
//! The forward transform splits a buffer into frames of `frame_size`
//! samples advanced by `hop_size`, zero-padding the last one, and runs a
//! full complex FFT on each. The inverse runs the inverse FFT per frame and
//! blends overlapping frames with a synthesis window normalized by the
//! per-sample weight sum, so unmodified spectra reconstruct the input exactly
//! up to floating-point error.

use std::f64::consts::PI;
use std::fmt;
use std::sync::Arc;

use log::{debug, trace};
use num_traits::Zero;
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use serde::{Deserialize, Serialize};

use crate::audio::SampleBuffer;
use crate::error::{Result, WaveshaperError};
use crate::spectral::{Spectrogram, Spectrum};

/// Weighting applied to each frame during overlap-add
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SynthesisWindow {
    /// Equal weights; each output sample is the mean of the frames covering it
    Rectangular,
    /// Half-sample-offset Hann, `sin²(π(n + 0.5)/N)`, strictly positive
    #[default]
    Hann,
}

impl SynthesisWindow {
    fn weights(self, frame_size: usize) -> Vec<f64> {
        match self {
            SynthesisWindow::Rectangular => vec![1.0; frame_size],
            SynthesisWindow::Hann => (0..frame_size)
                .map(|n| {
                    let s = (PI * (n as f64 + 0.5) / frame_size as f64).sin();
                    s * s
                })
                .collect(),
        }
    }
}

/// Number of frames needed to cover `len` samples
pub fn frame_count(len: usize, frame_size: usize, hop_size: usize) -> usize {
    if len <= frame_size {
        1
    } else {
        (len - frame_size).div_ceil(hop_size) + 1
    }
}

fn validate_frame_parameters(frame_size: usize, hop_size: usize) -> Result<()> {
    let reason = if frame_size == 0 {
        "frame size must be positive"
    } else if hop_size == 0 {
        "hop size must be positive"
    } else if hop_size > frame_size {
        "hop size must not exceed frame size"
    } else {
        return Ok(());
    };
    Err(WaveshaperError::InvalidFrameParameters {
        frame_size,
        hop_size,
        reason: reason.to_string(),
    })
}

fn mismatch(frame_size: usize, hop_size: usize, reason: String) -> WaveshaperError {
    WaveshaperError::InvalidFrameParameters {
        frame_size,
        hop_size,
        reason,
    }
}

/// Planned forward/inverse transform for one framing configuration
#[derive(Clone)]
pub struct SpectralTransform {
    frame_size: usize,
    hop_size: usize,
    window: SynthesisWindow,
    weights: Vec<f64>,
    fft: Arc<dyn Fft<f64>>,
    ifft: Arc<dyn Fft<f64>>,
}

impl fmt::Debug for SpectralTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpectralTransform")
            .field("frame_size", &self.frame_size)
            .field("hop_size", &self.hop_size)
            .field("window", &self.window)
            .finish()
    }
}

impl SpectralTransform {
    /// Plan transforms for the given framing
    ///
    /// Fails with `InvalidFrameParameters` unless
    /// `frame_size > 0 && 0 < hop_size <= frame_size`. Power-of-two frame
    /// sizes are fastest, but any positive size works.
    pub fn new(frame_size: usize, hop_size: usize, window: SynthesisWindow) -> Result<Self> {
        validate_frame_parameters(frame_size, hop_size)?;

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(frame_size);
        let ifft = planner.plan_fft_inverse(frame_size);

        Ok(Self {
            frame_size,
            hop_size,
            window,
            weights: window.weights(frame_size),
            fft,
            ifft,
        })
    }

    pub fn frame_size(&self) -> usize {
        self.frame_size
    }

    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    pub fn window(&self) -> SynthesisWindow {
        self.window
    }

    /// Decompose a buffer into time-ordered spectra
    pub fn forward(&self, buffer: &SampleBuffer) -> Result<Spectrogram> {
        let samples = buffer.samples();
        if samples.is_empty() {
            return Err(WaveshaperError::EmptyBuffer);
        }

        let num_frames = frame_count(samples.len(), self.frame_size, self.hop_size);
        let mut scratch = vec![Complex::zero(); self.fft.get_inplace_scratch_len()];
        let mut frames = Vec::with_capacity(num_frames);

        for frame_index in 0..num_frames {
            let start = frame_index * self.hop_size;
            let end = (start + self.frame_size).min(samples.len());

            let mut bins = vec![Complex::zero(); self.frame_size];
            for (bin, &sample) in bins.iter_mut().zip(&samples[start..end]) {
                *bin = Complex::new(sample as f64, 0.0);
            }
            self.fft.process_with_scratch(&mut bins, &mut scratch);

            trace!("forward frame {} covers samples {}..{}", frame_index, start, end);
            frames.push(Spectrum {
                bins,
                frame_size: self.frame_size,
                sample_rate: buffer.sample_rate(),
                frame_index,
                hop_size: self.hop_size,
            });
        }

        debug!(
            "forward transform: {} samples -> {} frames (frame_size={}, hop_size={})",
            samples.len(),
            num_frames,
            self.frame_size,
            self.hop_size
        );

        Ok(Spectrogram {
            frames,
            frame_size: self.frame_size,
            hop_size: self.hop_size,
            sample_rate: buffer.sample_rate(),
            source_len: samples.len(),
        })
    }

    /// Reassemble a buffer from spectra by weighted overlap-add
    ///
    /// Each frame is placed at `frame_index * hop_size`. The output is
    /// trimmed to the spectrogram's `source_len`. Imaginary residue from
    /// asymmetric edits is discarded.
    pub fn inverse(&self, spectrogram: &Spectrogram) -> Result<SampleBuffer> {
        if spectrogram.is_empty() {
            return Err(WaveshaperError::EmptyBuffer);
        }
        self.check_framing(spectrogram)?;

        let furthest_end = spectrogram
            .frames
            .iter()
            .map(|frame| frame.start_sample() + self.frame_size)
            .max()
            .unwrap_or(0);
        let out_len = furthest_end.max(spectrogram.source_len);

        let mut accum = vec![0.0_f64; out_len];
        let mut weight_sum = vec![0.0_f64; out_len];
        let mut scratch = vec![Complex::zero(); self.ifft.get_inplace_scratch_len()];
        let mut time = vec![Complex::zero(); self.frame_size];
        let scale = 1.0 / self.frame_size as f64;

        for frame in &spectrogram.frames {
            time.copy_from_slice(&frame.bins);
            self.ifft.process_with_scratch(&mut time, &mut scratch);

            let start = frame.start_sample();
            for (n, value) in time.iter().enumerate() {
                let w = self.weights[n];
                accum[start + n] += w * value.re * scale;
                weight_sum[start + n] += w;
            }
        }

        let samples: Vec<f32> = accum
            .iter()
            .zip(&weight_sum)
            .take(spectrogram.source_len)
            .map(|(&acc, &w)| if w > 0.0 { (acc / w) as f32 } else { 0.0 })
            .collect();

        debug!(
            "inverse transform: {} frames -> {} samples",
            spectrogram.len(),
            samples.len()
        );

        SampleBuffer::new(samples, spectrogram.sample_rate)
    }

    fn check_framing(&self, spectrogram: &Spectrogram) -> Result<()> {
        if spectrogram.frame_size != self.frame_size || spectrogram.hop_size != self.hop_size {
            return Err(mismatch(
                spectrogram.frame_size,
                spectrogram.hop_size,
                format!(
                    "spectrogram framing does not match transform ({}/{})",
                    self.frame_size, self.hop_size
                ),
            ));
        }

        for frame in &spectrogram.frames {
            if frame.bins.len() != self.frame_size || frame.frame_size != self.frame_size {
                return Err(mismatch(
                    frame.frame_size,
                    frame.hop_size,
                    format!(
                        "frame {} has {} bins, expected {}",
                        frame.frame_index,
                        frame.bins.len(),
                        self.frame_size
                    ),
                ));
            }
            if frame.hop_size != self.hop_size {
                return Err(mismatch(
                    frame.frame_size,
                    frame.hop_size,
                    format!("frame {} hop size differs from spectrogram", frame.frame_index),
                ));
            }
            if frame.sample_rate != spectrogram.sample_rate {
                return Err(mismatch(
                    frame.frame_size,
                    frame.hop_size,
                    format!("frame {} sample rate differs from spectrogram", frame.frame_index),
                ));
            }
        }
        Ok(())
    }
}

/// Forward transform with the default synthesis window
pub fn forward(buffer: &SampleBuffer, frame_size: usize, hop_size: usize) -> Result<Spectrogram> {
    SpectralTransform::new(frame_size, hop_size, SynthesisWindow::default())?.forward(buffer)
}

/// Inverse transform using the spectrogram's own framing and the default window
pub fn inverse(spectrogram: &Spectrogram) -> Result<SampleBuffer> {
    SpectralTransform::new(
        spectrogram.frame_size,
        spectrogram.hop_size,
        SynthesisWindow::default(),
    )?
    .inverse(spectrogram)
}
