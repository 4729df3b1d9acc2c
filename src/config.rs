//! Engine configuration
//!
//! Framing, band cutoffs and preview options, loadable from a JSON file.
//! Missing fields fall back to their defaults.

use std::fs;
use std::path::Path;

use log::info;
use serde::{Deserialize, Serialize};

use crate::dsp::{OutputLevel, BASS_CUTOFF_HZ, MID_CUTOFF_HZ};
use crate::error::{Result, WaveshaperError};
use crate::preview::{PreviewMode, DEFAULT_RESOLUTION};
use crate::spectral::SynthesisWindow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Samples per frame (power of two preferred)
    pub frame_size: usize,
    /// Frame advance in samples, `0 < hop_size <= frame_size`
    pub hop_size: usize,
    pub window: SynthesisWindow,
    pub preview_resolution: usize,
    pub preview_mode: PreviewMode,
    pub output_level: OutputLevel,
    pub bass_cutoff_hz: f64,
    pub mid_cutoff_hz: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            frame_size: 1024,
            hop_size: 512,
            window: SynthesisWindow::Hann,
            preview_resolution: DEFAULT_RESOLUTION,
            preview_mode: PreviewMode::Peak,
            output_level: OutputLevel::Clamp,
            bass_cutoff_hz: BASS_CUTOFF_HZ,
            mid_cutoff_hz: MID_CUTOFF_HZ,
        }
    }
}

impl EngineConfig {
    /// Framing that treats the whole buffer as one frame
    pub fn whole_buffer(len: usize) -> Self {
        Self {
            frame_size: len,
            hop_size: len,
            ..Self::default()
        }
    }

    /// Load and validate a JSON config file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let config: Self =
            serde_json::from_str(&text).map_err(|e| WaveshaperError::ConfigError {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        config
            .validate()
            .map_err(|e| WaveshaperError::ConfigError {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        info!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    /// Write this config as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the same constraints the engine stages enforce
    pub fn validate(&self) -> Result<()> {
        if self.frame_size == 0 || self.hop_size == 0 || self.hop_size > self.frame_size {
            return Err(WaveshaperError::InvalidFrameParameters {
                frame_size: self.frame_size,
                hop_size: self.hop_size,
                reason: "expected frame_size > 0 and 0 < hop_size <= frame_size".to_string(),
            });
        }
        if self.preview_resolution == 0 {
            return Err(WaveshaperError::InvalidResolution {
                resolution: self.preview_resolution,
            });
        }
        if !(self.bass_cutoff_hz > 0.0
            && self.mid_cutoff_hz > self.bass_cutoff_hz
            && self.mid_cutoff_hz.is_finite())
        {
            return Err(WaveshaperError::InvalidCutoffs {
                bass_hz: self.bass_cutoff_hz,
                mid_hz: self.mid_cutoff_hz,
            });
        }
        Ok(())
    }
}
