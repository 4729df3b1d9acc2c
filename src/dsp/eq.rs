//! Three-band spectral EQ
//!
//! Multiplies every bin by the gain of the band its frequency falls in.
//! Mirrored bins above `frame_size / 2` are classified by their folded
//! frequency so the spectrum stays conjugate-symmetric and the inverse
//! transform stays real-valued.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Result, WaveshaperError};
use crate::spectral::{Spectrogram, Spectrum};

/// Upper edge of the bass band in Hz
pub const BASS_CUTOFF_HZ: f64 = 250.0;

/// Upper edge of the mid band in Hz
pub const MID_CUTOFF_HZ: f64 = 4000.0;

/// Minimum band gain (silences the band)
pub const MIN_GAIN: f64 = 0.0;

/// Maximum band gain
pub const MAX_GAIN: f64 = 4.0;

/// Frequency band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Band {
    Bass,
    Mid,
    Treble,
}

impl Band {
    pub fn name(self) -> &'static str {
        match self {
            Band::Bass => "bass",
            Band::Mid => "mid",
            Band::Treble => "treble",
        }
    }
}

/// Per-band linear gain multipliers, each in `[0.0, 4.0]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EqSettings {
    pub bass_gain: f64,
    pub mid_gain: f64,
    pub treble_gain: f64,
}

impl EqSettings {
    /// Create validated settings
    pub fn new(bass_gain: f64, mid_gain: f64, treble_gain: f64) -> Result<Self> {
        let settings = Self {
            bass_gain,
            mid_gain,
            treble_gain,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Unity gain on every band
    pub fn flat() -> Self {
        Self {
            bass_gain: 1.0,
            mid_gain: 1.0,
            treble_gain: 1.0,
        }
    }

    pub fn gain(&self, band: Band) -> f64 {
        match band {
            Band::Bass => self.bass_gain,
            Band::Mid => self.mid_gain,
            Band::Treble => self.treble_gain,
        }
    }

    /// Check every gain lies in `[MIN_GAIN, MAX_GAIN]`; NaN is rejected
    pub fn validate(&self) -> Result<()> {
        for band in [Band::Bass, Band::Mid, Band::Treble] {
            let value = self.gain(band);
            if !(MIN_GAIN..=MAX_GAIN).contains(&value) {
                return Err(WaveshaperError::InvalidGain {
                    band: band.name(),
                    value,
                    min: MIN_GAIN,
                    max: MAX_GAIN,
                });
            }
        }
        Ok(())
    }

    pub fn is_flat(&self) -> bool {
        *self == Self::flat()
    }
}

impl Default for EqSettings {
    fn default() -> Self {
        Self::flat()
    }
}

/// Applies [`EqSettings`] to spectra using fixed band cutoffs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandGainShaper {
    bass_cutoff_hz: f64,
    mid_cutoff_hz: f64,
}

impl BandGainShaper {
    /// Shaper with custom cutoffs; requires `0 < bass_cutoff < mid_cutoff`
    pub fn with_cutoffs(bass_cutoff_hz: f64, mid_cutoff_hz: f64) -> Result<Self> {
        if !(bass_cutoff_hz > 0.0 && mid_cutoff_hz > bass_cutoff_hz && mid_cutoff_hz.is_finite()) {
            return Err(WaveshaperError::InvalidCutoffs {
                bass_hz: bass_cutoff_hz,
                mid_hz: mid_cutoff_hz,
            });
        }
        Ok(Self {
            bass_cutoff_hz,
            mid_cutoff_hz,
        })
    }

    pub fn bass_cutoff_hz(&self) -> f64 {
        self.bass_cutoff_hz
    }

    pub fn mid_cutoff_hz(&self) -> f64 {
        self.mid_cutoff_hz
    }

    /// Band a frequency belongs to: `[0, bass)`, `[bass, mid)`, `[mid, nyquist]`
    pub fn band_for_frequency(&self, frequency_hz: f64) -> Band {
        if frequency_hz < self.bass_cutoff_hz {
            Band::Bass
        } else if frequency_hz < self.mid_cutoff_hz {
            Band::Mid
        } else {
            Band::Treble
        }
    }

    /// Return a new spectrum with each bin scaled by its band gain
    pub fn apply(&self, spectrum: &Spectrum, settings: &EqSettings) -> Result<Spectrum> {
        settings.validate()?;
        spectrum.check_bins()?;

        let bins = spectrum
            .bins
            .iter()
            .enumerate()
            .map(|(k, &bin)| {
                let band = self.band_for_frequency(spectrum.bin_frequency(k));
                bin * settings.gain(band)
            })
            .collect();

        Ok(spectrum.with_bins(bins))
    }

    /// Shape every frame of a spectrogram
    pub fn apply_all(&self, spectrogram: &Spectrogram, settings: &EqSettings) -> Result<Spectrogram> {
        settings.validate()?;
        debug!(
            "eq: bass={:.2} mid={:.2} treble={:.2} over {} frames",
            settings.bass_gain,
            settings.mid_gain,
            settings.treble_gain,
            spectrogram.len()
        );
        spectrogram.try_map(|frame| self.apply(frame, settings))
    }
}

impl Default for BandGainShaper {
    fn default() -> Self {
        Self {
            bass_cutoff_hz: BASS_CUTOFF_HZ,
            mid_cutoff_hz: MID_CUTOFF_HZ,
        }
    }
}
