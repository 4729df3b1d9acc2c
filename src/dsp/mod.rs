//! Spectral shaping stages
//!
//! Every stage takes its input by reference and returns a new value, so the
//! original spectra stay available for side-by-side comparison:
//! EQ → coefficient pruning → reconstruction.

pub mod eq;
pub mod pruner;
pub mod reconstruct;

pub use eq::{Band, BandGainShaper, EqSettings, BASS_CUTOFF_HZ, MID_CUTOFF_HZ};
pub use pruner::{CoefficientPruner, CompressionSettings, SizeEstimate};
pub use reconstruct::{OutputLevel, Reconstructor};
