//! Audio buffer and measurement utilities
//!
//! This module provides the sample buffer every engine stage reads from or
//! writes to, plus objective level measurements used by tests and reports.

mod buffer;
pub mod verification;

pub use buffer::SampleBuffer;
pub use verification::AudioAnalysis;
