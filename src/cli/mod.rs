//! CLI Module
//!
//! Command-line driver for the WaveShaper engine. WAV decoding belongs to
//! the host application, so the CLI synthesises test tones as input.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// WaveShaper - spectral EQ and coefficient pruning engine
#[derive(Parser, Debug)]
#[command(name = "waveshaper")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Engine config file (JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Process a synthesised tone and print a JSON report
    #[command(name = "process")]
    Process(ProcessArgs),

    /// Print the effective engine config
    #[command(name = "print-config")]
    PrintConfig,
}

#[derive(clap::Args, Debug, Clone)]
pub struct ProcessArgs {
    /// Tone frequency in Hz
    #[arg(long, default_value_t = 440.0)]
    pub tone: f32,

    /// Tone duration in seconds
    #[arg(long, default_value_t = 1.0)]
    pub duration: f32,

    /// Tone amplitude (0.0 to 1.0)
    #[arg(long, default_value_t = 0.8)]
    pub amplitude: f32,

    #[arg(long, default_value_t = 44100)]
    pub sample_rate: u32,

    /// Bass gain multiplier (0.0 to 4.0)
    #[arg(long, default_value_t = 1.0)]
    pub bass: f64,

    /// Mid gain multiplier (0.0 to 4.0)
    #[arg(long, default_value_t = 1.0)]
    pub mid: f64,

    /// Treble gain multiplier (0.0 to 4.0)
    #[arg(long, default_value_t = 1.0)]
    pub treble: f64,

    /// Fraction of coefficients to prune (0.0 to <1.0)
    #[arg(long, default_value_t = 0.0)]
    pub compression: f64,

    /// Write the waveform previews to this JSON file
    #[arg(long)]
    pub preview_out: Option<PathBuf>,
}
