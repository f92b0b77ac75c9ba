//! Command-line interface for tartil
//!
//! Provides argument parsing using clap derive macros.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Recitation analysis for Quranic audio
#[derive(Parser, Debug)]
#[command(
    name = "tartil",
    version,
    about = "Recitation analysis for Quranic audio"
)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Audio file to analyze (default: recitation.wav, synthesized if missing)
    #[arg(value_name = "AUDIO")]
    pub audio: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Suppress status output (quiet mode)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose output (-v: per-stage results)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Report format: json (default) or text
    #[arg(long, short = 'o', value_name = "FORMAT", default_value = "json")]
    pub output: String,

    /// Inference request timeout (default: 120s). Examples: 30s, 2m
    #[arg(long, value_name = "DURATION", value_parser = parse_timeout_secs)]
    pub timeout: Option<u64>,
}

/// Parse a timeout duration string into seconds.
///
/// Supports any duration format accepted by `humantime`: bare numbers
/// (seconds), single-unit (`30s`, `5m`), and compound (`1m30s`).
fn parse_timeout_secs(s: &str) -> Result<u64, String> {
    let s = s.trim();
    // Bare number → seconds
    if let Ok(secs) = s.parse::<u64>() {
        return Ok(secs);
    }
    humantime::parse_duration(s)
        .map(|d| d.as_secs())
        .map_err(|e| e.to_string())
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check credential availability and effective configuration
    Check,

    /// Compute the Abjad value of a text
    Abjad {
        /// Arabic text to evaluate
        text: String,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}
