//! tartil - Quranic recitation analysis
//!
//! Runs a recorded recitation through four hosted model capabilities and
//! aggregates transcription, verse position, tajweed errors, and a
//! pronunciation score into one report.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod abjad;
pub mod audio;
pub mod auth;
pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod hf;
pub mod pipeline;
pub mod report;
pub mod stages;

// Core traits (capabilities behind the stages)
pub use stages::{PositionClassifier, TextClassifier, TokenClassifier, Transcriber};

// Pipeline
pub use pipeline::{AbortReason, InferenceResult, Outcome, Pipeline, PipelineConfig};

// Audio preparation
pub use audio::{AudioPreparer, PreparedAudio};

// Credential gate
pub use auth::{ApiToken, CredentialGate};

// Error handling
pub use error::{Result, TartilError};

// Config
pub use config::Config;

/// Build version string with optional git commit hash.
///
/// Returns `"0.1.0+abc1234"` when git hash is available, `"0.1.0"` otherwise.
pub fn version_string() -> String {
    let version = env!("CARGO_PKG_VERSION");
    match option_env!("GIT_HASH") {
        Some(hash) if !hash.is_empty() => format!("{}+{}", version, hash),
        _ => version.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_string_starts_with_cargo_version() {
        let ver = version_string();
        assert!(
            ver.starts_with(env!("CARGO_PKG_VERSION")),
            "version_string should start with CARGO_PKG_VERSION, got: {}",
            ver
        );
    }
}
