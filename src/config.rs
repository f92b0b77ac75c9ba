use crate::defaults;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub models: ModelsConfig,
    pub audio: AudioConfig,
    pub transcription: TranscriptionConfig,
    pub auth: AuthConfig,
}

/// Inference API configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    pub endpoint: String,
    pub timeout_secs: u64,
}

/// Hosted model identifiers, one per pipeline stage
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ModelsConfig {
    pub transcription: String,
    pub position: String,
    pub tajweed: String,
    pub scoring: String,
}

/// Audio input configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AudioConfig {
    /// File analyzed when no path is given on the command line
    pub sample_path: PathBuf,
}

/// Chunked transcription configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TranscriptionConfig {
    pub chunk_secs: u32,
    pub stride_secs: u32,
}

/// Credential source configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct AuthConfig {
    /// Token file consulted before the environment variable
    /// (default: ~/.config/tartil/token)
    pub token_file: Option<PathBuf>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: defaults::API_ENDPOINT.to_string(),
            timeout_secs: defaults::API_TIMEOUT_SECS,
        }
    }
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            transcription: defaults::TRANSCRIPTION_MODEL.to_string(),
            position: defaults::POSITION_MODEL.to_string(),
            tajweed: defaults::TAJWEED_MODEL.to_string(),
            scoring: defaults::SCORING_MODEL.to_string(),
        }
    }
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            sample_path: PathBuf::from(defaults::SAMPLE_AUDIO_PATH),
        }
    }
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            chunk_secs: defaults::CHUNK_SECS,
            stride_secs: defaults::STRIDE_SECS,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only returns defaults if the file is missing.
    /// Returns errors for invalid TOML.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                if e.downcast_ref::<std::io::Error>()
                    .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
                    .unwrap_or(false)
                {
                    Self::default()
                } else {
                    panic!("Failed to load config from {}: {}", path.display(), e);
                }
            }
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - TARTIL_ENDPOINT → api.endpoint
    /// - TARTIL_SAMPLE_PATH → audio.sample_path
    /// - TARTIL_TOKEN_FILE → auth.token_file
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(endpoint) = std::env::var("TARTIL_ENDPOINT")
            && !endpoint.is_empty()
        {
            self.api.endpoint = endpoint;
        }

        if let Ok(sample) = std::env::var("TARTIL_SAMPLE_PATH")
            && !sample.is_empty()
        {
            self.audio.sample_path = PathBuf::from(sample);
        }

        if let Ok(token_file) = std::env::var("TARTIL_TOKEN_FILE")
            && !token_file.is_empty()
        {
            self.auth.token_file = Some(PathBuf::from(token_file));
        }

        self
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/tartil/config.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .expect("Could not determine config directory")
            .join("tartil")
            .join("config.toml")
    }
}
