//! Error types for tartil.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TartilError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Audio errors
    #[error("Failed to decode audio at {path}: {message}")]
    AudioDecode { path: String, message: String },

    #[error("Failed to write audio to {path}: {message}")]
    AudioWrite { path: String, message: String },

    // Inference API errors
    #[error("Inference request to {model} failed: {message}")]
    Api { model: String, message: String },

    #[error("Unexpected response from {model}: {message}")]
    ApiResponse { model: String, message: String },

    // Transcription errors
    #[error("Transcription error: {message}")]
    Transcription { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, TartilError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_audio_decode_display() {
        let error = TartilError::AudioDecode {
            path: "/tmp/rec.wav".to_string(),
            message: "not a RIFF file".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to decode audio at /tmp/rec.wav: not a RIFF file"
        );
    }

    #[test]
    fn test_audio_write_display() {
        let error = TartilError::AudioWrite {
            path: "/tmp/out.wav".to_string(),
            message: "disk full".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Failed to write audio to /tmp/out.wav: disk full"
        );
    }

    #[test]
    fn test_api_display() {
        let error = TartilError::Api {
            model: "tarteel-ai/whisper-base-ar-quran".to_string(),
            message: "status 503".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Inference request to tarteel-ai/whisper-base-ar-quran failed: status 503"
        );
    }

    #[test]
    fn test_api_response_display() {
        let error = TartilError::ApiResponse {
            model: "Nuwaisir/Quran_speech_recognizer".to_string(),
            message: "expected JSON array".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Unexpected response from Nuwaisir/Quran_speech_recognizer: expected JSON array"
        );
    }

    #[test]
    fn test_transcription_display() {
        let error = TartilError::Transcription {
            message: "empty chunk".to_string(),
        };
        assert_eq!(error.to_string(), "Transcription error: empty chunk");
    }

    #[test]
    fn test_other_display() {
        let error = TartilError::Other("unexpected error".to_string());
        assert_eq!(error.to_string(), "unexpected error");
    }

    #[test]
    fn test_from_io_error() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let error: TartilError = io_error.into();
        assert!(error.to_string().contains("file not found"));
    }

    #[test]
    fn test_from_toml_error() {
        let toml_str = "invalid = toml = syntax";
        let toml_error = toml::from_str::<toml::Value>(toml_str).unwrap_err();
        let error: TartilError = toml_error.into();
        assert!(error.to_string().contains("Configuration error"));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }
        assert_eq!(returns_result().unwrap(), 42);
    }

    #[test]
    fn test_error_source_chain_io() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "access denied");
        let error: TartilError = io_error.into();

        let error_trait: &dyn std::error::Error = &error;
        assert!(error_trait.source().is_some());
    }

    #[test]
    fn test_error_is_send_and_sync() {
        fn assert_send<T: Send>() {}
        fn assert_sync<T: Sync>() {}

        assert_send::<TartilError>();
        assert_sync::<TartilError>();
    }
}
