//! Default configuration constants for tartil.
//!
//! This module provides shared constants used across different configuration
//! types to ensure consistency and eliminate duplication.

/// Target audio sample rate in Hz.
///
/// 16kHz is the standard for speech recognition; every stage consumes audio
/// decoded at this rate, mono.
pub const SAMPLE_RATE: u32 = 16000;

/// Frequency of the synthesized placeholder tone in Hz (A4 note).
///
/// Used when the requested audio file does not exist, so the pipeline stays
/// runnable in environments without real recordings.
pub const PLACEHOLDER_FREQ_HZ: f32 = 440.0;

/// Duration of the synthesized placeholder tone in seconds.
pub const PLACEHOLDER_SECS: u32 = 2;

/// Amplitude of the synthesized placeholder tone, as a fraction of full scale.
pub const PLACEHOLDER_AMPLITUDE: f32 = 0.5;

/// Minimum confidence for a tajweed error label to be retained.
///
/// A token's category is kept only when its score is strictly greater than
/// this threshold; a score of exactly 0.7 is excluded.
pub const CONFIDENCE_THRESHOLD: f32 = 0.7;

/// Surah index used when verse detection is inconclusive or unparsable.
pub const DEFAULT_SURAH: u32 = 1;

/// Ayah index used when verse detection is inconclusive or unparsable.
pub const DEFAULT_AYAH: u32 = 2;

/// Fixed pronunciation score reported whenever the scoring model yields any
/// labeled result.
///
/// The scoring capability does not yet produce a meaningful numeric grade;
/// this reference value stands in until it does. Absent a usable result the
/// score is 0.
pub const REFERENCE_SCORE: u32 = 92;

/// Upper bound of the pronunciation score range.
pub const MAX_SCORE: u32 = 100;

/// Transcription chunk length in seconds for long recitations.
pub const CHUNK_SECS: u32 = 30;

/// Overlap between consecutive transcription chunks in seconds.
pub const STRIDE_SECS: u32 = 5;

/// Speech-to-text model for Quranic Arabic.
pub const TRANSCRIPTION_MODEL: &str = "tarteel-ai/whisper-base-ar-quran";

/// Audio classification model for surah/ayah detection.
pub const POSITION_MODEL: &str = "Nuwaisir/Quran_speech_recognizer";

/// Token classification model for tajweed error detection.
pub const TAJWEED_MODEL: &str = "Habib-HF/tarbiyah-ai-v1-1";

/// Text classification model for pronunciation scoring.
pub const SCORING_MODEL: &str = "ArabicSpeech/iqraeval-models";

/// Base URL of the hosted inference API.
pub const API_ENDPOINT: &str = "https://api-inference.huggingface.co/models";

/// Default timeout for a single inference request, in seconds.
pub const API_TIMEOUT_SECS: u64 = 120;

/// Environment variable holding the inference API token.
pub const TOKEN_ENV_VAR: &str = "HF_TOKEN";

/// Audio file analyzed when no path is given on the command line.
pub const SAMPLE_AUDIO_PATH: &str = "recitation.wav";
