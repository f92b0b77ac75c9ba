//! Model capabilities behind the pipeline stages.
//!
//! Each external model is abstracted as a trait so the orchestration logic
//! (sequencing, defaults, cleanup, abort conditions) can be tested with
//! injectable doubles, independent of real inference.

pub mod position;
pub mod scoring;
pub mod tajweed;
pub mod transcribe;

use crate::audio::PreparedAudio;
use crate::auth::ApiToken;
use crate::error::{Result, TartilError};
use crate::hf::{ScoredLabel, TokenSpan};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Speech-to-text capability.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe prepared audio to text.
    ///
    /// Never "null": an empty string means the capability yielded nothing.
    /// The orchestrator, not this trait, decides that empty text halts the
    /// pipeline.
    async fn transcribe(&self, audio: &PreparedAudio) -> Result<String>;
}

/// Audio classification capability for verse-position detection.
#[async_trait]
pub trait PositionClassifier: Send + Sync {
    /// Ranked position labels for the audio, best first.
    async fn classify(&self, audio: &PreparedAudio) -> Result<Vec<ScoredLabel>>;
}

/// Token classification capability for tajweed error detection.
#[async_trait]
pub trait TokenClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Vec<TokenSpan>>;
}

/// Text classification capability for pronunciation scoring.
#[async_trait]
pub trait TextClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Vec<ScoredLabel>>;
}

/// The four capabilities one pipeline invocation runs against.
#[derive(Clone)]
pub struct Capabilities {
    pub transcriber: Arc<dyn Transcriber>,
    pub position: Arc<dyn PositionClassifier>,
    pub tajweed: Arc<dyn TokenClassifier>,
    pub scoring: Arc<dyn TextClassifier>,
}

/// Builds the capability set once a credential is available.
///
/// The resolved token arrives as an explicit argument; implementations must
/// not read credentials from ambient process state.
pub trait CapabilityFactory: Send + Sync {
    fn build(&self, token: &ApiToken) -> Result<Capabilities>;
}

/// Factory returning a fixed capability set, ignoring the token.
///
/// Lets tests drive the orchestrator with mock capabilities.
pub struct StaticCapabilities(pub Capabilities);

impl CapabilityFactory for StaticCapabilities {
    fn build(&self, _token: &ApiToken) -> Result<Capabilities> {
        Ok(self.0.clone())
    }
}

/// Factory wiring every capability to the hosted inference API.
#[derive(Debug, Clone)]
pub struct HfCapabilityFactory {
    endpoint: String,
    timeout: std::time::Duration,
    models: crate::config::ModelsConfig,
    chunk_secs: u32,
    stride_secs: u32,
}

impl HfCapabilityFactory {
    pub fn from_config(config: &crate::config::Config) -> Self {
        Self {
            endpoint: config.api.endpoint.clone(),
            timeout: std::time::Duration::from_secs(config.api.timeout_secs),
            models: config.models.clone(),
            chunk_secs: config.transcription.chunk_secs,
            stride_secs: config.transcription.stride_secs,
        }
    }

    /// Override the per-request timeout (CLI flag).
    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl CapabilityFactory for HfCapabilityFactory {
    fn build(&self, token: &ApiToken) -> Result<Capabilities> {
        let client = Arc::new(crate::hf::HfClient::new(
            self.endpoint.as_str(),
            token.clone(),
            self.timeout,
        )?);

        Ok(Capabilities {
            transcriber: Arc::new(
                transcribe::HfTranscriber::new(client.clone(), self.models.transcription.as_str())
                    .with_chunking(self.chunk_secs, self.stride_secs),
            ),
            position: Arc::new(position::HfPositionClassifier::new(
                client.clone(),
                self.models.position.as_str(),
            )),
            tajweed: Arc::new(tajweed::HfTajweedClassifier::new(
                client.clone(),
                self.models.tajweed.as_str(),
            )),
            scoring: Arc::new(scoring::HfScoringClassifier::new(
                client,
                self.models.scoring.as_str(),
            )),
        })
    }
}

// ── Mock capabilities ────────────────────────────────────────────────────

/// Mock transcriber for testing.
#[derive(Debug, Default)]
pub struct MockTranscriber {
    response: String,
    should_fail: bool,
    calls: AtomicUsize,
}

impl MockTranscriber {
    pub fn new() -> Self {
        Self {
            response: "mock transcription".to_string(),
            should_fail: false,
            calls: AtomicUsize::new(0),
        }
    }

    /// Configure the mock to return a specific response
    pub fn with_response(mut self, response: &str) -> Self {
        self.response = response.to_string();
        self
    }

    /// Configure the mock to fail on transcribe
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Number of times `transcribe` was invoked
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, _audio: &PreparedAudio) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            Err(TartilError::Transcription {
                message: "mock transcription failure".to_string(),
            })
        } else {
            Ok(self.response.clone())
        }
    }
}

/// Mock position classifier for testing.
#[derive(Debug, Default)]
pub struct MockPositionClassifier {
    labels: Vec<ScoredLabel>,
    should_fail: bool,
    calls: AtomicUsize,
}

impl MockPositionClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_labels(mut self, labels: Vec<ScoredLabel>) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_top_label(self, label: &str, score: f32) -> Self {
        self.with_labels(vec![ScoredLabel {
            label: label.to_string(),
            score,
        }])
    }

    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PositionClassifier for MockPositionClassifier {
    async fn classify(&self, _audio: &PreparedAudio) -> Result<Vec<ScoredLabel>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            Err(TartilError::Api {
                model: "mock-position".to_string(),
                message: "mock classification failure".to_string(),
            })
        } else {
            Ok(self.labels.clone())
        }
    }
}

/// Mock token classifier for testing.
#[derive(Debug, Default)]
pub struct MockTokenClassifier {
    spans: Vec<TokenSpan>,
    should_fail: bool,
    calls: AtomicUsize,
}

impl MockTokenClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_spans(mut self, spans: Vec<TokenSpan>) -> Self {
        self.spans = spans;
        self
    }

    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenClassifier for MockTokenClassifier {
    async fn classify(&self, _text: &str) -> Result<Vec<TokenSpan>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            Err(TartilError::Api {
                model: "mock-tajweed".to_string(),
                message: "mock classification failure".to_string(),
            })
        } else {
            Ok(self.spans.clone())
        }
    }
}

/// Mock text classifier for testing.
#[derive(Debug, Default)]
pub struct MockTextClassifier {
    labels: Vec<ScoredLabel>,
    should_fail: bool,
    calls: AtomicUsize,
}

impl MockTextClassifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_labels(mut self, labels: Vec<ScoredLabel>) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextClassifier for MockTextClassifier {
    async fn classify(&self, _text: &str) -> Result<Vec<ScoredLabel>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            Err(TartilError::Api {
                model: "mock-scoring".to_string(),
                message: "mock classification failure".to_string(),
            })
        } else {
            Ok(self.labels.clone())
        }
    }
}
