//! The inference pipeline that runs one recitation end to end.
//!
//! Stage order: credential gate → audio preparation → transcription →
//! {verse position, tajweed errors, pronunciation score} → aggregation.
//! The three stages after transcription depend only on the transcribed text
//! or the prepared audio; they run sequentially for deterministic output
//! ordering. The temporary audio file is removed on every exit path once
//! preparation succeeded.

use crate::audio::{AudioPreparer, PreparedAudio};
use crate::auth::CredentialGate;
use crate::error::Result;
use crate::stages::position::position_from_labels;
use crate::stages::scoring::score_from_labels;
use crate::stages::tajweed::retain_confident;
use crate::stages::{Capabilities, CapabilityFactory};
use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// The aggregate analysis of one recitation. Immutable once constructed.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct InferenceResult {
    pub text: String,
    pub surah: u32,
    pub ayah: u32,
    pub tajweed_errors: BTreeSet<String>,
    pub pronunciation_score: u32,
}

/// Why an invocation ended without a result.
///
/// Both cases are safely retryable by the caller: supply a credential, or
/// better audio.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// No API token was found in any credential source.
    MissingCredential,
    /// Transcription produced empty text; nothing to analyze.
    EmptyTranscription,
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AbortReason::MissingCredential => {
                write!(f, "no inference API token found in the token file or HF_TOKEN")
            }
            AbortReason::EmptyTranscription => {
                write!(f, "transcription returned empty text, cannot analyze the recitation")
            }
        }
    }
}

/// Terminal outcome of one invocation: a complete result, or none at all.
///
/// There is no partial result; an aborted invocation carries only its
/// reason.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Completed(InferenceResult),
    Aborted(AbortReason),
}

impl Outcome {
    pub fn result(&self) -> Option<&InferenceResult> {
        match self {
            Outcome::Completed(result) => Some(result),
            Outcome::Aborted(_) => None,
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, Outcome::Aborted(_))
    }
}

/// Configuration for the pipeline.
#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    /// Suppress status messages
    pub quiet: bool,
    /// Verbosity level (0=progress only, 1=stage outputs)
    pub verbosity: u8,
}

/// Sequences the stages over a single audio input.
pub struct Pipeline {
    config: PipelineConfig,
    gate: CredentialGate,
    preparer: AudioPreparer,
    factory: Arc<dyn CapabilityFactory>,
}

impl Pipeline {
    pub fn new(
        config: PipelineConfig,
        gate: CredentialGate,
        preparer: AudioPreparer,
        factory: Arc<dyn CapabilityFactory>,
    ) -> Self {
        Self {
            config,
            gate,
            preparer,
            factory,
        }
    }

    /// Run the full pipeline over the referenced audio.
    ///
    /// Returns `Outcome::Aborted` when the credential is missing or the
    /// transcription is empty; those are not errors. Audio decode failures
    /// and unexpected stage failures propagate as errors. Whatever happens
    /// after preparation, the temporary audio is removed before returning.
    pub async fn run(&self, reference: &Path) -> Result<Outcome> {
        let Some((token, source)) = self.gate.resolve() else {
            return Ok(Outcome::Aborted(AbortReason::MissingCredential));
        };
        if !self.config.quiet {
            eprintln!("tartil: API token loaded from {source}");
        }

        let capabilities = self.factory.build(&token)?;
        let audio = self.preparer.prepare(reference)?;

        let outcome = self.run_stages(&capabilities, &audio).await;

        // A cleanup failure is reported but never replaces the stage outcome.
        if let Err(e) = audio.close() {
            eprintln!("tartil: failed to remove temporary audio: {e}");
        }

        outcome
    }

    async fn run_stages(
        &self,
        caps: &Capabilities,
        audio: &PreparedAudio,
    ) -> Result<Outcome> {
        self.progress(1, "transcribing recitation");
        let text = caps.transcriber.transcribe(audio).await?.trim().to_string();
        if text.is_empty() {
            return Ok(Outcome::Aborted(AbortReason::EmptyTranscription));
        }
        if self.config.verbosity >= 1 {
            eprintln!("tartil: transcribed text: {text}");
        }

        self.progress(2, "detecting surah and ayah");
        let labels = caps.position.classify(audio).await?;
        let position = position_from_labels(&labels);
        if self.config.verbosity >= 1 {
            eprintln!("tartil: detected {position}");
        }

        self.progress(3, "detecting tajweed errors");
        let spans = caps.tajweed.classify(&text).await?;
        let tajweed_errors = retain_confident(&spans);
        if self.config.verbosity >= 1 {
            eprintln!("tartil: tajweed errors: {tajweed_errors:?}");
        }

        self.progress(4, "scoring pronunciation");
        let score_labels = caps.scoring.classify(&text).await?;
        let pronunciation_score = score_from_labels(&score_labels);
        if self.config.verbosity >= 1 {
            eprintln!("tartil: pronunciation score: {pronunciation_score}");
        }

        Ok(Outcome::Completed(InferenceResult {
            text,
            surah: position.surah,
            ayah: position.ayah,
            tajweed_errors,
            pronunciation_score,
        }))
    }

    fn progress(&self, step: u8, message: &str) {
        if !self.config.quiet {
            eprintln!("tartil: [{step}/4] {message}...");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hf::{ScoredLabel, TokenSpan};
    use crate::stages::{
        MockPositionClassifier, MockTextClassifier, MockTokenClassifier, MockTranscriber,
        StaticCapabilities,
    };
    use std::fs;
    use std::io::Write;
    use std::path::PathBuf;

    struct Fixture {
        // Concrete mocks kept alongside their trait objects for call counts
        transcriber: Arc<MockTranscriber>,
        position: Arc<MockPositionClassifier>,
        tajweed: Arc<MockTokenClassifier>,
        scoring: Arc<MockTextClassifier>,
        // Keeps the token file alive for the gate
        _token_file: tempfile::NamedTempFile,
        // Input audio reference and temp-audio directory
        input_dir: tempfile::TempDir,
        temp_dir: tempfile::TempDir,
        pipeline: Pipeline,
    }

    impl Fixture {
        fn new(
            transcriber: MockTranscriber,
            position: MockPositionClassifier,
            tajweed: MockTokenClassifier,
            scoring: MockTextClassifier,
        ) -> Self {
            Self::with_gate_token(transcriber, position, tajweed, scoring, true)
        }

        fn with_gate_token(
            transcriber: MockTranscriber,
            position: MockPositionClassifier,
            tajweed: MockTokenClassifier,
            scoring: MockTextClassifier,
            token_present: bool,
        ) -> Self {
            let transcriber = Arc::new(transcriber);
            let position = Arc::new(position);
            let tajweed = Arc::new(tajweed);
            let scoring = Arc::new(scoring);

            let caps = Capabilities {
                transcriber: transcriber.clone(),
                position: position.clone(),
                tajweed: tajweed.clone(),
                scoring: scoring.clone(),
            };

            let mut token_file = tempfile::NamedTempFile::new().unwrap();
            if token_present {
                write!(token_file, "hf_testtoken").unwrap();
                token_file.flush().unwrap();
            }

            let gate = CredentialGate::from_config(&crate::config::AuthConfig::default())
                .with_token_file(token_file.path())
                .with_env_var("TARTIL_PIPELINE_TEST_UNSET");

            let input_dir = tempfile::tempdir().unwrap();
            let temp_dir = tempfile::tempdir().unwrap();

            let preparer = AudioPreparer::new()
                .with_quiet(true)
                .with_temp_dir(temp_dir.path());

            let pipeline = Pipeline::new(
                PipelineConfig {
                    quiet: true,
                    verbosity: 0,
                },
                gate,
                preparer,
                Arc::new(StaticCapabilities(caps)),
            );

            Self {
                transcriber,
                position,
                tajweed,
                scoring,
                _token_file: token_file,
                input_dir,
                temp_dir,
                pipeline,
            }
        }

        fn reference(&self) -> PathBuf {
            self.input_dir.path().join("recitation.wav")
        }

        fn temp_files(&self) -> Vec<PathBuf> {
            fs::read_dir(self.temp_dir.path())
                .unwrap()
                .map(|entry| entry.unwrap().path())
                .collect()
        }
    }

    fn spans(pairs: &[(&str, f32)]) -> Vec<TokenSpan> {
        pairs
            .iter()
            .map(|(entity, score)| TokenSpan {
                entity: entity.to_string(),
                score: *score,
            })
            .collect()
    }

    fn labels(pairs: &[(&str, f32)]) -> Vec<ScoredLabel> {
        pairs
            .iter()
            .map(|(label, score)| ScoredLabel {
                label: label.to_string(),
                score: *score,
            })
            .collect()
    }

    #[tokio::test]
    async fn full_run_aggregates_all_stage_outputs() {
        let fixture = Fixture::new(
            MockTranscriber::new().with_response("  بسم الله الرحمن الرحيم  "),
            MockPositionClassifier::new().with_top_label("surah_2_ayah_255", 0.93),
            MockTokenClassifier::new().with_spans(spans(&[
                ("ghunnah", 0.9),
                ("ghunnah", 0.5),
                ("qalqalah", 0.75),
            ])),
            MockTextClassifier::new().with_labels(labels(&[("good", 0.8)])),
        );

        let outcome = fixture.pipeline.run(&fixture.reference()).await.unwrap();

        let result = outcome.result().expect("expected a completed outcome");
        assert_eq!(result.text, "بسم الله الرحمن الرحيم");
        assert_eq!(result.surah, 2);
        assert_eq!(result.ayah, 255);
        let expected: BTreeSet<String> = ["ghunnah", "qalqalah"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(result.tajweed_errors, expected);
        assert_eq!(result.pronunciation_score, 92);

        // Every stage ran exactly once
        assert_eq!(fixture.transcriber.calls(), 1);
        assert_eq!(fixture.position.calls(), 1);
        assert_eq!(fixture.tajweed.calls(), 1);
        assert_eq!(fixture.scoring.calls(), 1);

        // Temporary audio was removed
        assert!(fixture.temp_files().is_empty());
    }

    #[tokio::test]
    async fn missing_credential_aborts_before_any_stage() {
        let fixture = Fixture::with_gate_token(
            MockTranscriber::new(),
            MockPositionClassifier::new(),
            MockTokenClassifier::new(),
            MockTextClassifier::new(),
            false,
        );
        let reference = fixture.reference();

        let outcome = fixture.pipeline.run(&reference).await.unwrap();

        assert_eq!(outcome, Outcome::Aborted(AbortReason::MissingCredential));
        assert!(outcome.result().is_none());

        // The preparer never ran: no placeholder was synthesized at the
        // reference path and no temporary audio was created.
        assert!(!reference.exists());
        assert!(fixture.temp_files().is_empty());

        // No stage was invoked
        assert_eq!(fixture.transcriber.calls(), 0);
        assert_eq!(fixture.position.calls(), 0);
        assert_eq!(fixture.tajweed.calls(), 0);
        assert_eq!(fixture.scoring.calls(), 0);
    }

    #[tokio::test]
    async fn empty_transcription_aborts_but_cleans_up() {
        let fixture = Fixture::new(
            MockTranscriber::new().with_response("   "),
            MockPositionClassifier::new().with_top_label("surah_1_ayah_1", 0.9),
            MockTokenClassifier::new(),
            MockTextClassifier::new(),
        );

        let outcome = fixture.pipeline.run(&fixture.reference()).await.unwrap();

        assert_eq!(outcome, Outcome::Aborted(AbortReason::EmptyTranscription));

        // Transcription ran, nothing after it did
        assert_eq!(fixture.transcriber.calls(), 1);
        assert_eq!(fixture.position.calls(), 0);
        assert_eq!(fixture.tajweed.calls(), 0);
        assert_eq!(fixture.scoring.calls(), 0);

        // Temporary audio was still removed
        assert!(fixture.temp_files().is_empty());
    }

    #[tokio::test]
    async fn missing_reference_synthesizes_placeholder_and_completes() {
        let fixture = Fixture::new(
            MockTranscriber::new().with_response("الحمد لله"),
            MockPositionClassifier::new().with_top_label("surah_1_ayah_2", 0.8),
            MockTokenClassifier::new(),
            MockTextClassifier::new().with_labels(labels(&[("ok", 0.6)])),
        );
        let reference = fixture.reference();
        assert!(!reference.exists());

        let outcome = fixture.pipeline.run(&reference).await.unwrap();

        // The placeholder tone was written to the requested path
        assert!(reference.exists());

        let result = outcome.result().expect("expected a completed outcome");
        assert_eq!(result.surah, 1);
        assert_eq!(result.ayah, 2);
        assert_eq!(result.pronunciation_score, 92);
        assert!(result.tajweed_errors.is_empty());
    }

    #[tokio::test]
    async fn unparsable_position_label_falls_back_to_default() {
        let fixture = Fixture::new(
            MockTranscriber::new().with_response("قل هو الله أحد"),
            MockPositionClassifier::new().with_top_label("chapter_2_verse_255", 0.9),
            MockTokenClassifier::new(),
            MockTextClassifier::new(),
        );

        let outcome = fixture.pipeline.run(&fixture.reference()).await.unwrap();

        let result = outcome.result().unwrap();
        assert_eq!(result.surah, 1);
        assert_eq!(result.ayah, 2);
    }

    #[tokio::test]
    async fn empty_scoring_result_yields_zero() {
        let fixture = Fixture::new(
            MockTranscriber::new().with_response("قل هو الله أحد"),
            MockPositionClassifier::new(),
            MockTokenClassifier::new(),
            MockTextClassifier::new(),
        );

        let outcome = fixture.pipeline.run(&fixture.reference()).await.unwrap();

        assert_eq!(outcome.result().unwrap().pronunciation_score, 0);
    }

    #[tokio::test]
    async fn transcription_failure_propagates_and_cleans_up() {
        let fixture = Fixture::new(
            MockTranscriber::new().with_failure(),
            MockPositionClassifier::new(),
            MockTokenClassifier::new(),
            MockTextClassifier::new(),
        );

        let result = fixture.pipeline.run(&fixture.reference()).await;

        assert!(result.is_err());
        assert!(fixture.temp_files().is_empty());
    }

    #[tokio::test]
    async fn stage_failure_after_transcription_propagates_and_cleans_up() {
        let fixture = Fixture::new(
            MockTranscriber::new().with_response("بسم الله"),
            MockPositionClassifier::new().with_failure(),
            MockTokenClassifier::new(),
            MockTextClassifier::new(),
        );

        let result = fixture.pipeline.run(&fixture.reference()).await;

        assert!(result.is_err());
        assert!(fixture.temp_files().is_empty());
    }

    #[tokio::test]
    async fn corrupt_audio_reference_is_fatal() {
        let fixture = Fixture::new(
            MockTranscriber::new(),
            MockPositionClassifier::new(),
            MockTokenClassifier::new(),
            MockTextClassifier::new(),
        );
        let reference = fixture.reference();
        fs::write(&reference, b"not a wav file").unwrap();

        let result = fixture.pipeline.run(&reference).await;

        assert!(result.is_err());
        assert_eq!(fixture.transcriber.calls(), 0);
    }

    #[test]
    fn inference_result_serializes_with_original_keys() {
        let result = InferenceResult {
            text: "بسم الله".to_string(),
            surah: 2,
            ayah: 255,
            tajweed_errors: ["qalqalah", "ghunnah"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            pronunciation_score: 92,
        };

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["text"], "بسم الله");
        assert_eq!(json["surah"], 2);
        assert_eq!(json["ayah"], 255);
        // BTreeSet serializes sorted
        assert_eq!(
            json["tajweed_errors"],
            serde_json::json!(["ghunnah", "qalqalah"])
        );
        assert_eq!(json["pronunciation_score"], 92);
    }

    #[test]
    fn abort_reasons_are_human_readable() {
        assert!(AbortReason::MissingCredential.to_string().contains("token"));
        assert!(
            AbortReason::EmptyTranscription
                .to_string()
                .contains("empty text")
        );
    }
}
