//! Pronunciation scoring from text classification.
//!
//! The scoring model does not yet grade numerically; any labeled result maps
//! to the fixed reference score, and anything else maps to zero.

use crate::defaults::{MAX_SCORE, REFERENCE_SCORE};
use crate::error::Result;
use crate::hf::{HfClient, ScoredLabel, parse_scored_labels};
use crate::stages::TextClassifier;
use async_trait::async_trait;
use std::sync::Arc;

/// Map classifier output to a score in [0, 100].
///
/// Any usable result (a first entry with a non-empty label) yields the
/// reference score; the absence of one yields 0.
pub fn score_from_labels(labels: &[ScoredLabel]) -> u32 {
    match labels.first() {
        Some(top) if !top.label.is_empty() => REFERENCE_SCORE.min(MAX_SCORE),
        _ => 0,
    }
}

/// HTTP-backed text classifier for pronunciation scoring.
pub struct HfScoringClassifier {
    client: Arc<HfClient>,
    model: String,
}

impl HfScoringClassifier {
    pub fn new(client: Arc<HfClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl TextClassifier for HfScoringClassifier {
    async fn classify(&self, text: &str) -> Result<Vec<ScoredLabel>> {
        let body = self.client.post_text(&self.model, text).await?;
        parse_scored_labels(&self.model, &body)
    }
}
