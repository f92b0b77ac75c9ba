//! Tajweed error detection from token classification.
//!
//! The token classifier flags pronunciation-rule violations span by span.
//! Only confidently flagged categories are reported, and repeated flags for
//! the same category collapse to one.

use crate::defaults::CONFIDENCE_THRESHOLD;
use crate::error::Result;
use crate::hf::{HfClient, TokenSpan, parse_token_spans};
use crate::stages::TokenClassifier;
use async_trait::async_trait;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Keep each category flagged with a score strictly above the threshold.
///
/// A score of exactly 0.7 is excluded. The result is a deduplicated set;
/// `BTreeSet` keeps serialization order stable.
pub fn retain_confident(spans: &[TokenSpan]) -> BTreeSet<String> {
    spans
        .iter()
        .filter(|span| span.score > CONFIDENCE_THRESHOLD)
        .map(|span| span.entity.clone())
        .collect()
}

/// HTTP-backed token classifier for tajweed errors.
pub struct HfTajweedClassifier {
    client: Arc<HfClient>,
    model: String,
}

impl HfTajweedClassifier {
    pub fn new(client: Arc<HfClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl TokenClassifier for HfTajweedClassifier {
    async fn classify(&self, text: &str) -> Result<Vec<TokenSpan>> {
        let body = self.client.post_text(&self.model, text).await?;
        parse_token_spans(&self.model, &body)
    }
}
