//! Verse-position detection from audio classification labels.
//!
//! The classifier encodes a position as `surah_<N>_ayah_<M>`. That string
//! convention is an untyped contract, so parsing is defensive: anything that
//! does not match exactly falls back to the default position instead of
//! raising.

use crate::audio::{PreparedAudio, decode};
use crate::defaults::{DEFAULT_AYAH, DEFAULT_SURAH};
use crate::error::Result;
use crate::hf::{HfClient, ScoredLabel, parse_scored_labels};
use crate::stages::PositionClassifier;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// A verse coordinate: surah (chapter) and ayah (verse), both 1-based.
///
/// Never partially defaulted: either both fields come from a parsed label,
/// or both are the documented defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VersePosition {
    pub surah: u32,
    pub ayah: u32,
}

impl Default for VersePosition {
    fn default() -> Self {
        Self {
            surah: DEFAULT_SURAH,
            ayah: DEFAULT_AYAH,
        }
    }
}

impl fmt::Display for VersePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "surah {}, ayah {}", self.surah, self.ayah)
    }
}

/// Parse a `surah_<N>_ayah_<M>` label.
///
/// Requires at least four `_`-separated tokens with the literal `surah` and
/// `ayah` markers in place and positive integer coordinates. Returns `None`
/// for anything else.
pub fn parse_position_label(label: &str) -> Option<VersePosition> {
    let parts: Vec<&str> = label.split('_').collect();
    if parts.len() < 4 || parts[0] != "surah" || parts[2] != "ayah" {
        return None;
    }

    let surah: u32 = parts[1].parse().ok()?;
    let ayah: u32 = parts[3].parse().ok()?;
    if surah == 0 || ayah == 0 {
        return None;
    }

    Some(VersePosition { surah, ayah })
}

/// Map a ranked label list to a position: top label parsed, default on any
/// parse failure or an empty list.
pub fn position_from_labels(labels: &[ScoredLabel]) -> VersePosition {
    labels
        .first()
        .and_then(|top| parse_position_label(&top.label))
        .unwrap_or_default()
}

/// HTTP-backed audio classifier for verse positions.
pub struct HfPositionClassifier {
    client: Arc<HfClient>,
    model: String,
}

impl HfPositionClassifier {
    pub fn new(client: Arc<HfClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl PositionClassifier for HfPositionClassifier {
    async fn classify(&self, audio: &PreparedAudio) -> Result<Vec<ScoredLabel>> {
        let wav = decode::wav_bytes(audio.samples(), audio.sample_rate())?;
        let body = self.client.post_audio(&self.model, wav).await?;
        parse_scored_labels(&self.model, &body)
    }
}
