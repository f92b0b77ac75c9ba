//! Speech-to-text over the hosted inference API.
//!
//! Long recitations are split into overlapping chunks client-side and
//! decoded one chunk at a time, so a full surah does not exceed what the
//! hosted model accepts in a single request.

use crate::audio::{PreparedAudio, decode};
use crate::defaults::{CHUNK_SECS, STRIDE_SECS};
use crate::error::Result;
use crate::hf::{HfClient, parse_speech_text};
use crate::stages::Transcriber;
use async_trait::async_trait;
use std::sync::Arc;

/// HTTP-backed transcriber with chunked decoding.
pub struct HfTranscriber {
    client: Arc<HfClient>,
    model: String,
    chunk_secs: u32,
    stride_secs: u32,
}

impl HfTranscriber {
    pub fn new(client: Arc<HfClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            chunk_secs: CHUNK_SECS,
            stride_secs: STRIDE_SECS,
        }
    }

    /// Override chunk length and overlap.
    pub fn with_chunking(mut self, chunk_secs: u32, stride_secs: u32) -> Self {
        self.chunk_secs = chunk_secs;
        self.stride_secs = stride_secs;
        self
    }
}

#[async_trait]
impl Transcriber for HfTranscriber {
    async fn transcribe(&self, audio: &PreparedAudio) -> Result<String> {
        let rate = audio.sample_rate();
        let chunk_len = (self.chunk_secs * rate) as usize;
        let stride_len = (self.stride_secs * rate) as usize;

        let mut parts: Vec<String> = Vec::new();
        for (start, end) in chunk_ranges(audio.samples().len(), chunk_len, stride_len) {
            let wav = decode::wav_bytes(&audio.samples()[start..end], rate)?;
            let body = self.client.post_audio(&self.model, wav).await?;
            let chunk_text = parse_speech_text(&self.model, &body)?.text;
            let trimmed = chunk_text.trim();
            if !trimmed.is_empty() {
                parts.push(trimmed.to_string());
            }
        }

        Ok(parts.join(" ").trim().to_string())
    }
}

/// Split `len` samples into chunks of `chunk_len` overlapping by `stride_len`.
///
/// Returns `(start, end)` pairs covering every sample; the final chunk may
/// be shorter. A stride as long as the chunk degenerates to no overlap.
fn chunk_ranges(len: usize, chunk_len: usize, stride_len: usize) -> Vec<(usize, usize)> {
    if len == 0 || chunk_len == 0 {
        return Vec::new();
    }

    let step = if stride_len < chunk_len {
        chunk_len - stride_len
    } else {
        chunk_len
    };

    let mut ranges = Vec::new();
    let mut start = 0;
    loop {
        let end = (start + chunk_len).min(len);
        ranges.push((start, end));
        if end == len {
            break;
        }
        start += step;
    }
    ranges
}
