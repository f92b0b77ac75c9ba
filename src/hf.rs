//! Client for the hosted model inference API.
//!
//! Every model capability is reached the same way: POST the input (WAV bytes
//! or JSON text) to `<endpoint>/<model-id>` with a bearer token, and parse a
//! task-specific JSON response. Response parsing lives in standalone
//! functions so malformed payloads can be exercised without a network.

use crate::auth::ApiToken;
use crate::error::{Result, TartilError};
use serde::Deserialize;
use std::time::Duration;

/// One ranked label from an audio or text classifier.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ScoredLabel {
    pub label: String,
    pub score: f32,
}

/// One classified token/span from a token classifier.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TokenSpan {
    pub entity: String,
    pub score: f32,
}

/// Speech-to-text response payload.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SpeechText {
    pub text: String,
}

/// HTTP client bound to one endpoint and one credential.
#[derive(Debug, Clone)]
pub struct HfClient {
    http: reqwest::Client,
    endpoint: String,
    token: ApiToken,
}

impl HfClient {
    /// Build a client with a per-request timeout.
    pub fn new(endpoint: impl Into<String>, token: ApiToken, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TartilError::Other(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    fn model_url(&self, model: &str) -> String {
        format!("{}/{}", self.endpoint, model)
    }

    /// POST WAV bytes to a model and return the raw response body.
    pub async fn post_audio(&self, model: &str, wav: Vec<u8>) -> Result<String> {
        let response = self
            .http
            .post(self.model_url(model))
            .header("Authorization", format!("Bearer {}", self.token.as_str()))
            .header("Content-Type", "audio/wav")
            .body(wav)
            .send()
            .await
            .map_err(|e| TartilError::Api {
                model: model.to_string(),
                message: e.to_string(),
            })?;

        Self::read_body(model, response).await
    }

    /// POST text input to a model and return the raw response body.
    pub async fn post_text(&self, model: &str, text: &str) -> Result<String> {
        let payload = serde_json::json!({ "inputs": text });
        let response = self
            .http
            .post(self.model_url(model))
            .header("Authorization", format!("Bearer {}", self.token.as_str()))
            .json(&payload)
            .send()
            .await
            .map_err(|e| TartilError::Api {
                model: model.to_string(),
                message: e.to_string(),
            })?;

        Self::read_body(model, response).await
    }

    async fn read_body(model: &str, response: reqwest::Response) -> Result<String> {
        let status = response.status();
        let body = response.text().await.map_err(|e| TartilError::Api {
            model: model.to_string(),
            message: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(TartilError::Api {
                model: model.to_string(),
                message: format!("status {status}: {body}"),
            });
        }

        Ok(body)
    }
}

/// Parse a speech-to-text response: `{"text": "..."}`.
pub fn parse_speech_text(model: &str, body: &str) -> Result<SpeechText> {
    serde_json::from_str(body).map_err(|e| TartilError::ApiResponse {
        model: model.to_string(),
        message: e.to_string(),
    })
}

/// Parse a ranked-label response: `[{"label": ..., "score": ...}]`.
///
/// Text classifiers sometimes nest the list one level deeper
/// (`[[{...}]]`); both shapes are accepted.
pub fn parse_scored_labels(model: &str, body: &str) -> Result<Vec<ScoredLabel>> {
    if let Ok(labels) = serde_json::from_str::<Vec<ScoredLabel>>(body) {
        return Ok(labels);
    }
    serde_json::from_str::<Vec<Vec<ScoredLabel>>>(body)
        .map(|nested| nested.into_iter().flatten().collect())
        .map_err(|e| TartilError::ApiResponse {
            model: model.to_string(),
            message: e.to_string(),
        })
}

/// Parse a token-classification response: `[{"entity": ..., "score": ...}]`.
pub fn parse_token_spans(model: &str, body: &str) -> Result<Vec<TokenSpan>> {
    serde_json::from_str(body).map_err(|e| TartilError::ApiResponse {
        model: model.to_string(),
        message: e.to_string(),
    })
}
