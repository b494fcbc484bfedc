//! HTTP client for a Gemini-style `generateContent` endpoint.
//!
//! One request per call. There is no retry and no backoff: a failed call
//! surfaces as a [`GenAiError`] and the caller decides what to do.

use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::Deserialize;

/// Default API root when `GENAI_BASE_URL` is not set.
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default model when `GENAI_MODEL` is not set.
const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Errors from the generative-AI client.
#[derive(Debug, thiserror::Error)]
pub enum GenAiError {
    /// No API key was configured.
    #[error("Generative AI is not configured")]
    NotConfigured,

    /// The HTTP request itself failed (network, DNS, TLS, timeout).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The API returned a non-2xx status code.
    #[error("Generative AI API error ({status}): {body}")]
    Api { status: u16, body: String },

    /// The reply contained no candidate text.
    #[error("Generative AI returned no content")]
    EmptyResponse,
}

// ---------------------------------------------------------------------------
// GenAiConfig
// ---------------------------------------------------------------------------

/// Configuration for the generative-AI client.
#[derive(Debug, Clone)]
pub struct GenAiConfig {
    /// API key. `None` disables AI features.
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl GenAiConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable             | Required | Default                                            |
    /// |----------------------|----------|----------------------------------------------------|
    /// | `GENAI_API_KEY`      | no       | unset (AI endpoints answer 503)                    |
    /// | `GENAI_BASE_URL`     | no       | `https://generativelanguage.googleapis.com/v1beta` |
    /// | `GENAI_MODEL`        | no       | `gemini-1.5-flash`                                 |
    /// | `GENAI_TIMEOUT_SECS` | no       | `30`                                               |
    pub fn from_env() -> Self {
        Self {
            api_key: std::env::var("GENAI_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            base_url: std::env::var("GENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            model: std::env::var("GENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            timeout_secs: std::env::var("GENAI_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Raw image bytes sent alongside a prompt.
#[derive(Debug, Clone)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

// ---------------------------------------------------------------------------
// GenAiClient
// ---------------------------------------------------------------------------

/// HTTP client for the generative-AI API.
pub struct GenAiClient {
    client: reqwest::Client,
    config: GenAiConfig,
}

impl GenAiClient {
    pub fn new(config: GenAiConfig) -> Result<Self, GenAiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_configured()
    }

    /// Send `prompt` (and optionally an image) and return the reply text.
    pub async fn generate(
        &self,
        prompt: &str,
        image: Option<&InlineImage>,
    ) -> Result<String, GenAiError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(GenAiError::NotConfigured)?;

        let mut parts = vec![serde_json::json!({ "text": prompt })];
        if let Some(image) = image {
            parts.push(serde_json::json!({
                "inline_data": {
                    "mime_type": image.mime_type,
                    "data": STANDARD.encode(&image.data),
                }
            }));
        }
        let body = serde_json::json!({
            "contents": [{ "parts": parts }],
            "generationConfig": { "temperature": 0.4 },
        });

        let url = format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        );
        let response = self
            .client
            .post(url)
            .query(&[("key", api_key)])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(GenAiError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        parsed.into_text().ok_or(GenAiError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_candidate_text_is_joined() {
        let raw = serde_json::json!({
            "candidates": [
                { "content": { "parts": [{ "text": "{\"a\":" }, { "text": "1}" }] } },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        });
        let parsed: GenerateResponse = serde_json::from_value(raw).unwrap();
        assert_eq!(parsed.into_text().as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn missing_candidates_is_empty() {
        let parsed: GenerateResponse = serde_json::from_value(serde_json::json!({})).unwrap();
        assert!(parsed.into_text().is_none());

        let blank: GenerateResponse = serde_json::from_value(serde_json::json!({
            "candidates": [{ "content": { "parts": [{ "text": "  " }] } }]
        }))
        .unwrap();
        assert!(blank.into_text().is_none());
    }

    #[test]
    fn error_display() {
        let err = GenAiError::Api {
            status: 429,
            body: "quota".into(),
        };
        assert_eq!(err.to_string(), "Generative AI API error (429): quota");
    }
}
