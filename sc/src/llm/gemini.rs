//! Gemini API client implementation
//!
//! Implements the LlmClient trait for the `generateContent` endpoint. The
//! credential is passed as the `key` query parameter.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

use super::{GenerationRequest, LlmClient, LlmError};
use crate::config::LlmConfig;
use crate::credential::Credential;

/// Message used when an error body carries no message of its own
const API_FAILURE_FALLBACK: &str = "API request failed";

/// Gemini API client
pub struct GeminiClient {
    model: String,
    base_url: String,
    http: Client,
}

impl GeminiClient {
    /// Create a new client from configuration
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        debug!(model = %config.model, base_url = %config.base_url, "from_config: called");
        let timeout = Duration::from_millis(config.timeout_ms);
        let http = Client::builder().timeout(timeout).build().map_err(LlmError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    /// Build the request body for the Gemini API
    fn build_request_body(&self, request: &GenerationRequest) -> serde_json::Value {
        debug!(%self.model, prompt_len = request.prompt.len(), "build_request_body: called");
        serde_json::json!({
            "contents": [{
                "parts": [{ "text": request.prompt }]
            }],
            "generationConfig": {
                "temperature": request.temperature,
                "maxOutputTokens": request.max_output_tokens,
            }
        })
    }

    /// Pull the provider's message out of an error body
    fn parse_error_message(body: &str) -> String {
        debug!(body_len = body.len(), "parse_error_message: called");
        serde_json::from_str::<GeminiErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .and_then(|e| e.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| API_FAILURE_FALLBACK.to_string())
    }

    /// Extract `candidates[0].content.parts[0].text`
    fn parse_response(api_response: GeminiResponse) -> Result<String, LlmError> {
        debug!(candidate_count = api_response.candidates.len(), "parse_response: called");
        api_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|content| content.parts.into_iter().next())
            .and_then(|part| part.text)
            .ok_or_else(|| {
                debug!("parse_response: missing candidate text");
                LlmError::InvalidResponse("Unexpected response format from Gemini API".to_string())
            })
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate(&self, credential: &Credential, request: GenerationRequest) -> Result<String, LlmError> {
        debug!(%self.model, temperature = request.temperature, max_output_tokens = request.max_output_tokens, "generate: called");
        let body = self.build_request_body(&request);

        let response = self
            .http
            .post(self.endpoint())
            .query(&[("key", credential.expose())])
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                // The key is in the query string; keep the URL out of the message
                let e = e.without_url();
                debug!(error = %e, "generate: network error");
                LlmError::Network(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = Self::parse_error_message(&text);
            warn!(status = status.as_u16(), %message, "Gemini API returned an error");
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let text = response.text().await.map_err(|e| LlmError::Network(e.without_url()))?;
        let api_response: GeminiResponse = serde_json::from_str(&text).map_err(|e| {
            debug!(error = %e, "generate: response is not the expected JSON");
            LlmError::InvalidResponse("Unexpected response format from Gemini API".to_string())
        })?;

        debug!("generate: success");
        Self::parse_response(api_response)
    }
}

// Gemini API response types

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Deserialize)]
struct GeminiPart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    error: Option<GeminiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDetail {
    message: Option<String>,
}
