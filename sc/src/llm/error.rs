//! LLM error types

use thiserror::Error;

/// Fallback text when a transport error has no message of its own
pub const TRANSPORT_FALLBACK: &str = "Failed to get AI response";

/// Errors that can occur during LLM operations
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API error {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl LlmError {
    /// Human-readable message suitable for showing to the user
    ///
    /// API errors surface the provider's own message verbatim.
    pub fn user_message(&self) -> String {
        let message = match self {
            LlmError::ApiError { message, .. } => message.clone(),
            LlmError::Network(e) => e.to_string(),
            LlmError::InvalidResponse(message) => message.clone(),
            LlmError::Json(e) => e.to_string(),
        };
        if message.trim().is_empty() {
            TRANSPORT_FALLBACK.to_string()
        } else {
            message
        }
    }

    /// Check if the remote side answered with a non-success status
    pub fn is_api_error(&self) -> bool {
        matches!(self, LlmError::ApiError { .. })
    }
}
