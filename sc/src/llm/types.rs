//! LLM request types

use serde::{Deserialize, Serialize};

/// One text-generation call
///
/// The whole conversation is flattened into `prompt`; the remote call is
/// stateless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// System instruction followed by the rendered transcript
    pub prompt: String,

    /// Sampling temperature
    pub temperature: f64,

    /// Output length cap
    pub max_output_tokens: u32,
}
