//! Response generation
//!
//! Two interchangeable strategies behind [`ResponseGenerator`]: templated
//! replies from the curriculum table, and replies from a remote model.
//! Generators read the session; they never mutate it.

use async_trait::async_trait;
use thiserror::Error;

mod remote;
mod template;

pub use remote::RemoteGenerator;
pub use template::TemplateGenerator;

use crate::credential::Credential;
use crate::planner::Plan;
use crate::session::{Conversation, SessionState};

/// Why a reply could not be produced
#[derive(Debug, Error)]
pub enum GenerateError {
    /// No credential is available for the remote model
    #[error("API key not configured. Please set your Gemini API key.")]
    NotConfigured,

    /// The remote call failed; the message is shown to the user as-is
    #[error("{0}")]
    Api(String),

    /// Anything else that went wrong inside the pipeline
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Everything a generator may look at for one turn
#[derive(Debug, Clone, Copy)]
pub struct GenerationContext<'a> {
    pub plan: &'a Plan,
    pub state: &'a SessionState,
    /// Turns committed before this one
    pub conversation: &'a Conversation,
    /// This turn's user text, not yet part of `conversation`
    pub input: &'a str,
    pub credential: Option<&'a Credential>,
}

/// Maps a planned action to displayable text
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    /// Short name for logs and traces
    fn name(&self) -> &'static str;

    async fn generate(&self, ctx: GenerationContext<'_>) -> Result<String, GenerateError>;
}
