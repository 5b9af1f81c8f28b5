//! Remote generator
//!
//! Flattens the system instruction and the recent transcript into a single
//! prompt and asks the remote model for the reply.

use std::sync::Arc;

use async_trait::async_trait;
use eyre::Result;
use tracing::{debug, info, warn};

use super::{GenerateError, GenerationContext, ResponseGenerator};
use crate::config::LlmConfig;
use crate::llm::{GenerationRequest, LlmClient};
use crate::prompts::PromptLoader;
use crate::session::{Conversation, ConversationTurn};

pub struct RemoteGenerator {
    client: Arc<dyn LlmClient>,
    system_prompt: String,
    temperature: f64,
    max_output_tokens: u32,
    history_window: usize,
}

impl RemoteGenerator {
    pub fn new(client: Arc<dyn LlmClient>, prompts: &PromptLoader, config: &LlmConfig) -> Result<Self> {
        debug!(model = %config.model, history_window = config.history_window, "RemoteGenerator::new: called");
        Ok(Self {
            client,
            system_prompt: prompts.system_prompt()?,
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
            history_window: config.history_window.max(1),
        })
    }

    /// System instruction, then the last `history_window` turns including
    /// the pending user input, one `Role: text` line each
    pub fn assemble_prompt(&self, conversation: &Conversation, input: &str) -> String {
        debug!(turn_count = conversation.len(), "RemoteGenerator::assemble_prompt: called");
        let pending = ConversationTurn::user(input);
        let earlier = conversation.recent(self.history_window - 1);

        let mut prompt = format!("{}\n\nConversation:\n", self.system_prompt);
        for turn in earlier.iter().chain(std::iter::once(&pending)) {
            prompt.push_str(&turn.render());
            prompt.push('\n');
        }
        prompt
    }
}

#[async_trait]
impl ResponseGenerator for RemoteGenerator {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn generate(&self, ctx: GenerationContext<'_>) -> Result<String, GenerateError> {
        debug!(next = %ctx.plan.next, "RemoteGenerator::generate: called");
        let Some(credential) = ctx.credential else {
            debug!("RemoteGenerator::generate: no credential");
            return Err(GenerateError::NotConfigured);
        };

        let request = GenerationRequest {
            prompt: self.assemble_prompt(ctx.conversation, ctx.input),
            temperature: self.temperature,
            max_output_tokens: self.max_output_tokens,
        };
        info!(
            action = ?ctx.plan.strategy.action,
            advisory_temperature = ctx.plan.strategy.temperature,
            prompt_len = request.prompt.len(),
            "Calling remote model"
        );

        match self.client.generate(credential, request).await {
            Ok(text) => {
                debug!(reply_len = text.len(), "RemoteGenerator::generate: success");
                Ok(text)
            }
            Err(e) => {
                if e.is_api_error() {
                    warn!(error = %e, "Remote model rejected the request");
                } else {
                    warn!(error = %e, "Remote generation failed");
                }
                Err(GenerateError::Api(e.user_message()))
            }
        }
    }
}
