//! Socratis - Conversational Learning-Plan Assistant
//!
//! Socratis collects a learning goal (topic, duration, skill level) from
//! free-text input and either asks a follow-up question or produces a
//! day-by-day study plan. Replies come from local templates or from a remote
//! Gemini model.
//!
//! # Pipeline
//!
//! Every user turn runs four stages in order:
//!
//! ```text
//! input ─▶ Extractor ─▶ StateTracker ─▶ Planner ─▶ ResponseGenerator ─▶ reply
//!                            │
//!                       SessionState (the only thing kept between turns)
//! ```
//!
//! # Modules
//!
//! - [`extract`] - Free-text understanding (topic, duration, level, intent)
//! - [`session`] - Session state, merge policy and the conversation transcript
//! - [`planner`] - Next-action decision and response strategy
//! - [`generate`] - Template and remote response generators
//! - [`curriculum`] - Topic to day-by-day curriculum table
//! - [`llm`] - Gemini client behind the `LlmClient` trait
//! - [`orchestrator`] - Runs one turn through the pipeline
//! - [`repl`] - Interactive terminal front end
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod cli;
pub mod config;
pub mod credential;
pub mod curriculum;
pub mod extract;
pub mod generate;
pub mod llm;
pub mod orchestrator;
pub mod planner;
pub mod prompts;
pub mod repl;
pub mod session;

// Re-export commonly used types
pub use config::{Config, LlmConfig, Mode};
pub use credential::{Credential, CredentialError, CredentialStore};
pub use curriculum::Curriculum;
pub use extract::{ExtractedFields, Extractor, Intent, PatternExtractor, StudyDuration, TimeUnit};
pub use generate::{GenerateError, GenerationContext, RemoteGenerator, ResponseGenerator, TemplateGenerator};
pub use llm::{GeminiClient, GenerationRequest, LlmClient, LlmError, create_client};
pub use orchestrator::{GenerationTrace, Orchestrator, StateTrace, TurnOutcome, TurnReport, TurnTrace};
pub use planner::{NextAction, Plan, ResponseStrategy, StrategyAction, plan};
pub use prompts::{PromptLoader, ReplyContext};
pub use session::{
    ContextSummary, Conversation, ConversationTurn, MissingField, Session, SessionState, Speaker, track,
};
