//! Turn orchestration
//!
//! Runs one user turn through extraction, state tracking, planning and
//! generation. The orchestrator owns the session; a turn works on a copy of
//! the state and commits it, together with the two transcript turns, only
//! when a reply was produced. A turn that arrives while another is in flight
//! is rejected with [`TurnOutcome::Busy`].

use std::time::Duration;

use eyre::{Context, Result};
use serde::Serialize;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, error, info, warn};

use crate::config::{Config, Mode};
use crate::credential::{Credential, CredentialError, CredentialStore};
use crate::extract::{ExtractedFields, Extractor, PatternExtractor};
use crate::generate::{GenerateError, GenerationContext, RemoteGenerator, ResponseGenerator, TemplateGenerator};
use crate::llm::create_client;
use crate::planner::{Plan, plan};
use crate::prompts::PromptLoader;
use crate::session::{
    CONTEXT_WINDOW, ContextSummary, Conversation, ConversationTurn, MissingField, Session, SessionState, track,
};

/// Shown when something unexpected broke inside the pipeline
pub const APOLOGY: &str = "Sorry, something went wrong. Please try again.";

/// Result of one turn as the user should see it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// A reply to display
    Reply(String),
    /// The remote generator has no credential; ask for one
    NeedsCredential,
    /// The remote call failed; the message comes from the provider
    RemoteFailure { message: String },
    /// An unexpected pipeline error, already logged
    Unexpected,
    /// Another turn is still being processed
    Busy,
}

impl TurnOutcome {
    /// Text for the assistant bubble, if this outcome produces one
    pub fn display_text(&self) -> Option<String> {
        match self {
            Self::Reply(text) => Some(text.clone()),
            Self::RemoteFailure { message } => Some(format!("Sorry, I encountered an error: {}", message)),
            Self::Unexpected => Some(APOLOGY.to_string()),
            Self::NeedsCredential | Self::Busy => None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::RemoteFailure { .. } | Self::Unexpected)
    }
}

/// State stage output
#[derive(Debug, Clone, Serialize)]
pub struct StateTrace {
    pub state: SessionState,
    pub missing: Vec<MissingField>,
    pub context: ContextSummary,
}

/// Generation stage output
#[derive(Debug, Clone, Serialize)]
pub struct GenerationTrace {
    pub generator: &'static str,
    pub status: String,
}

/// Snapshot of every stage of one turn, filled in as stages complete
#[derive(Debug, Clone, Default, Serialize)]
pub struct TurnTrace {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub understanding: Option<ExtractedFields>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<StateTrace>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<Plan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation: Option<GenerationTrace>,
}

/// What `handle_turn` hands back to the front end
#[derive(Debug, Clone)]
pub struct TurnReport {
    pub outcome: TurnOutcome,
    pub trace: TurnTrace,
}

/// Owns the session and drives the four stages
pub struct Orchestrator {
    extractor: Box<dyn Extractor>,
    generator: Box<dyn ResponseGenerator>,
    session: Mutex<Session>,
    credential: RwLock<Option<Credential>>,
    credential_store: Option<CredentialStore>,
    stage_delay: Duration,
    context_window: usize,
}

impl Orchestrator {
    pub fn new(extractor: Box<dyn Extractor>, generator: Box<dyn ResponseGenerator>) -> Self {
        debug!(generator = generator.name(), "Orchestrator::new: called");
        Self {
            extractor,
            generator,
            session: Mutex::new(Session::new()),
            credential: RwLock::new(None),
            credential_store: None,
            stage_delay: Duration::ZERO,
            context_window: CONTEXT_WINDOW,
        }
    }

    /// Build the full pipeline for `mode` from configuration
    pub fn from_config(config: &Config, mode: Mode) -> Result<Self> {
        debug!(?mode, "Orchestrator::from_config: called");
        let prompts = PromptLoader::new(config.prompts.dir.clone());

        let generator: Box<dyn ResponseGenerator> = match mode {
            Mode::Local => Box::new(TemplateGenerator::new(prompts, config.curriculum.clone())),
            Mode::Remote => {
                let client = create_client(&config.llm).context("Failed to create LLM client")?;
                Box::new(RemoteGenerator::new(client, &prompts, &config.llm)?)
            }
        };

        let store = CredentialStore::new(&config.credential.path).with_env_fallback(&config.llm.api_key_env);
        let credential = match store.load() {
            Ok(credential) => credential,
            Err(e) if mode == Mode::Local => {
                // Local replies never use the key
                warn!(error = %e, "Ignoring unreadable credential");
                None
            }
            Err(e) => return Err(e).context("Failed to load credential"),
        };

        let mut orchestrator = Self::new(Box::new(PatternExtractor::new()), generator)
            .with_credential_store(store)
            .with_stage_delay(Duration::from_millis(config.pacing.stage_delay_ms))
            .with_context_window(config.llm.context_window);
        if let Some(credential) = credential {
            orchestrator = orchestrator.with_credential(credential);
        }

        info!(?mode, "Orchestrator ready");
        Ok(orchestrator)
    }

    /// Persist submitted credentials to `store`
    pub fn with_credential_store(mut self, store: CredentialStore) -> Self {
        debug!(path = ?store.path(), "Orchestrator::with_credential_store: called");
        self.credential_store = Some(store);
        self
    }

    /// Use an in-memory credential without persisting it
    pub fn with_credential(mut self, credential: Credential) -> Self {
        self.credential = RwLock::new(Some(credential));
        self
    }

    pub fn with_stage_delay(mut self, delay: Duration) -> Self {
        self.stage_delay = delay;
        self
    }

    pub fn with_context_window(mut self, window: usize) -> Self {
        self.context_window = window;
        self
    }

    pub fn generator_name(&self) -> &'static str {
        self.generator.name()
    }

    pub async fn has_credential(&self) -> bool {
        self.credential.read().await.is_some()
    }

    /// Validate, persist and activate a credential submitted by the user
    pub async fn submit_credential(&self, raw: &str) -> Result<(), CredentialError> {
        debug!("Orchestrator::submit_credential: called");
        let credential = Credential::new(raw)?;
        if let Some(store) = &self.credential_store {
            store.save(&credential)?;
        }
        *self.credential.write().await = Some(credential);
        info!("Credential updated");
        Ok(())
    }

    /// Copy of the current learning goal
    pub async fn state(&self) -> SessionState {
        self.session.lock().await.state.clone()
    }

    /// Copy of the transcript
    pub async fn conversation(&self) -> Conversation {
        self.session.lock().await.conversation.clone()
    }

    /// Start a new session; refused while a turn is in flight
    pub fn reset(&self) -> bool {
        match self.session.try_lock() {
            Ok(mut session) => {
                session.reset();
                info!(session_id = %session.id, "Session reset");
                true
            }
            Err(_) => {
                warn!("Reset refused: a turn is in progress");
                false
            }
        }
    }

    async fn pause(&self) {
        if !self.stage_delay.is_zero() {
            tokio::time::sleep(self.stage_delay).await;
        }
    }

    /// Run one user turn
    pub async fn handle_turn(&self, input: &str) -> TurnReport {
        let input = input.trim();
        debug!(input_len = input.len(), "Orchestrator::handle_turn: called");

        let Ok(mut session) = self.session.try_lock() else {
            warn!("Turn rejected: another turn is in progress");
            return TurnReport {
                outcome: TurnOutcome::Busy,
                trace: TurnTrace::default(),
            };
        };

        let mut trace = TurnTrace::default();
        let outcome = self.run_pipeline(&mut session, input, &mut trace).await;
        info!(session_id = %session.id, ?outcome, "Turn finished");
        TurnReport { outcome, trace }
    }

    async fn run_pipeline(&self, session: &mut Session, input: &str, trace: &mut TurnTrace) -> TurnOutcome {
        // Understanding
        let extracted = self.extractor.extract(input);
        if extracted.is_empty() {
            debug!(intent = %extracted.intent, "run_pipeline: no goal fields recognized");
        }
        trace.understanding = Some(extracted.clone());
        self.pause().await;

        // State
        let mut next_state = session.state.clone();
        let missing = track(&extracted, &mut next_state);
        trace.state = Some(StateTrace {
            state: next_state.clone(),
            missing: missing.clone(),
            context: session.conversation.summarize(self.extractor.as_ref(), self.context_window),
        });
        self.pause().await;

        // Planning
        let plan = plan(&missing, extracted.intent);
        trace.plan = Some(plan);
        self.pause().await;

        // Generation
        let credential = self.credential.read().await.clone();
        let result = self
            .generator
            .generate(GenerationContext {
                plan: &plan,
                state: &next_state,
                conversation: &session.conversation,
                input,
                credential: credential.as_ref(),
            })
            .await;

        let (outcome, status) = match result {
            Ok(reply) => {
                session.state = next_state;
                session.conversation.push(ConversationTurn::user(input));
                session.conversation.push(ConversationTurn::assistant(reply.clone()));
                (TurnOutcome::Reply(reply), "Response ready".to_string())
            }
            Err(GenerateError::NotConfigured) => {
                info!("No credential configured, asking the user for one");
                (TurnOutcome::NeedsCredential, GenerateError::NotConfigured.to_string())
            }
            Err(GenerateError::Api(message)) => {
                let status = format!("Error: {}", message);
                (TurnOutcome::RemoteFailure { message }, status)
            }
            Err(e @ GenerateError::Internal(_)) => {
                error!(error = %e, "Pipeline failed");
                (TurnOutcome::Unexpected, format!("Error: {}", e))
            }
        };

        trace.generation = Some(GenerationTrace {
            generator: self.generator.name(),
            status,
        });
        outcome
    }
}
