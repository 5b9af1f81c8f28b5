//! Interactive REPL for Socratis
//!
//! The terminal stands in for the chat window: one line in, one reply out,
//! with per-stage traces and credential prompts.

mod render;
mod session;

pub use render::render_markup;
pub use session::ReplSession;

use std::time::Duration;

use eyre::Result;

use crate::config::{Config, Mode};
use crate::orchestrator::Orchestrator;

/// Options the `chat` subcommand can override
#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    pub mode: Option<Mode>,
    pub trace: bool,
    pub delay_ms: Option<u64>,
}

/// Run the interactive REPL
///
/// This is the main entry point for `sc chat`.
pub async fn run_interactive(config: &Config, options: ChatOptions) -> Result<()> {
    let mode = options.mode.unwrap_or(config.mode);
    let mut orchestrator = Orchestrator::from_config(config, mode)?;
    if let Some(ms) = options.delay_ms {
        orchestrator = orchestrator.with_stage_delay(Duration::from_millis(ms));
    }

    let mut session = ReplSession::new(orchestrator, mode, options.trace);
    session.run().await
}
