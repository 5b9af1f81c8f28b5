//! REPL session management

use colored::Colorize;
use eyre::Result;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing::debug;

use super::render::render_markup;
use crate::config::Mode;
use crate::orchestrator::{Orchestrator, TurnOutcome, TurnTrace};
use crate::session::Speaker;

/// Interactive REPL session
pub struct ReplSession {
    orchestrator: Orchestrator,
    mode: Mode,
    show_trace: bool,
}

impl ReplSession {
    pub fn new(orchestrator: Orchestrator, mode: Mode, show_trace: bool) -> Self {
        debug!(?mode, show_trace, "ReplSession::new: called");
        Self {
            orchestrator,
            mode,
            show_trace,
        }
    }

    /// Run the REPL main loop
    pub async fn run(&mut self) -> Result<()> {
        self.print_welcome().await;

        let mut rl = DefaultEditor::new().map_err(|e| eyre::eyre!("Failed to initialize readline: {}", e))?;

        loop {
            let readline = rl.readline(&format!("{} ", ">".bright_green()));

            match readline {
                Ok(line) => {
                    let input = line.trim();
                    if input.is_empty() {
                        continue;
                    }

                    let _ = rl.add_history_entry(input);

                    if input.starts_with('/') {
                        match self.handle_slash_command(input).await {
                            SlashResult::Continue => continue,
                            SlashResult::Quit => break,
                        }
                    } else {
                        self.process_user_input(&mut rl, input).await;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => {
                    println!();
                    break;
                }
                Err(err) => {
                    return Err(eyre::eyre!("Readline error: {}", err));
                }
            }
        }

        println!("Goodbye!");
        Ok(())
    }

    async fn print_welcome(&self) {
        println!();
        println!("{}", "Socratis - your learning assistant".bright_cyan().bold());
        println!("Mode: {}", self.orchestrator.generator_name());
        println!("Type {} for help, {} to quit", "/help".yellow(), "/quit".yellow());
        if self.mode == Mode::Remote && !self.orchestrator.has_credential().await {
            println!(
                "{} No Gemini API key configured. Use {} to set one.",
                "!".yellow(),
                "/key <value>".yellow()
            );
        }
        println!();
    }

    async fn handle_slash_command(&mut self, input: &str) -> SlashResult {
        let (cmd, rest) = input.split_once(char::is_whitespace).unwrap_or((input, ""));
        debug!(%cmd, "handle_slash_command: called");

        match cmd {
            "/help" | "/h" => {
                self.print_help();
                SlashResult::Continue
            }
            "/quit" | "/q" | "/exit" => SlashResult::Quit,
            "/reset" | "/clear" | "/c" => {
                if self.orchestrator.reset() {
                    println!("{}", "Session reset.".dimmed());
                } else {
                    println!("{}", "Still working on the previous message.".yellow());
                }
                SlashResult::Continue
            }
            "/state" => {
                let state = self.orchestrator.state().await;
                match serde_json::to_string_pretty(&state) {
                    Ok(json) => println!("{}", json.dimmed()),
                    Err(e) => println!("{} {}", "Error:".red(), e),
                }
                SlashResult::Continue
            }
            "/history" => {
                self.print_history().await;
                SlashResult::Continue
            }
            "/trace" => {
                self.show_trace = !self.show_trace;
                let label = if self.show_trace { "on" } else { "off" };
                println!("{}", format!("Stage trace {}.", label).dimmed());
                SlashResult::Continue
            }
            "/key" => {
                self.save_key(rest).await;
                SlashResult::Continue
            }
            _ => {
                println!("{} Unknown command: {}", "?".yellow(), cmd);
                println!("Type {} for available commands", "/help".yellow());
                SlashResult::Continue
            }
        }
    }

    fn print_help(&self) {
        println!();
        println!("{}", "Available Commands:".bright_cyan());
        println!("  {:14} Show this help", "/help".yellow());
        println!("  {:14} Exit the REPL", "/quit".yellow());
        println!("  {:14} Start a new session", "/reset".yellow());
        println!("  {:14} Show the collected learning goal", "/state".yellow());
        println!("  {:14} Show conversation history", "/history".yellow());
        println!("  {:14} Toggle per-stage trace output", "/trace".yellow());
        println!("  {:14} Save a Gemini API key", "/key <value>".yellow());
        println!();
    }

    async fn print_history(&self) {
        let conversation = self.orchestrator.conversation().await;
        if conversation.is_empty() {
            println!("{}", "No conversation history.".dimmed());
            return;
        }

        println!();
        println!("{}", "Conversation History:".bright_cyan());
        for (i, turn) in conversation.turns().iter().enumerate() {
            let role = match turn.role {
                Speaker::User => "User".bright_green(),
                Speaker::Assistant => "Assistant".bright_blue(),
            };
            let preview: String = turn.text.chars().take(50).collect();
            let preview = if turn.text.chars().count() > 50 {
                format!("{}...", preview)
            } else {
                preview
            };
            println!("  {}. {}: {}", i + 1, role, preview.replace('\n', " "));
        }
        println!();
    }

    async fn save_key(&self, raw: &str) {
        match self.orchestrator.submit_credential(raw).await {
            Ok(()) => println!("{} Gemini API key saved! You can now chat with me.", "✓".green()),
            Err(e) => println!("{} {}", "Error:".red(), e),
        }
    }

    fn print_trace(&self, trace: &TurnTrace) {
        let steps = [
            ("1 Understanding", trace.understanding.as_ref().map(serde_json::to_value)),
            ("2 State", trace.state.as_ref().map(serde_json::to_value)),
            ("3 Planner", trace.plan.as_ref().map(serde_json::to_value)),
            ("4 Generator", trace.generation.as_ref().map(serde_json::to_value)),
        ];
        for (label, value) in steps {
            let Some(Ok(value)) = value else { continue };
            println!("{}", format!("[{}]", label).bright_black());
            let json = serde_json::to_string_pretty(&value).unwrap_or_default();
            println!("{}", json.bright_black());
        }
    }

    /// Run a turn and print whatever it produced
    async fn process_user_input(&mut self, rl: &mut DefaultEditor, input: &str) {
        let report = self.orchestrator.handle_turn(input).await;

        if self.show_trace {
            self.print_trace(&report.trace);
        }

        match &report.outcome {
            TurnOutcome::NeedsCredential => {
                println!("{}", "A Gemini API key is required for this mode.".yellow());
                match rl.readline("API key (empty to cancel): ") {
                    Ok(line) if !line.trim().is_empty() => self.save_key(&line).await,
                    _ => println!("{}", "Cancelled.".dimmed()),
                }
            }
            TurnOutcome::Busy => {
                println!("{}", "Still working on the previous message.".yellow());
            }
            outcome => {
                if let Some(text) = outcome.display_text() {
                    let rendered = render_markup(&text);
                    if outcome.is_error() {
                        println!("{}", rendered.red());
                    } else {
                        println!("{}", rendered);
                    }
                }
            }
        }
        println!();
    }
}

/// Result of handling a slash command
enum SlashResult {
    Continue,
    Quit,
}
