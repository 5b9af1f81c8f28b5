//! Socratis - conversational learning-plan assistant
//!
//! CLI entry point.

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tracing::{debug, info};

use socratis::cli::{Cli, Command};
use socratis::config::Config;
use socratis::credential::{Credential, CredentialStore};
use socratis::repl::{self, ChatOptions};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("socratis")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    // Priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level).map(str::to_uppercase).as_deref() {
        Some("TRACE") => tracing::Level::TRACE,
        Some("DEBUG") => tracing::Level::DEBUG,
        Some("INFO") | None => tracing::Level::INFO,
        Some("WARN") | Some("WARNING") => tracing::Level::WARN,
        Some("ERROR") => tracing::Level::ERROR,
        Some(other) => {
            eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", other);
            tracing::Level::INFO
        }
    };

    let log_file = fs::File::create(log_dir.join("socratis.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!(mode = ?config.mode, "Socratis loaded config");

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Some(Command::Chat { mode, trace, delay_ms }) => {
            repl::run_interactive(&config, ChatOptions { mode, trace, delay_ms }).await
        }
        Some(Command::Key { value }) => cmd_key(&config, &value),
        Some(Command::Curricula) => cmd_curricula(&config),
        None => repl::run_interactive(&config, ChatOptions::default()).await,
    }
}

/// Save the API key to the credential file
fn cmd_key(config: &Config, value: &str) -> Result<()> {
    debug!("cmd_key: called");
    let credential = Credential::new(value)?;
    let store = CredentialStore::new(&config.credential.path);
    store.save(&credential)?;
    println!("{} Saved API key to {}", "✓".green(), store.path().display().to_string().cyan());
    Ok(())
}

/// List curriculum topics
fn cmd_curricula(config: &Config) -> Result<()> {
    debug!("cmd_curricula: called");
    let curriculum = &config.curriculum;
    if curriculum.tracks.is_empty() {
        println!("No curricula configured");
    } else {
        for topic in curriculum.topics() {
            let days = curriculum.lookup(topic).len();
            println!("{} ({} days)", topic.yellow(), days);
        }
    }
    println!("{} {} phases", "fallback:".dimmed(), curriculum.fallback.len());
    Ok(())
}
