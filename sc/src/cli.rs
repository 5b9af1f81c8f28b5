//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::Mode;

/// Socratis - conversational learning-plan assistant
#[derive(Parser, Debug)]
#[command(name = "sc", author, version, about = "Conversational learning-plan assistant", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute (defaults to chat)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Start an interactive chat session
    Chat {
        /// Response generator (overrides config)
        #[arg(short, long, value_enum)]
        mode: Option<Mode>,

        /// Print each pipeline stage's output after every turn
        #[arg(short, long)]
        trace: bool,

        /// Pause between pipeline stages in milliseconds
        #[arg(short, long)]
        delay_ms: Option<u64>,
    },

    /// Save the Gemini API key used by remote mode
    Key {
        /// The API key
        #[arg(required = true)]
        value: String,
    },

    /// List the topics that have a dedicated curriculum
    Curricula,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand() {
        let cli = Cli::try_parse_from(["sc"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_chat_flags() {
        let cli = Cli::try_parse_from(["sc", "chat", "--mode", "remote", "--trace", "-d", "300"]).unwrap();
        match cli.command {
            Some(Command::Chat { mode, trace, delay_ms }) => {
                assert_eq!(mode, Some(Mode::Remote));
                assert!(trace);
                assert_eq!(delay_ms, Some(300));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["sc", "curricula", "--log-level", "debug", "-c", "x.yml"]).unwrap();
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert_eq!(cli.config, Some(PathBuf::from("x.yml")));
    }

    #[test]
    fn test_key_requires_value() {
        assert!(Cli::try_parse_from(["sc", "key"]).is_err());
    }
}
