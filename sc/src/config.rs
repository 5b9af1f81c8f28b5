//! Socratis configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::curriculum::Curriculum;

/// Which response generator answers the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Template replies from the curriculum table
    #[default]
    Local,
    /// Replies generated by the remote model
    Remote,
}

/// Main Socratis configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Response generator
    pub mode: Mode,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Delays between pipeline stages
    pub pacing: PacingConfig,

    /// Topic curricula for the template generator
    pub curriculum: Curriculum,

    /// Where the API credential is kept
    pub credential: CredentialConfig,

    /// Prompt template overrides
    pub prompts: PromptsConfig,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .socratis.yml
        let local_config = PathBuf::from(".socratis.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/socratis/socratis.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("socratis").join("socratis.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // No config file found, use defaults
        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Read only the log level, before logging is set up
    ///
    /// Errors are swallowed; the full load reports them once logging works.
    pub fn load_log_level(config_path: Option<&PathBuf>) -> Option<String> {
        let path = match config_path {
            Some(p) => p.clone(),
            None => {
                let local = PathBuf::from(".socratis.yml");
                if local.exists() {
                    local
                } else {
                    dirs::config_dir()?.join("socratis").join("socratis.yml")
                }
            }
        };
        let content = fs::read_to_string(path).ok()?;
        let config: Self = serde_yaml::from_str(&content).ok()?;
        config.log_level
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name (currently only "gemini" supported)
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable consulted when no credential file exists
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Sampling temperature sent with every request
    pub temperature: f64,

    /// Maximum tokens per response
    #[serde(rename = "max-output-tokens")]
    pub max_output_tokens: u32,

    /// Number of trailing turns included in the prompt
    #[serde(rename = "history-window")]
    pub history_window: usize,

    /// Number of trailing turns scanned for the context summary
    #[serde(rename = "context-window")]
    pub context_window: usize,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: "gemini-pro".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            temperature: 0.7,
            max_output_tokens: 1000,
            history_window: 10,
            context_window: crate::session::CONTEXT_WINDOW,
            timeout_ms: 300_000,
        }
    }
}

/// Artificial delays between stages
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Pause after each stage in milliseconds (0 disables)
    #[serde(rename = "stage-delay-ms")]
    pub stage_delay_ms: u64,
}

/// Credential storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialConfig {
    /// File holding the API key
    pub path: PathBuf,
}

impl Default for CredentialConfig {
    fn default() -> Self {
        let path = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("socratis")
            .join("credential");
        Self { path }
    }
}

/// Prompt template configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    /// Directory searched for `{name}.pmt` overrides
    pub dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.mode, Mode::Local);
        assert_eq!(config.llm.provider, "gemini");
        assert_eq!(config.pacing.stage_delay_ms, 0);
        assert!(config.curriculum.tracks.contains_key("Python"));
    }

    #[test]
    fn test_llm_config_defaults() {
        let config = LlmConfig::default();

        assert_eq!(config.model, "gemini-pro");
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.max_output_tokens, 1000);
        assert_eq!(config.history_window, 10);
        assert_eq!(config.context_window, 6);
    }

    #[test]
    fn test_parse_partial_yaml() {
        let yaml = r#"
mode: remote
log-level: debug
llm:
  model: gemini-1.5-flash
  max-output-tokens: 256
pacing:
  stage-delay-ms: 300
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.mode, Mode::Remote);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert_eq!(config.llm.model, "gemini-1.5-flash");
        assert_eq!(config.llm.max_output_tokens, 256);
        assert_eq!(config.llm.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.pacing.stage_delay_ms, 300);
    }

    #[test]
    fn test_load_explicit_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("socratis.yml");
        fs::write(&path, "mode: remote\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.mode, Mode::Remote);
        assert_eq!(Config::load_log_level(Some(&path)), None);
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nope.yml");
        assert!(Config::load(Some(&path)).is_err());
    }
}
