//! Prompt Loader
//!
//! Loads prompt templates from an override directory or falls back to the
//! embedded defaults.

use std::path::PathBuf;

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::debug;

use super::embedded;

/// Values available to reply templates
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplyContext {
    pub topic: String,
    pub duration: String,
    pub level: String,
    /// Pre-rendered `- item` lines, each newline-terminated
    pub days: String,
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// Override directory holding `{name}.pmt` files
    dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a loader that prefers templates found in `dir`
    pub fn new(dir: Option<PathBuf>) -> Self {
        let dir = dir.filter(|d| {
            let exists = d.exists();
            debug!(dir = ?d, %exists, "PromptLoader::new: checking override directory");
            exists
        });
        Self {
            hbs: Self::engine(),
            dir,
        }
    }

    /// Create a loader that only uses embedded prompts
    pub fn embedded_only() -> Self {
        debug!("PromptLoader::embedded_only: called");
        Self {
            hbs: Self::engine(),
            dir: None,
        }
    }

    fn engine() -> Handlebars<'static> {
        let mut hbs = Handlebars::new();
        // Replies are plain text with light markup, not HTML
        hbs.register_escape_fn(handlebars::no_escape);
        hbs
    }

    /// Load a template by name
    ///
    /// Checks in order:
    /// 1. Override: `{dir}/{name}.pmt`
    /// 2. Embedded fallback
    fn load_template(&self, name: &str) -> Result<String> {
        debug!(%name, "PromptLoader::load_template: called");
        if let Some(ref dir) = self.dir {
            let path = dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!(?path, "PromptLoader::load_template: found override");
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read prompt {}: {}", path.display(), e));
            }
            debug!(?path, "PromptLoader::load_template: no override");
        }

        if let Some(content) = embedded::get_embedded(name) {
            debug!(%name, "PromptLoader::load_template: found in embedded");
            return Ok(content.to_string());
        }

        Err(eyre!("Prompt template not found: {}", name))
    }

    /// Render a reply template, trimming trailing whitespace
    pub fn render(&self, template_name: &str, context: &ReplyContext) -> Result<String> {
        debug!(%template_name, "PromptLoader::render: called");
        let template = self.load_template(template_name)?;
        let rendered = self
            .hbs
            .render_template(&template, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", template_name, e))?;
        Ok(rendered.trim_end().to_string())
    }

    /// The system instruction sent ahead of the transcript
    pub fn system_prompt(&self) -> Result<String> {
        debug!("PromptLoader::system_prompt: called");
        Ok(self.load_template("system")?.trim_end().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_render_ask_duration() {
        let loader = PromptLoader::embedded_only();
        let context = ReplyContext {
            topic: "Rust & C++".to_string(),
            ..Default::default()
        };
        let text = loader.render("ask-duration", &context).unwrap();
        assert_eq!(
            text,
            "I've noted you want to learn Rust & C++. How much time (e.g., 5 days, 2 weeks) do you want to dedicate to this?"
        );
    }

    #[test]
    fn test_render_study_plan_frame() {
        let loader = PromptLoader::embedded_only();
        let context = ReplyContext {
            topic: "Go".to_string(),
            duration: "2 days".to_string(),
            level: "expert".to_string(),
            days: "- one\n- two\n".to_string(),
        };
        let text = loader.render("study-plan", &context).unwrap();
        assert_eq!(
            text,
            "Perfect! Here is your 2 days expert plan for **Go**:\n\n- one\n- two\n\nReady to get started?"
        );
    }

    #[test]
    fn test_override_directory_wins() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("ask-topic.pmt"), "What shall we study?\n").unwrap();

        let loader = PromptLoader::new(Some(temp.path().to_path_buf()));
        assert_eq!(
            loader.render("ask-topic", &ReplyContext::default()).unwrap(),
            "What shall we study?"
        );
        // Templates without an override still come from the embedded set
        assert!(loader.system_prompt().unwrap().starts_with("You are Socratis"));
    }

    #[test]
    fn test_missing_override_directory_is_ignored() {
        let loader = PromptLoader::new(Some(PathBuf::from("/definitely/not/here")));
        assert!(loader.dir.is_none());
        assert!(loader.render("ask-topic", &ReplyContext::default()).is_ok());
    }

    #[test]
    fn test_unknown_template() {
        let loader = PromptLoader::embedded_only();
        assert!(loader.render("nonexistent-template", &ReplyContext::default()).is_err());
    }

    #[test]
    fn test_system_prompt_is_trimmed() {
        let prompt = PromptLoader::embedded_only().system_prompt().unwrap();
        assert!(prompt.ends_with("when appropriate."));
    }
}
