//! Inline markup for terminal output
//!
//! Replies use `**bold**`, `*italic*` and newlines. Bold and italic become
//! terminal styles; everything else passes through.

use std::sync::LazyLock;

use colored::Colorize;
use regex::{Captures, Regex};

static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("valid bold regex"));

static ITALIC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*(.*?)\*").expect("valid italic regex"));

/// Apply terminal styles to reply markup
pub fn render_markup(text: &str) -> String {
    let bold = BOLD_RE.replace_all(text, |caps: &Captures| caps[1].bold().to_string());
    ITALIC_RE
        .replace_all(&bold, |caps: &Captures| caps[1].italic().to_string())
        .into_owned()
}
