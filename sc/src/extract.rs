//! Input understanding
//!
//! Turns one line of free text into structured, optional fields. Nothing
//! extracted here is authoritative until the state tracker merges it.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

static TOPIC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:learn|study|about|master)\s+([\w\s.#+-]+?)(?:\s+in|\s+for|,|$)").expect("valid topic regex")
});

static DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)([0-9]+)\s*(days?|weeks?|months?|hours?)").expect("valid duration regex"));

static LEVEL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(beginner|intermediate|advanced|expert)").expect("valid level regex"));

static LEARNING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(learn|study|master|understand)\b").expect("valid intent regex"));

static QUESTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(what|how|why|when|where|explain)\b").expect("valid intent regex"));

static HELP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\b(help|assist|guide)\b").expect("valid intent regex"));

/// Coarse classification of what the user is asking for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    LearningRequest,
    Question,
    HelpRequest,
    #[default]
    GeneralConversation,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LearningRequest => "learning_request",
            Self::Question => "question",
            Self::HelpRequest => "help_request",
            Self::GeneralConversation => "general_conversation",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unit of a study duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Hours,
    Days,
    Weeks,
    Months,
}

impl TimeUnit {
    /// Parse a matched unit word, singular or plural, any case
    pub fn parse(word: &str) -> Option<Self> {
        debug!(%word, "TimeUnit::parse: called");
        let lower = word.to_lowercase();
        match lower.trim_end_matches('s') {
            "hour" => Some(Self::Hours),
            "day" => Some(Self::Days),
            "week" => Some(Self::Weeks),
            "month" => Some(Self::Months),
            _ => {
                debug!(%word, "TimeUnit::parse: unknown unit");
                None
            }
        }
    }
}

/// A duration as the user wrote it
///
/// `amount` keeps the digits verbatim so arbitrarily long numbers survive;
/// `label` is the normalized `"<N> <unit-as-matched>"` text stored in state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyDuration {
    pub amount: String,
    pub unit: TimeUnit,
    pub label: String,
}

impl fmt::Display for StudyDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Structured fields pulled out of a single user turn
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedFields {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<StudyDuration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    pub intent: Intent,
}

impl ExtractedFields {
    /// True when no topic, duration or level was recognized
    pub fn is_empty(&self) -> bool {
        self.topic.is_none() && self.duration.is_none() && self.level.is_none()
    }
}

/// Text in, optional structured fields out
///
/// Implementations must never fail: unrecognized input yields empty fields.
pub trait Extractor: Send + Sync {
    fn extract(&self, input: &str) -> ExtractedFields;
}

/// Regex-backed extractor
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternExtractor;

impl PatternExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn topic(&self, input: &str) -> Option<String> {
        debug!(input_len = input.len(), "PatternExtractor::topic: called");
        TOPIC_RE
            .captures(input)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim().to_string())
            .filter(|topic| !topic.is_empty())
    }

    pub fn duration(&self, input: &str) -> Option<StudyDuration> {
        debug!(input_len = input.len(), "PatternExtractor::duration: called");
        let caps = DURATION_RE.captures(input)?;
        let amount = caps.get(1)?.as_str();
        let unit_text = caps.get(2)?.as_str();
        let unit = TimeUnit::parse(unit_text)?;
        Some(StudyDuration {
            amount: amount.to_string(),
            unit,
            label: format!("{} {}", amount, unit_text),
        })
    }

    pub fn level(&self, input: &str) -> Option<String> {
        debug!(input_len = input.len(), "PatternExtractor::level: called");
        LEVEL_RE.find(input).map(|m| m.as_str().to_lowercase())
    }

    /// Priority order: learning request, question, help request
    pub fn intent(&self, input: &str) -> Intent {
        debug!(input_len = input.len(), "PatternExtractor::intent: called");
        let lower = input.to_lowercase();
        if LEARNING_RE.is_match(&lower) {
            Intent::LearningRequest
        } else if QUESTION_RE.is_match(&lower) {
            Intent::Question
        } else if HELP_RE.is_match(&lower) {
            Intent::HelpRequest
        } else {
            Intent::GeneralConversation
        }
    }
}

impl Extractor for PatternExtractor {
    fn extract(&self, input: &str) -> ExtractedFields {
        debug!(input_len = input.len(), "PatternExtractor::extract: called");
        let fields = ExtractedFields {
            topic: self.topic(input),
            duration: self.duration(input),
            level: self.level(input),
            intent: self.intent(input),
        };
        debug!(?fields, "PatternExtractor::extract: done");
        fields
    }
}
