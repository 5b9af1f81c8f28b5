//! Session state and conversation transcript
//!
//! `SessionState` holds the learning goal collected so far. Its fields are
//! sticky: a merge only ever replaces a value with a newer non-empty one.
//! `Conversation` is the ordered transcript used by the remote generator.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::extract::{ExtractedFields, Extractor};

/// Level assumed until the user names one
pub const DEFAULT_LEVEL: &str = "beginner";

/// Number of trailing turns scanned for the context summary
pub const CONTEXT_WINDOW: usize = 6;

/// The learning goal gathered so far
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    pub topic: Option<String>,
    pub duration: Option<String>,
    pub level: String,
    pub is_complete: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            topic: None,
            duration: None,
            level: DEFAULT_LEVEL.to_string(),
            is_complete: false,
        }
    }
}

impl SessionState {
    /// Required fields that are still unset, in asking order
    pub fn missing(&self) -> Vec<MissingField> {
        let mut missing = Vec::new();
        if self.topic.is_none() {
            missing.push(MissingField::Topic);
        }
        if self.duration.is_none() {
            missing.push(MissingField::Duration);
        }
        missing
    }
}

/// A required field the user has not provided yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MissingField {
    Topic,
    Duration,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Topic => write!(f, "topic"),
            Self::Duration => write!(f, "duration"),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

/// Merge freshly extracted fields into the session state
///
/// Returns the ordered list of required fields that remain unfilled.
/// Level is never reported missing because it defaults to beginner.
pub fn track(extracted: &ExtractedFields, state: &mut SessionState) -> Vec<MissingField> {
    debug!(?extracted, "track: called");

    if let Some(topic) = non_empty(extracted.topic.as_deref()) {
        debug!(%topic, "track: topic updated");
        state.topic = Some(topic);
    }
    if let Some(duration) = non_empty(extracted.duration.as_ref().map(|d| d.label.as_str())) {
        debug!(%duration, "track: duration updated");
        state.duration = Some(duration);
    }
    if let Some(level) = non_empty(extracted.level.as_deref()) {
        debug!(%level, "track: level updated");
        state.level = level;
    }

    let missing = state.missing();
    state.is_complete = missing.is_empty();
    debug!(?missing, is_complete = state.is_complete, "track: done");
    missing
}

/// Who said a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    User,
    Assistant,
}

impl Speaker {
    /// Label used when rendering a transcript into a prompt
    pub fn label(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Assistant => "Assistant",
        }
    }
}

/// One line of the transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Speaker,
    pub text: String,
    pub at: DateTime<Utc>,
}

impl ConversationTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Speaker::User,
            text: text.into(),
            at: Utc::now(),
        }
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Speaker::Assistant,
            text: text.into(),
            at: Utc::now(),
        }
    }

    /// `User: ...` / `Assistant: ...`
    pub fn render(&self) -> String {
        format!("{}: {}", self.role.label(), self.text)
    }
}

/// Topics recently mentioned by the user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextSummary {
    pub topics: Vec<String>,
    pub message_count: usize,
}

/// Unbounded, ordered transcript
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conversation {
    turns: Vec<ConversationTurn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, turn: ConversationTurn) {
        debug!(role = ?turn.role, text_len = turn.text.len(), "Conversation::push: called");
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// The last `n` turns, oldest first
    pub fn recent(&self, n: usize) -> &[ConversationTurn] {
        let start = self.turns.len().saturating_sub(n);
        &self.turns[start..]
    }

    /// Distinct topics the user mentioned in the last `window` turns
    pub fn summarize(&self, extractor: &dyn Extractor, window: usize) -> ContextSummary {
        debug!(window, turn_count = self.turns.len(), "Conversation::summarize: called");
        let mut topics: Vec<String> = Vec::new();
        for turn in self.recent(window).iter().filter(|t| t.role == Speaker::User) {
            if let Some(topic) = extractor.extract(&turn.text).topic
                && !topics.contains(&topic)
            {
                topics.push(topic);
            }
        }
        ContextSummary {
            topics,
            message_count: self.turns.len(),
        }
    }
}

/// Everything that lives for one session
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub state: SessionState,
    pub conversation: Conversation,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        let id = Uuid::now_v7();
        debug!(%id, "Session::new: called");
        Self {
            id,
            state: SessionState::default(),
            conversation: Conversation::new(),
        }
    }

    /// Start over with a fresh id, state and transcript
    pub fn reset(&mut self) {
        debug!(old_id = %self.id, "Session::reset: called");
        *self = Self::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{PatternExtractor, StudyDuration, TimeUnit};
    use proptest::prelude::*;

    fn fields(topic: Option<&str>, duration: Option<&str>, level: Option<&str>) -> ExtractedFields {
        ExtractedFields {
            topic: topic.map(String::from),
            duration: duration.map(|label| StudyDuration {
                amount: label.split_whitespace().next().unwrap_or_default().to_string(),
                unit: TimeUnit::Days,
                label: label.to_string(),
            }),
            level: level.map(String::from),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_state() {
        let state = SessionState::default();
        assert_eq!(state.level, "beginner");
        assert!(!state.is_complete);
        assert_eq!(state.missing(), vec![MissingField::Topic, MissingField::Duration]);
    }

    #[test]
    fn test_track_fills_and_completes() {
        let mut state = SessionState::default();

        let missing = track(&fields(Some("Python"), None, None), &mut state);
        assert_eq!(missing, vec![MissingField::Duration]);
        assert!(!state.is_complete);

        let missing = track(&fields(None, Some("5 days"), Some("advanced")), &mut state);
        assert!(missing.is_empty());
        assert!(state.is_complete);
        assert_eq!(state.topic.as_deref(), Some("Python"));
        assert_eq!(state.duration.as_deref(), Some("5 days"));
        assert_eq!(state.level, "advanced");
    }

    #[test]
    fn test_track_overwrites_with_newer_value() {
        let mut state = SessionState::default();
        track(&fields(Some("Python"), Some("5 days"), None), &mut state);
        track(&fields(Some("React"), None, None), &mut state);
        assert_eq!(state.topic.as_deref(), Some("React"));
        assert_eq!(state.duration.as_deref(), Some("5 days"));
    }

    #[test]
    fn test_track_ignores_blank_values() {
        let mut state = SessionState::default();
        track(&fields(Some("Python"), None, None), &mut state);
        track(&fields(Some("   "), None, Some("")), &mut state);
        assert_eq!(state.topic.as_deref(), Some("Python"));
        assert_eq!(state.level, "beginner");
    }

    #[test]
    fn test_recent_and_render() {
        let mut conversation = Conversation::new();
        for i in 0..12 {
            conversation.push(ConversationTurn::user(format!("msg {}", i)));
        }
        let recent = conversation.recent(10);
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].text, "msg 2");
        assert_eq!(recent[9].render(), "User: msg 11");
        assert_eq!(ConversationTurn::assistant("hi").render(), "Assistant: hi");
    }

    #[test]
    fn test_summarize_collects_distinct_user_topics() {
        let extractor = PatternExtractor::new();
        let mut conversation = Conversation::new();
        conversation.push(ConversationTurn::user("I want to learn Haskell"));
        conversation.push(ConversationTurn::assistant("Sure, let's learn Ocaml"));
        conversation.push(ConversationTurn::user("teach me about Rust"));
        conversation.push(ConversationTurn::assistant("ok"));
        conversation.push(ConversationTurn::user("learn Rust for 3 days"));
        conversation.push(ConversationTurn::assistant("ok"));
        conversation.push(ConversationTurn::user("study Go"));

        // Haskell falls outside the last six turns; assistant topics are ignored
        let summary = conversation.summarize(&extractor, CONTEXT_WINDOW);
        assert_eq!(summary.topics, vec!["Rust".to_string(), "Go".to_string()]);
        assert_eq!(summary.message_count, 7);
    }

    #[test]
    fn test_session_reset() {
        let mut session = Session::new();
        let old_id = session.id;
        session.state.topic = Some("Python".to_string());
        session.conversation.push(ConversationTurn::user("hi"));

        session.reset();
        assert_ne!(session.id, old_id);
        assert_eq!(session.state, SessionState::default());
        assert!(session.conversation.is_empty());
    }

    fn opt_value() -> impl Strategy<Value = Option<String>> {
        prop_oneof![Just(None), Just(Some(String::new())), "[A-Za-z]{1,8}".prop_map(Some)]
    }

    proptest! {
        #[test]
        fn prop_filled_fields_never_regress(
            steps in proptest::collection::vec((opt_value(), opt_value(), opt_value()), 1..12)
        ) {
            let mut state = SessionState::default();
            for (topic, duration, level) in steps {
                let before = state.clone();
                track(&fields(topic.as_deref(), duration.as_deref(), level.as_deref()), &mut state);
                if before.topic.is_some() {
                    prop_assert!(state.topic.is_some());
                }
                if before.duration.is_some() {
                    prop_assert!(state.duration.is_some());
                }
                prop_assert!(!state.level.is_empty());
                prop_assert_eq!(state.is_complete, state.topic.is_some() && state.duration.is_some());
            }
        }
    }
}
