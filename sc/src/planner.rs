//! Task planning
//!
//! A pure decision from (missing fields, intent) to the next action plus the
//! response strategy the remote generator reports alongside it.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::extract::Intent;
use crate::session::MissingField;

/// What the generator should do this turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NextAction {
    AskForTopic,
    AskForDuration,
    GeneratePlan,
}

impl fmt::Display for NextAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AskForTopic => write!(f, "ASK_FOR_TOPIC"),
            Self::AskForDuration => write!(f, "ASK_FOR_DURATION"),
            Self::GeneratePlan => write!(f, "GENERATE_PLAN"),
        }
    }
}

/// Kind of reply the remote model is expected to give
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyAction {
    AiResponse,
    CreateLearningPlan,
    AnswerQuestion,
}

/// Advisory metadata for the remote generator
///
/// The temperature here is informational; the generator samples with the
/// configured fixed temperature.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseStrategy {
    pub action: StrategyAction,
    pub requires_context: bool,
    pub temperature: f64,
}

impl ResponseStrategy {
    pub fn for_intent(intent: Intent) -> Self {
        debug!(%intent, "ResponseStrategy::for_intent: called");
        let (action, temperature) = match intent {
            Intent::LearningRequest => (StrategyAction::CreateLearningPlan, 0.8),
            Intent::Question => (StrategyAction::AnswerQuestion, 0.6),
            Intent::HelpRequest | Intent::GeneralConversation => (StrategyAction::AiResponse, 0.7),
        };
        Self {
            action,
            requires_context: true,
            temperature,
        }
    }
}

/// Planner output for one turn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub next: NextAction,
    pub strategy: ResponseStrategy,
}

/// Decide the next action
///
/// Topic outranks duration regardless of intent.
pub fn plan(missing: &[MissingField], intent: Intent) -> Plan {
    debug!(?missing, %intent, "plan: called");
    let next = if missing.contains(&MissingField::Topic) {
        NextAction::AskForTopic
    } else if missing.contains(&MissingField::Duration) {
        NextAction::AskForDuration
    } else {
        NextAction::GeneratePlan
    };
    debug!(%next, "plan: decided");
    Plan {
        next,
        strategy: ResponseStrategy::for_intent(intent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTENTS: [Intent; 4] = [
        Intent::LearningRequest,
        Intent::Question,
        Intent::HelpRequest,
        Intent::GeneralConversation,
    ];

    #[test]
    fn test_topic_has_priority_for_every_intent() {
        for intent in INTENTS {
            assert_eq!(
                plan(&[MissingField::Topic, MissingField::Duration], intent).next,
                NextAction::AskForTopic
            );
            assert_eq!(plan(&[MissingField::Topic], intent).next, NextAction::AskForTopic);
        }
    }

    #[test]
    fn test_duration_then_plan() {
        assert_eq!(
            plan(&[MissingField::Duration], Intent::Question).next,
            NextAction::AskForDuration
        );
        assert_eq!(plan(&[], Intent::GeneralConversation).next, NextAction::GeneratePlan);
    }

    #[test]
    fn test_strategy_temperatures() {
        assert_eq!(ResponseStrategy::for_intent(Intent::Question).temperature, 0.6);
        assert_eq!(ResponseStrategy::for_intent(Intent::LearningRequest).temperature, 0.8);
        assert_eq!(ResponseStrategy::for_intent(Intent::HelpRequest).temperature, 0.7);
        assert_eq!(
            ResponseStrategy::for_intent(Intent::GeneralConversation).action,
            StrategyAction::AiResponse
        );
        assert!(ResponseStrategy::for_intent(Intent::Question).requires_context);
    }

    #[test]
    fn test_plan_is_deterministic() {
        for intent in INTENTS {
            for missing in [vec![], vec![MissingField::Duration], vec![MissingField::Topic]] {
                assert_eq!(plan(&missing, intent), plan(&missing, intent));
            }
        }
    }

    #[test]
    fn test_next_action_display() {
        assert_eq!(NextAction::GeneratePlan.to_string(), "GENERATE_PLAN");
        assert_eq!(
            serde_json::to_string(&NextAction::AskForDuration).unwrap(),
            "\"ASK_FOR_DURATION\""
        );
    }
}
