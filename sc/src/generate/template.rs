//! Template generator
//!
//! Answers from fixed prompts and the curriculum table; never leaves the
//! process.

use async_trait::async_trait;
use tracing::debug;

use super::{GenerateError, GenerationContext, ResponseGenerator};
use crate::curriculum::Curriculum;
use crate::planner::NextAction;
use crate::prompts::{PromptLoader, ReplyContext};

pub struct TemplateGenerator {
    prompts: PromptLoader,
    curriculum: Curriculum,
}

impl TemplateGenerator {
    pub fn new(prompts: PromptLoader, curriculum: Curriculum) -> Self {
        debug!(track_count = curriculum.tracks.len(), "TemplateGenerator::new: called");
        Self { prompts, curriculum }
    }

    fn render(&self, template: &str, context: &ReplyContext) -> Result<String, GenerateError> {
        self.prompts
            .render(template, context)
            .map_err(|e| GenerateError::Internal(e.to_string()))
    }

    fn study_plan(&self, topic: &str, duration: &str, level: &str) -> Result<String, GenerateError> {
        debug!(%topic, %duration, %level, "TemplateGenerator::study_plan: called");
        let days: String = self
            .curriculum
            .days(topic, duration)
            .iter()
            .map(|day| format!("- {}\n", day))
            .collect();

        let context = ReplyContext {
            topic: topic.to_string(),
            duration: duration.to_string(),
            level: level.to_string(),
            days,
        };
        self.render("study-plan", &context)
    }
}

#[async_trait]
impl ResponseGenerator for TemplateGenerator {
    fn name(&self) -> &'static str {
        "template"
    }

    async fn generate(&self, ctx: GenerationContext<'_>) -> Result<String, GenerateError> {
        debug!(next = %ctx.plan.next, "TemplateGenerator::generate: called");
        let state = ctx.state;
        match ctx.plan.next {
            NextAction::AskForTopic => self.render("ask-topic", &ReplyContext::default()),
            NextAction::AskForDuration => {
                let context = ReplyContext {
                    topic: state.topic.clone().unwrap_or_default(),
                    level: state.level.clone(),
                    ..Default::default()
                };
                self.render("ask-duration", &context)
            }
            NextAction::GeneratePlan => match (&state.topic, &state.duration) {
                (Some(topic), Some(duration)) => self.study_plan(topic, duration, &state.level),
                _ => Err(GenerateError::Internal(
                    "study plan requested before topic and duration were known".to_string(),
                )),
            },
        }
    }
}
