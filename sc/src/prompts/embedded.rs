//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// Question asked when no topic is known
pub const ASK_TOPIC: &str = include_str!("../../prompts/ask-topic.pmt");

/// Question asked when the topic is known but the duration is not
pub const ASK_DURATION: &str = include_str!("../../prompts/ask-duration.pmt");

/// Frame around the day-by-day plan
pub const STUDY_PLAN: &str = include_str!("../../prompts/study-plan.pmt");

/// System instruction for the remote model
pub const SYSTEM: &str = include_str!("../../prompts/system.pmt");

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "ask-topic" => Some(ASK_TOPIC),
        "ask-duration" => Some(ASK_DURATION),
        "study-plan" => Some(STUDY_PLAN),
        "system" => Some(SYSTEM),
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}
