//! Prompt templates
//!
//! Reply templates and the remote system instruction, embedded at compile
//! time and overridable from a prompt directory.

pub mod embedded;
mod loader;

pub use loader::{PromptLoader, ReplyContext};
