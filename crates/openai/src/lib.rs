//! Meditation script generation through the OpenAI chat-completions API.

pub mod client;
pub mod prompt;

pub use client::{OpenAiClient, OpenAiError, DEFAULT_MODEL};
pub use prompt::ScriptRequest;
