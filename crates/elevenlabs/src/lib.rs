//! Speech synthesis through the ElevenLabs text-to-speech API.

pub mod client;

pub use client::{ElevenLabsClient, ElevenLabsError, DEFAULT_MODEL};
