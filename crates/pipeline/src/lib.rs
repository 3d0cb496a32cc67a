//! Meditation task orchestration.
//!
//! [`MeditationPipeline`] drives one task from a fresh record through script
//! generation, audio synthesis and upload. It only talks to its collaborators
//! through the traits in [`backend`], so providers and storage can be swapped
//! (the API binary wires in the real clients via [`adapters`], tests use
//! [`memory::InMemoryTaskStore`] and scripted fakes).

pub mod adapters;
pub mod backend;
pub mod memory;
pub mod orchestrator;

pub use backend::{ProviderError, ScriptWriter, SpeechSynthesizer, StoreError, TaskStore};
pub use orchestrator::{MeditationPipeline, PipelineError};
