//! Collaborators the pipeline depends on.

use async_trait::async_trait;
use calmcast_core::error::CoreError;
use calmcast_core::types::TaskId;
use calmcast_db::models::meditation::{CreateMeditation, Meditation, UpdateMeditation};
use calmcast_openai::ScriptRequest;
use calmcast_storage::StorageError;

/// Opaque failure from a language or speech provider.
pub type ProviderError = Box<dyn std::error::Error + Send + Sync>;

/// Turns meditation parameters into a finished script.
#[async_trait]
pub trait ScriptWriter: Send + Sync {
    async fn write_script(&self, req: &ScriptRequest<'_>) -> Result<String, ProviderError>;
}

/// Turns a script into encoded audio spoken by a provider voice.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Vec<u8>, ProviderError>;
}

/// Errors from the task record store or the object store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Persistence for task records and their audio.
///
/// Each operation touches a single record; no cross-record transactions.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Insert a new task. Fails with [`CoreError::Validation`] if `user_id` is empty.
    async fn create(&self, input: &CreateMeditation) -> Result<Meditation, StoreError>;

    /// Apply the set fields of `input`. Fails with [`CoreError::NotFound`] for unknown ids.
    async fn update(&self, id: TaskId, input: &UpdateMeditation) -> Result<Meditation, StoreError>;

    /// Record the message of the error that stopped processing.
    async fn record_failure(&self, id: TaskId, message: &str) -> Result<Meditation, StoreError>;

    /// Fetch a task. Fails with [`CoreError::NotFound`] for unknown ids.
    async fn get(&self, id: TaskId) -> Result<Meditation, StoreError>;

    /// Store a task's audio and return its public URL.
    async fn upload_audio(&self, id: TaskId, audio: Vec<u8>) -> Result<String, StoreError>;

    /// Check that the backing store is reachable.
    async fn health_check(&self) -> Result<(), StoreError>;
}

/// Reject a create request without an owner.
pub(crate) fn ensure_user_id(input: &CreateMeditation) -> Result<(), StoreError> {
    if input.user_id.is_empty() {
        return Err(CoreError::Validation("user_id is required".into()).into());
    }
    Ok(())
}

pub(crate) fn not_found(id: TaskId) -> StoreError {
    CoreError::NotFound {
        entity: "Meditation",
        id,
    }
    .into()
}
