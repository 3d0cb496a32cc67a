//! Trait implementations over the concrete provider clients and Postgres.

use async_trait::async_trait;
use calmcast_core::meditation::{audio_file_name, AUDIO_CACHE_SECS, AUDIO_CONTENT_TYPE};
use calmcast_core::types::TaskId;
use calmcast_db::models::meditation::{CreateMeditation, Meditation, UpdateMeditation};
use calmcast_db::repositories::MeditationRepo;
use calmcast_db::DbPool;
use calmcast_elevenlabs::ElevenLabsClient;
use calmcast_openai::{OpenAiClient, ScriptRequest};
use calmcast_storage::StorageClient;

use crate::backend::{
    ensure_user_id, not_found, ProviderError, ScriptWriter, SpeechSynthesizer, StoreError,
    TaskStore,
};

#[async_trait]
impl ScriptWriter for OpenAiClient {
    async fn write_script(&self, req: &ScriptRequest<'_>) -> Result<String, ProviderError> {
        Ok(self.generate_script(req).await?)
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsClient {
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Vec<u8>, ProviderError> {
        Ok(ElevenLabsClient::synthesize(self, text, voice_id).await?)
    }
}

/// Task records in Postgres, audio in object storage.
#[derive(Clone)]
pub struct PgTaskStore {
    pool: DbPool,
    storage: StorageClient,
}

impl PgTaskStore {
    pub fn new(pool: DbPool, storage: StorageClient) -> Self {
        Self { pool, storage }
    }
}

#[async_trait]
impl TaskStore for PgTaskStore {
    async fn create(&self, input: &CreateMeditation) -> Result<Meditation, StoreError> {
        ensure_user_id(input)?;
        Ok(MeditationRepo::create(&self.pool, input).await?)
    }

    async fn update(&self, id: TaskId, input: &UpdateMeditation) -> Result<Meditation, StoreError> {
        MeditationRepo::update(&self.pool, id, input)
            .await?
            .ok_or_else(|| not_found(id))
    }

    async fn record_failure(&self, id: TaskId, message: &str) -> Result<Meditation, StoreError> {
        MeditationRepo::record_failure(&self.pool, id, message)
            .await?
            .ok_or_else(|| not_found(id))
    }

    async fn get(&self, id: TaskId) -> Result<Meditation, StoreError> {
        MeditationRepo::find_by_id(&self.pool, id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    async fn upload_audio(&self, id: TaskId, audio: Vec<u8>) -> Result<String, StoreError> {
        let name = audio_file_name(id);
        self.storage
            .upload(&name, audio, AUDIO_CONTENT_TYPE, AUDIO_CACHE_SECS)
            .await?;
        tracing::info!(
            task_id = %id,
            bucket = self.storage.bucket(),
            object = %name,
            "Audio uploaded",
        );
        Ok(self.storage.public_url(&name))
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(calmcast_db::health_check(&self.pool).await?)
    }
}
