//! In-memory [`TaskStore`] for tests and local experiments.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use calmcast_core::meditation::audio_file_name;
use calmcast_core::types::TaskId;
use calmcast_db::models::meditation::{CreateMeditation, Meditation, UpdateMeditation};
use tokio::sync::RwLock;

use crate::backend::{ensure_user_id, not_found, StoreError, TaskStore};

/// Base of the URLs handed out for uploaded audio.
pub const PUBLIC_URL_BASE: &str = "memory://meditation-audio";

/// Thread-safe in-memory task and object store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    state: Arc<RwLock<State>>,
}

#[derive(Debug, Default)]
struct State {
    tasks: HashMap<TaskId, Meditation>,
    objects: HashMap<String, Vec<u8>>,
}

impl InMemoryTaskStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes uploaded under `name`, if any.
    pub async fn object(&self, name: &str) -> Option<Vec<u8>> {
        self.state.read().await.objects.get(name).cloned()
    }

    /// Number of stored tasks.
    pub async fn len(&self) -> usize {
        self.state.read().await.tasks.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Copy `Some` fields onto `task`, leaving already-set values in place
/// when the update omits them.
fn apply(task: &mut Meditation, input: &UpdateMeditation) {
    fn merge(slot: &mut Option<String>, value: &Option<String>) {
        if let Some(value) = value {
            *slot = Some(value.clone());
        }
    }

    merge(&mut task.ai_generated_text, &input.ai_generated_text);
    merge(&mut task.script, &input.script);
    merge(&mut task.title, &input.title);
    merge(&mut task.description, &input.description);
    merge(&mut task.audio_file_url, &input.audio_file_url);
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn create(&self, input: &CreateMeditation) -> Result<Meditation, StoreError> {
        ensure_user_id(input)?;

        let now = chrono::Utc::now();
        let task = Meditation {
            id: uuid::Uuid::new_v4(),
            user_id: input.user_id.clone(),
            duration: input.duration,
            feeling: input.feeling.clone(),
            voice: input.voice.clone(),
            style: input.style.clone(),
            prompt: input.prompt.clone(),
            sounds: input.sounds.clone(),
            complete_prompt: input.complete_prompt.clone(),
            ai_generated_text: None,
            script: None,
            title: None,
            description: None,
            audio_file_url: None,
            error: None,
            created_at: now,
            updated_at: now,
        };

        self.state.write().await.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn update(&self, id: TaskId, input: &UpdateMeditation) -> Result<Meditation, StoreError> {
        let mut state = self.state.write().await;
        let task = state.tasks.get_mut(&id).ok_or_else(|| not_found(id))?;
        apply(task, input);
        task.updated_at = chrono::Utc::now();
        Ok(task.clone())
    }

    async fn record_failure(&self, id: TaskId, message: &str) -> Result<Meditation, StoreError> {
        let mut state = self.state.write().await;
        let task = state.tasks.get_mut(&id).ok_or_else(|| not_found(id))?;
        task.error = Some(message.to_string());
        task.updated_at = chrono::Utc::now();
        Ok(task.clone())
    }

    async fn get(&self, id: TaskId) -> Result<Meditation, StoreError> {
        self.state
            .read()
            .await
            .tasks
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    async fn upload_audio(&self, id: TaskId, audio: Vec<u8>) -> Result<String, StoreError> {
        let name = audio_file_name(id);
        let url = format!("{PUBLIC_URL_BASE}/{name}");
        self.state.write().await.objects.insert(name, audio);
        Ok(url)
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
