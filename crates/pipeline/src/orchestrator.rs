//! The meditation task state machine.
//!
//! ```text
//! pending ──script──▶ generating-audio ──audio + upload──▶ completed
//!    │                        │
//!    └──────────error─────────┴──────────────────────────▶ failed
//! ```
//!
//! Stages run strictly in order for a task and each runs at most once. A
//! failed task is never retried or resumed; callers submit a new task.

use std::sync::Arc;

use calmcast_core::meditation::{description, title};
use calmcast_core::voice::provider_voice_id;
use calmcast_db::models::meditation::{Meditation, UpdateMeditation};
use calmcast_openai::ScriptRequest;
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::backend::{ProviderError, ScriptWriter, SpeechSynthesizer, StoreError, TaskStore};

/// Why a task stopped before completing.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Script generation failed: {0}")]
    Script(#[source] ProviderError),

    #[error("Unknown voice '{0}'")]
    UnknownVoice(String),

    #[error("Audio synthesis failed: {0}")]
    Synthesis(#[source] ProviderError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Drives meditation tasks through script generation, synthesis and upload.
///
/// One instance is shared by every request; it holds no per-task state.
pub struct MeditationPipeline {
    writer: Arc<dyn ScriptWriter>,
    synthesizer: Arc<dyn SpeechSynthesizer>,
    store: Arc<dyn TaskStore>,
}

impl MeditationPipeline {
    pub fn new(
        writer: Arc<dyn ScriptWriter>,
        synthesizer: Arc<dyn SpeechSynthesizer>,
        store: Arc<dyn TaskStore>,
    ) -> Self {
        Self {
            writer,
            synthesizer,
            store,
        }
    }

    /// Launch processing of a freshly created task without waiting for it.
    ///
    /// Failures never reach the caller; they are written to the task's
    /// `error` field by [`process`](Self::process).
    pub fn spawn(self: &Arc<Self>, task: Meditation) -> JoinHandle<()> {
        let pipeline = Arc::clone(self);
        let span = tracing::info_span!("meditation_task", task_id = %task.id);
        tokio::spawn(async move { pipeline.process(task).await }.instrument(span))
    }

    /// Run the task and record any failure on it.
    ///
    /// If recording the failure itself fails, that error is logged and dropped.
    pub async fn process(&self, task: Meditation) {
        match self.run(&task).await {
            Ok(done) => {
                tracing::info!(
                    task_id = %done.id,
                    audio_file_url = done.audio_file_url.as_deref().unwrap_or_default(),
                    "Meditation task completed",
                );
            }
            Err(e) => {
                tracing::error!(task_id = %task.id, error = %e, "Meditation task failed");
                if let Err(store_err) = self.store.record_failure(task.id, &e.to_string()).await {
                    tracing::error!(
                        task_id = %task.id,
                        error = %store_err,
                        "Failed to record task failure",
                    );
                }
            }
        }
    }

    /// Take a pending task to completion. Returns the completed record.
    pub async fn run(&self, task: &Meditation) -> Result<Meditation, PipelineError> {
        let id = task.id;

        // --- pending -> generating-audio ---
        tracing::info!(task_id = %id, stage = "script", "Generating meditation script");
        let script = self
            .writer
            .write_script(&ScriptRequest {
                duration: task.duration,
                feeling: &task.feeling,
                style: &task.style,
                prompt: &task.prompt,
                sounds: &task.sounds,
            })
            .await
            .map_err(PipelineError::Script)?;

        self.store
            .update(
                id,
                &UpdateMeditation {
                    ai_generated_text: Some(script.clone()),
                    ..Default::default()
                },
            )
            .await?;

        // --- generating-audio -> completed ---
        let voice_id = provider_voice_id(&task.voice)
            .ok_or_else(|| PipelineError::UnknownVoice(task.voice.clone()))?;

        tracing::info!(task_id = %id, stage = "audio", voice = %task.voice, "Synthesizing audio");
        let audio = self
            .synthesizer
            .synthesize(&script, voice_id)
            .await
            .map_err(PipelineError::Synthesis)?;

        tracing::info!(task_id = %id, stage = "upload", bytes = audio.len(), "Uploading audio");
        let audio_file_url = self.store.upload_audio(id, audio).await?;

        let completed = self
            .store
            .update(
                id,
                &UpdateMeditation {
                    audio_file_url: Some(audio_file_url),
                    title: Some(title(task.duration, &task.feeling, &task.style)),
                    description: Some(description(&script)),
                    script: Some(script),
                    ..Default::default()
                },
            )
            .await?;

        Ok(completed)
    }
}
