//! Meditation task row and the DTOs used to write it.

use calmcast_core::meditation::MeditationParams;
use calmcast_core::status::{infer_status, StatusFields, TaskStatus};
use calmcast_core::types::{TaskId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `meditations` table.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize)]
pub struct Meditation {
    pub id: TaskId,
    pub user_id: String,
    pub duration: i32,
    pub feeling: String,
    pub voice: String,
    pub style: String,
    pub prompt: String,
    pub sounds: String,
    pub complete_prompt: String,
    pub ai_generated_text: Option<String>,
    pub script: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub audio_file_url: Option<String>,
    pub error: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Meditation {
    /// Current status, recomputed from the populated result fields.
    pub fn status(&self) -> TaskStatus {
        infer_status(StatusFields {
            ai_generated_text: self.ai_generated_text.as_deref(),
            audio_file_url: self.audio_file_url.as_deref(),
            error: self.error.as_deref(),
        })
    }
}

/// Structural fields written when a task is created.
///
/// Result fields and `error` are absent by construction; they only change
/// through [`UpdateMeditation`] and the failure path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateMeditation {
    pub user_id: String,
    pub duration: i32,
    pub feeling: String,
    pub voice: String,
    pub style: String,
    pub prompt: String,
    pub sounds: String,
    pub complete_prompt: String,
}

impl From<MeditationParams> for CreateMeditation {
    fn from(params: MeditationParams) -> Self {
        let complete_prompt = params.complete_prompt();
        Self {
            user_id: params.user_id,
            duration: params.duration,
            feeling: params.feeling,
            voice: params.voice,
            style: params.style,
            prompt: params.prompt,
            sounds: params.sounds,
            complete_prompt,
        }
    }
}

/// Result fields set by the pipeline. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateMeditation {
    pub ai_generated_text: Option<String>,
    pub script: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub audio_file_url: Option<String>,
}
