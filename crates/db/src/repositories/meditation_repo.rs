//! Repository for the `meditations` table.
//!
//! Updates are append-only: a result column, once set, is never cleared.

use calmcast_core::types::TaskId;
use sqlx::PgPool;

use crate::models::meditation::{CreateMeditation, Meditation, UpdateMeditation};

/// Column list for `meditations` queries.
const COLUMNS: &str = "\
    id, user_id, duration, feeling, voice, style, prompt, sounds, \
    complete_prompt, ai_generated_text, script, title, description, \
    audio_file_url, error, created_at, updated_at";

/// Provides persistence for meditation tasks.
pub struct MeditationRepo;

impl MeditationRepo {
    /// Insert a new task and return the stored row.
    pub async fn create(
        pool: &PgPool,
        input: &CreateMeditation,
    ) -> Result<Meditation, sqlx::Error> {
        let query = format!(
            "INSERT INTO meditations \
                (user_id, duration, feeling, voice, style, prompt, sounds, complete_prompt) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Meditation>(&query)
            .bind(&input.user_id)
            .bind(input.duration)
            .bind(&input.feeling)
            .bind(&input.voice)
            .bind(&input.style)
            .bind(&input.prompt)
            .bind(&input.sounds)
            .bind(&input.complete_prompt)
            .fetch_one(pool)
            .await
    }

    /// Apply the set fields of `input`. Returns `None` if no such task exists.
    ///
    /// `COALESCE` keeps the stored value for every `None` field.
    pub async fn update(
        pool: &PgPool,
        id: TaskId,
        input: &UpdateMeditation,
    ) -> Result<Option<Meditation>, sqlx::Error> {
        let query = format!(
            "UPDATE meditations SET \
                ai_generated_text = COALESCE($2, ai_generated_text), \
                script = COALESCE($3, script), \
                title = COALESCE($4, title), \
                description = COALESCE($5, description), \
                audio_file_url = COALESCE($6, audio_file_url) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Meditation>(&query)
            .bind(id)
            .bind(&input.ai_generated_text)
            .bind(&input.script)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.audio_file_url)
            .fetch_optional(pool)
            .await
    }

    /// Record why processing stopped. Returns `None` if no such task exists.
    pub async fn record_failure(
        pool: &PgPool,
        id: TaskId,
        message: &str,
    ) -> Result<Option<Meditation>, sqlx::Error> {
        let query = format!("UPDATE meditations SET error = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Meditation>(&query)
            .bind(id)
            .bind(message)
            .fetch_optional(pool)
            .await
    }

    /// Find a task by its ID.
    pub async fn find_by_id(pool: &PgPool, id: TaskId) -> Result<Option<Meditation>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM meditations WHERE id = $1");
        sqlx::query_as::<_, Meditation>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
