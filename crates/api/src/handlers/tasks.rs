//! Handlers for meditation tasks: start, poll status, fetch result.
//!
//! Status is never read from storage; it is inferred from the record on
//! every request.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::Json;
use calmcast_core::meditation::StartTaskRequest;
use calmcast_core::status::TaskStatus;
use calmcast_core::types::TaskId;
use calmcast_db::models::meditation::CreateMeditation;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct StartTaskResponse {
    #[serde(rename = "taskId")]
    pub task_id: TaskId,
    pub status: TaskStatus,
}

#[derive(Debug, Serialize)]
pub struct TaskStatusResponse {
    pub status: TaskStatus,
    pub audio_file_url: Option<String>,
    pub ai_generated_text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TaskResultResponse {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration: i32,
    pub feeling: String,
    pub style: String,
    pub audio_file_url: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Decode a start-task body. An empty body is treated as `{}` so that it
/// is reported as missing fields rather than as malformed JSON.
fn parse_start_request(body: &[u8]) -> AppResult<StartTaskRequest> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(StartTaskRequest::default());
    }
    serde_json::from_slice(body).map_err(|e| AppError::MalformedBody(e.to_string()))
}

fn parse_task_id(raw: &str) -> AppResult<TaskId> {
    raw.parse()
        .map_err(|_| AppError::InvalidTaskId(raw.to_string()))
}

// ---------------------------------------------------------------------------
// Start
// ---------------------------------------------------------------------------

/// POST /api/start-task
///
/// Validate the request, create the task record and launch the pipeline in
/// the background. Responds as soon as the record exists.
pub async fn start_task(
    State(state): State<AppState>,
    body: Bytes,
) -> AppResult<Json<StartTaskResponse>> {
    let params = parse_start_request(&body)?.validate()?;
    let task = state.store.create(&CreateMeditation::from(params)).await?;

    tracing::info!(
        task_id = %task.id,
        user_id = %task.user_id,
        duration = task.duration,
        voice = %task.voice,
        "Meditation task created",
    );

    let response = StartTaskResponse {
        task_id: task.id,
        status: task.status(),
    };
    state.pipeline.spawn(task);

    Ok(Json(response))
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// GET /api/task-status/{task_id}
pub async fn task_status(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> AppResult<Json<TaskStatusResponse>> {
    let task = state.store.get(parse_task_id(&task_id)?).await?;

    Ok(Json(TaskStatusResponse {
        status: task.status(),
        audio_file_url: task.audio_file_url,
        ai_generated_text: task.ai_generated_text,
    }))
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// GET /api/task-result/{task_id}
///
/// 404 with `Task not completed yet` until the audio has been uploaded.
pub async fn task_result(
    State(state): State<AppState>,
    Path(task_id): Path<String>,
) -> AppResult<Json<TaskResultResponse>> {
    let task = state.store.get(parse_task_id(&task_id)?).await?;
    let audio_file_url = task.audio_file_url.ok_or(AppError::NotCompleted)?;

    Ok(Json(TaskResultResponse {
        title: task.title,
        description: task.description,
        duration: task.duration,
        feeling: task.feeling,
        style: task.style,
        audio_file_url,
    }))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn blank_body_is_an_empty_request() {
        let req = parse_start_request(b"  \n").unwrap();
        assert!(req.duration.is_none());
        assert!(req.user_id.is_none());
    }

    #[test]
    fn invalid_json_is_malformed() {
        assert_matches!(parse_start_request(b"{not json"), Err(AppError::MalformedBody(_)));
    }

    #[test]
    fn task_id_must_be_a_uuid() {
        assert_matches!(parse_task_id("42"), Err(AppError::InvalidTaskId(id)) if id == "42");
        assert!(parse_task_id("6f1c1f0e-8d4b-4c57-9a4e-2b1f3f1d9c10").is_ok());
    }
}
