//! Route definitions for meditation tasks.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::tasks;
use crate::state::AppState;

/// Task routes, mounted under `/api`.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/start-task", post(tasks::start_task))
        .route("/task-status/{task_id}", get(tasks::task_status))
        .route("/task-result/{task_id}", get(tasks::task_result))
}
