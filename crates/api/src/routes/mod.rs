pub mod health;
pub mod tasks;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// ```text
/// /start-task                   POST  create a task and start the pipeline
/// /task-status/{task_id}        GET   inferred status + partial output
/// /task-result/{task_id}        GET   final output (404 until completed)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(tasks::router())
}
