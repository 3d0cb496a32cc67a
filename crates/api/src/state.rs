use std::sync::Arc;

use calmcast_pipeline::{MeditationPipeline, TaskStore};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Task records and audio storage.
    pub store: Arc<dyn TaskStore>,
    /// Orchestrator launched for every new task.
    pub pipeline: Arc<MeditationPipeline>,
}
