use std::any::Any;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use calmcast_core::error::CoreError;
use calmcast_pipeline::StoreError;
use serde_json::json;

/// Fixed `error` text of every 500 response.
pub const GENERIC_ERROR: &str = "Something went wrong!";

/// `message` of the 500 returned when a handler panics.
pub const PANIC_MESSAGE: &str = "Internal server error";

/// Application-level error type for HTTP handlers.
///
/// Only two failures have dedicated responses: missing request fields (400)
/// and asking for the result of an unfinished task (404). Everything else
/// funnels into one generic 500 body carrying the error message.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `calmcast_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A record-store or object-store failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The task exists but has no audio yet.
    #[error("Task not completed yet")]
    NotCompleted,

    /// The path segment is not a task id.
    #[error("Invalid task id '{0}'")]
    InvalidTaskId(String),

    /// The request body is not a JSON object of the expected shape.
    #[error("Malformed request body: {0}")]
    MalformedBody(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Core(CoreError::MissingFields { required }) => (
                StatusCode::BAD_REQUEST,
                axum::Json(json!({
                    "error": self.to_string(),
                    "required": required,
                })),
            )
                .into_response(),

            AppError::NotCompleted => (
                StatusCode::NOT_FOUND,
                axum::Json(json!({ "error": self.to_string() })),
            )
                .into_response(),

            _ => {
                tracing::error!(error = %self, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    axum::Json(json!({
                        "error": GENERIC_ERROR,
                        "message": self.to_string(),
                    })),
                )
                    .into_response()
            }
        }
    }
}

/// Response for a panicking handler, used with `CatchPanicLayer::custom`.
///
/// The panic payload is logged but not returned to the caller.
pub fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else {
        "unknown panic payload"
    };
    tracing::error!(panic = %detail, "Request handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        axum::Json(json!({
            "error": GENERIC_ERROR,
            "message": PANIC_MESSAGE,
        })),
    )
        .into_response()
}
