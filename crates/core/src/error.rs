use crate::types::TaskId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: TaskId },

    /// One or more required request fields were absent or empty.
    ///
    /// Carries the full list of required fields, not only the missing ones.
    #[error("Missing required fields")]
    MissingFields { required: &'static [&'static str] },

    #[error("Validation failed: {0}")]
    Validation(String),
}
