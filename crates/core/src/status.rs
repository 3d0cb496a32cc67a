//! Task status, derived from which result fields a task record carries.
//!
//! Status is never stored. Every read recomputes it from the record so it
//! cannot drift from the data it summarizes.

use serde::Serialize;

/// Processing stage of a meditation task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Created; no script yet.
    Pending,
    /// Script generated; audio not yet uploaded.
    GeneratingAudio,
    /// Audio uploaded. Terminal.
    Completed,
    /// Processing stopped with an error. Terminal.
    Failed,
}

impl TaskStatus {
    /// Wire name of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::GeneratingAudio => "generating-audio",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }

    /// Whether the task will not change any further.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The nullable result fields status inference looks at.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusFields<'a> {
    pub ai_generated_text: Option<&'a str>,
    pub audio_file_url: Option<&'a str>,
    pub error: Option<&'a str>,
}

/// Infer a task's status from its populated fields.
///
/// Precedence: uploaded audio means completed; otherwise a recorded error
/// means failed; otherwise a generated script means audio is in progress;
/// otherwise the task is pending.
pub fn infer_status(fields: StatusFields<'_>) -> TaskStatus {
    if fields.audio_file_url.is_some() {
        TaskStatus::Completed
    } else if fields.error.is_some() {
        TaskStatus::Failed
    } else if fields.ai_generated_text.is_some() {
        TaskStatus::GeneratingAudio
    } else {
        TaskStatus::Pending
    }
}
