//! Meditation request validation and the text derived from a request.
//!
//! Everything here is pure: the same input always yields the same prompt,
//! title, description and object name.

use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

use crate::error::CoreError;
use crate::types::TaskId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Fields a start-task request must carry, in the order reported to callers.
pub const REQUIRED_FIELDS: &[&str] = &["duration", "feeling", "voice", "style", "user_id"];

/// Number of script characters kept in a completed task's description.
pub const DESCRIPTION_CHARS: usize = 200;

/// Marker appended to every description.
pub const DESCRIPTION_ELLIPSIS: &str = "...";

/// Content type of synthesized audio.
pub const AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

/// How long storage and CDNs may cache uploaded audio, in seconds.
pub const AUDIO_CACHE_SECS: u32 = 3600;

// ---------------------------------------------------------------------------
// Request
// ---------------------------------------------------------------------------

/// Raw body of `POST /api/start-task`.
///
/// Every field is optional at the serde level so that missing fields are
/// reported through [`StartTaskRequest::validate`] rather than as a JSON
/// rejection.
///
/// Scalars are read loosely: `duration` may be a number or a numeric string,
/// and text fields accept integers. A value of any other type (`true`,
/// objects, arrays, non-numeric duration strings) decodes as absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StartTaskRequest {
    #[serde(default, deserialize_with = "loose_integer")]
    pub duration: Option<i64>,
    #[serde(default, deserialize_with = "loose_text")]
    pub feeling: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub voice: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub style: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub prompt: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub sounds: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    pub user_id: Option<String>,
}

/// A JSON scalar of whatever type the caller sent.
#[derive(Deserialize)]
#[serde(untagged)]
enum LooseScalar {
    Int(i64),
    Float(f64),
    Text(String),
    Other(IgnoredAny),
}

fn loose_integer<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match LooseScalar::deserialize(deserializer)? {
        LooseScalar::Int(n) => Some(n),
        // Saturating cast; out-of-range values are rejected by `validate`.
        LooseScalar::Float(f) if f.fract() == 0.0 => Some(f as i64),
        LooseScalar::Text(s) => s.trim().parse().ok(),
        LooseScalar::Float(_) | LooseScalar::Other(_) => None,
    })
}

fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match LooseScalar::deserialize(deserializer)? {
        LooseScalar::Text(s) => Some(s),
        LooseScalar::Int(n) => Some(n.to_string()),
        LooseScalar::Float(_) | LooseScalar::Other(_) => None,
    })
}

/// A validated meditation request, ready to be persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeditationParams {
    pub user_id: String,
    pub duration: i32,
    pub feeling: String,
    pub voice: String,
    pub style: String,
    pub prompt: String,
    pub sounds: String,
}

impl StartTaskRequest {
    /// Check that every required field is present and non-empty.
    ///
    /// A zero, negative or out-of-range duration counts as missing. Optional
    /// `prompt` and `sounds` default to the empty string.
    pub fn validate(self) -> Result<MeditationParams, CoreError> {
        let duration = self
            .duration
            .and_then(|d| i32::try_from(d).ok())
            .filter(|d| *d > 0);

        match (
            duration,
            non_empty(self.feeling),
            non_empty(self.voice),
            non_empty(self.style),
            non_empty(self.user_id),
        ) {
            (Some(duration), Some(feeling), Some(voice), Some(style), Some(user_id)) => {
                Ok(MeditationParams {
                    user_id,
                    duration,
                    feeling,
                    voice,
                    style,
                    prompt: self.prompt.unwrap_or_default(),
                    sounds: self.sounds.unwrap_or_default(),
                })
            }
            _ => Err(CoreError::MissingFields {
                required: REQUIRED_FIELDS,
            }),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl MeditationParams {
    /// The combined prompt stored on the task at creation.
    pub fn complete_prompt(&self) -> String {
        complete_prompt(
            self.duration,
            &self.style,
            &self.feeling,
            &self.prompt,
            &self.sounds,
        )
    }
}

// ---------------------------------------------------------------------------
// Derived text
// ---------------------------------------------------------------------------

/// Build the summary prompt recorded on a new task.
///
/// The separating spaces are kept even when `prompt` or `sounds` is empty,
/// so `10 / breathing / anxiety` with no extras yields
/// `"10-minute breathing meditation focused on anxiety.  "`.
pub fn complete_prompt(
    duration: i32,
    style: &str,
    feeling: &str,
    prompt: &str,
    sounds: &str,
) -> String {
    let sounds_clause = if sounds.is_empty() {
        String::new()
    } else {
        format!("With ambient sounds: {sounds}")
    };
    format!("{duration}-minute {style} meditation focused on {feeling}. {prompt} {sounds_clause}")
}

/// Title given to a completed meditation.
pub fn title(duration: i32, feeling: &str, style: &str) -> String {
    format!("{duration}-Minute {feeling} {style} Meditation")
}

/// Short description of a script: its first 200 characters plus `...`.
///
/// Scripts shorter than the limit are kept whole; the marker is always added.
pub fn description(script: &str) -> String {
    let mut out: String = script.chars().take(DESCRIPTION_CHARS).collect();
    out.push_str(DESCRIPTION_ELLIPSIS);
    out
}

/// Object-storage name for a task's audio file.
pub fn audio_file_name(id: TaskId) -> String {
    format!("meditation_{id}.mp3")
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn full_request() -> StartTaskRequest {
        StartTaskRequest {
            duration: Some(10),
            feeling: Some("anxiety".into()),
            voice: Some("brittney".into()),
            style: Some("breathing".into()),
            prompt: None,
            sounds: None,
            user_id: Some("u1".into()),
        }
    }

    #[test]
    fn valid_request_defaults_optional_fields() {
        let params = full_request().validate().unwrap();
        assert_eq!(params.duration, 10);
        assert_eq!(params.prompt, "");
        assert_eq!(params.sounds, "");
    }

    #[test]
    fn missing_voice_reports_all_required_fields() {
        let req = StartTaskRequest {
            voice: None,
            ..full_request()
        };
        assert_matches!(
            req.validate(),
            Err(CoreError::MissingFields { required }) if required == REQUIRED_FIELDS
        );
    }

    #[test]
    fn empty_string_counts_as_missing() {
        let req = StartTaskRequest {
            feeling: Some(String::new()),
            ..full_request()
        };
        assert_matches!(req.validate(), Err(CoreError::MissingFields { .. }));
    }

    #[test]
    fn zero_or_negative_duration_counts_as_missing() {
        for duration in [0, -5, i64::from(i32::MAX) + 1] {
            let req = StartTaskRequest {
                duration: Some(duration),
                ..full_request()
            };
            assert_matches!(req.validate(), Err(CoreError::MissingFields { .. }));
        }
    }

    #[test]
    fn request_deserializes_from_partial_json() {
        let req: StartTaskRequest =
            serde_json::from_str(r#"{"duration": 5, "feeling": "calm"}"#).unwrap();
        assert_eq!(req.duration, Some(5));
        assert!(req.voice.is_none());
    }

    #[test]
    fn numeric_strings_and_numbers_are_accepted() {
        let req: StartTaskRequest = serde_json::from_str(
            r#"{"duration": "10", "feeling": "anxiety", "voice": "brittney",
                "style": "breathing", "user_id": 42, "prompt": null, "sounds": null}"#,
        )
        .unwrap();
        assert_eq!(req.duration, Some(10));
        assert_eq!(req.user_id.as_deref(), Some("42"));
        assert!(req.prompt.is_none());

        let params = req.validate().unwrap();
        assert_eq!(params.duration, 10);
        assert_eq!(params.user_id, "42");
    }

    #[test]
    fn unusable_scalars_decode_as_missing() {
        let req: StartTaskRequest = serde_json::from_str(
            r#"{"duration": "ten", "feeling": true, "voice": ["brittney"],
                "style": {"name": "breathing"}, "user_id": 1.5}"#,
        )
        .unwrap();
        assert!(req.duration.is_none());
        assert!(req.feeling.is_none());
        assert!(req.voice.is_none());
        assert!(req.style.is_none());
        assert!(req.user_id.is_none());
        assert_matches!(req.validate(), Err(CoreError::MissingFields { .. }));
    }

    #[test]
    fn whole_float_duration_is_accepted() {
        let req: StartTaskRequest = serde_json::from_str(r#"{"duration": 15.0}"#).unwrap();
        assert_eq!(req.duration, Some(15));
    }

    #[test]
    fn complete_prompt_without_extras_keeps_spacing() {
        let params = full_request().validate().unwrap();
        assert_eq!(
            params.complete_prompt(),
            "10-minute breathing meditation focused on anxiety.  "
        );
    }

    #[test]
    fn complete_prompt_with_prompt_and_sounds() {
        assert_eq!(
            complete_prompt(15, "body scan", "stress", "At the office.", "rain"),
            "15-minute body scan meditation focused on stress. At the office. With ambient sounds: rain"
        );
    }

    #[test]
    fn title_interpolates_fields() {
        assert_eq!(
            title(10, "anxiety", "breathing"),
            "10-Minute anxiety breathing Meditation"
        );
    }

    #[test]
    fn description_truncates_long_scripts() {
        let script = "a".repeat(500);
        let desc = description(&script);
        assert_eq!(desc.len(), 203);
        assert!(desc.ends_with("..."));
        assert_eq!(&desc[..200], &script[..200]);
    }

    #[test]
    fn description_keeps_short_scripts_whole() {
        assert_eq!(description("Breathe in."), "Breathe in....");
    }

    #[test]
    fn description_counts_characters_not_bytes() {
        let script = "é".repeat(250);
        let desc = description(&script);
        assert_eq!(desc.chars().count(), 203);
    }

    #[test]
    fn audio_file_name_is_keyed_by_task_id() {
        let id = uuid::Uuid::nil();
        assert_eq!(
            audio_file_name(id),
            "meditation_00000000-0000-0000-0000-000000000000.mp3"
        );
    }
}
