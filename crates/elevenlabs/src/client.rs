//! Streaming text-to-speech client.
//!
//! The provider streams encoded audio; [`ElevenLabsClient::synthesize`]
//! drains the stream and returns the whole file.

use futures::StreamExt;
use serde::Serialize;

/// Synthesis model used unless overridden with [`ElevenLabsClient::with_model`].
pub const DEFAULT_MODEL: &str = "eleven_monolingual_v1";

/// Public ElevenLabs API root.
pub const DEFAULT_BASE_URL: &str = "https://api.elevenlabs.io/v1";

/// Voice stability applied to every synthesis.
pub const STABILITY: f32 = 0.5;

/// Similarity boost applied to every synthesis.
pub const SIMILARITY_BOOST: f32 = 0.5;

/// Upper bound on the buffer reserved up front from `Content-Length`.
pub const MAX_PREALLOCATED_BYTES: usize = 16 * 1024 * 1024;

const XI_API_KEY_HEADER: &str = "xi-api-key";
const AUDIO_MPEG: &str = "audio/mpeg";

#[derive(Clone)]
pub struct ElevenLabsClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

/// Errors from the ElevenLabs API layer.
#[derive(Debug, thiserror::Error)]
pub enum ElevenLabsError {
    /// The HTTP request or the audio stream failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// ElevenLabs returned a non-2xx status code.
    #[error("ElevenLabs API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The stream ended without any audio.
    #[error("ElevenLabs returned no audio")]
    EmptyAudio,
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: VoiceSettings,
}

#[derive(Debug, Serialize)]
struct VoiceSettings {
    stability: f32,
    similarity_boost: f32,
}

impl ElevenLabsClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Synthesize `text` with the provider voice `voice_id`.
    ///
    /// Returns the complete encoded audio. A failure anywhere in the stream
    /// fails the whole call; nothing partial is returned.
    pub async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Vec<u8>, ElevenLabsError> {
        let response = self
            .client
            .post(self.stream_url(voice_id))
            .header(reqwest::header::ACCEPT, AUDIO_MPEG)
            .header(XI_API_KEY_HEADER, &self.api_key)
            .json(&speech_request(text, &self.model))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(ElevenLabsError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let mut audio = Vec::with_capacity(initial_capacity(response.content_length()));
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            audio.extend_from_slice(&chunk?);
        }

        if audio.is_empty() {
            return Err(ElevenLabsError::EmptyAudio);
        }

        tracing::debug!(voice_id, bytes = audio.len(), "Audio synthesized");
        Ok(audio)
    }

    fn stream_url(&self, voice_id: &str) -> String {
        format!("{}/text-to-speech/{voice_id}/stream", self.base_url)
    }
}

/// Buffer size to reserve for a body of advertised length `content_length`.
fn initial_capacity(content_length: Option<u64>) -> usize {
    content_length
        .and_then(|len| usize::try_from(len).ok())
        .unwrap_or(0)
        .min(MAX_PREALLOCATED_BYTES)
}

fn speech_request<'a>(text: &'a str, model_id: &'a str) -> SpeechRequest<'a> {
    SpeechRequest {
        text,
        model_id,
        voice_settings: VoiceSettings {
            stability: STABILITY,
            similarity_boost: SIMILARITY_BOOST,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advertised_length_is_capped() {
        assert_eq!(initial_capacity(None), 0);
        assert_eq!(initial_capacity(Some(48_000)), 48_000);
        assert_eq!(initial_capacity(Some(u64::MAX)), MAX_PREALLOCATED_BYTES);
        assert_eq!(
            initial_capacity(Some(MAX_PREALLOCATED_BYTES as u64 + 1)),
            MAX_PREALLOCATED_BYTES
        );
    }

    #[test]
    fn stream_url_embeds_voice_id() {
        let client = ElevenLabsClient::new("key");
        assert_eq!(
            client.stream_url("pjcYQlDFKMbcOUp6F5GD"),
            "https://api.elevenlabs.io/v1/text-to-speech/pjcYQlDFKMbcOUp6F5GD/stream"
        );
    }

    #[test]
    fn request_body_carries_model_and_voice_settings() {
        let body = serde_json::to_value(speech_request("Breathe in.", DEFAULT_MODEL)).unwrap();
        assert_eq!(body["text"], "Breathe in.");
        assert_eq!(body["model_id"], "eleven_monolingual_v1");
        assert_eq!(body["voice_settings"]["stability"], 0.5);
        assert_eq!(body["voice_settings"]["similarity_boost"], 0.5);
    }

    #[test]
    fn builder_overrides_model_and_base_url() {
        let client = ElevenLabsClient::new("key")
            .with_model("eleven_multilingual_v2")
            .with_base_url("http://localhost:9000/v1/");
        assert_eq!(client.model, "eleven_multilingual_v2");
        assert_eq!(
            client.stream_url("v1"),
            "http://localhost:9000/v1/text-to-speech/v1/stream"
        );
    }
}
