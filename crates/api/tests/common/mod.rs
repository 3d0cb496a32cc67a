#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tokio::sync::Notify;
use tower::ServiceExt;

use calmcast_api::config::ServerConfig;
use calmcast_api::router::build_app_router;
use calmcast_api::state::AppState;
use calmcast_openai::ScriptRequest;
use calmcast_pipeline::memory::InMemoryTaskStore;
use calmcast_pipeline::{MeditationPipeline, ProviderError, ScriptWriter, SpeechSynthesizer};

/// Build a test `ServerConfig` with placeholder credentials.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: Vec::new(),
        request_timeout_secs: 30,
        database_url: "postgres://unused".to_string(),
        supabase_url: "http://storage.invalid".to_string(),
        supabase_service_key: "service-key".to_string(),
        storage_bucket: "meditation-audio".to_string(),
        openai_api_key: "sk-test".to_string(),
        openai_model: "gpt-4".to_string(),
        elevenlabs_api_key: "xi-test".to_string(),
        elevenlabs_model: "eleven_monolingual_v1".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Scripted providers
// ---------------------------------------------------------------------------

/// Script writer with a fixed answer, optionally held until `gate` is notified.
pub struct ScriptedWriter {
    pub result: Result<String, String>,
    pub gate: Option<Arc<Notify>>,
}

#[async_trait]
impl ScriptWriter for ScriptedWriter {
    async fn write_script(&self, _req: &ScriptRequest<'_>) -> Result<String, ProviderError> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.result.clone().map_err(Into::into)
    }
}

/// Synthesizer returning a few fake MP3 bytes.
pub struct ScriptedSynth;

#[async_trait]
impl SpeechSynthesizer for ScriptedSynth {
    async fn synthesize(&self, _text: &str, _voice_id: &str) -> Result<Vec<u8>, ProviderError> {
        Ok(b"ID3fake-mp3".to_vec())
    }
}

// ---------------------------------------------------------------------------
// App builders
// ---------------------------------------------------------------------------

/// Build the full app over an in-memory store and the given script writer.
pub fn build_app_with(writer: ScriptedWriter) -> (Router, InMemoryTaskStore) {
    let store = InMemoryTaskStore::new();
    let pipeline = Arc::new(MeditationPipeline::new(
        Arc::new(writer),
        Arc::new(ScriptedSynth),
        Arc::new(store.clone()),
    ));
    let state = AppState {
        store: Arc::new(store.clone()),
        pipeline,
    };
    (build_app_router(state, &test_config()), store)
}

/// App whose script writer immediately returns `script`.
pub fn build_test_app(script: &str) -> (Router, InMemoryTaskStore) {
    build_app_with(ScriptedWriter {
        result: Ok(script.to_string()),
        gate: None,
    })
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn post_raw(app: Router, uri: &str, body: &'static str) -> Response<Body> {
    app.oneshot(
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap(),
    )
    .await
    .unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Poll `GET /api/task-status/{id}` until the status is terminal.
pub async fn wait_for_terminal_status(app: &Router, task_id: &str) -> serde_json::Value {
    for _ in 0..200 {
        let json = body_json(get(app.clone(), &format!("/api/task-status/{task_id}")).await).await;
        if json["status"] == "completed" || json["status"] == "failed" {
            return json;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("task {task_id} did not reach a terminal status");
}
