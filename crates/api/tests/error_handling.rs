//! Tests for `AppError` -> HTTP response mapping.
//!
//! These call `IntoResponse` directly on `AppError` values; no server needed.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use calmcast_api::error::{panic_response, AppError};
use calmcast_core::error::CoreError;
use calmcast_core::meditation::REQUIRED_FIELDS;
use calmcast_pipeline::StoreError;
use http_body_util::BodyExt;
use serde_json::json;
use tower::ServiceExt;
use tower_http::catch_panic::CatchPanicLayer;

/// Helper: convert an `AppError` into its status code and parsed JSON body.
async fn error_to_response(err: AppError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn missing_fields_returns_400_with_required_list() {
    let err = AppError::Core(CoreError::MissingFields {
        required: REQUIRED_FIELDS,
    });

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        json,
        json!({
            "error": "Missing required fields",
            "required": ["duration", "feeling", "voice", "style", "user_id"]
        })
    );
}

#[tokio::test]
async fn not_completed_returns_404_with_fixed_body() {
    let (status, json) = error_to_response(AppError::NotCompleted).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json, json!({ "error": "Task not completed yet" }));
}

#[tokio::test]
async fn store_not_found_is_a_generic_500() {
    let id = uuid::Uuid::nil();
    let err = AppError::Store(StoreError::Core(CoreError::NotFound {
        entity: "Meditation",
        id,
    }));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"], "Something went wrong!");
    assert_eq!(
        json["message"],
        format!("Entity not found: Meditation with id {id}")
    );
}

#[tokio::test]
async fn generic_500_carries_only_error_and_message() {
    let err = AppError::Core(CoreError::Validation("user_id is required".into()));

    let (status, json) = error_to_response(err).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json,
        json!({
            "error": "Something went wrong!",
            "message": "Validation failed: user_id is required"
        })
    );
}

#[tokio::test]
async fn malformed_body_is_a_generic_500() {
    let (status, json) = error_to_response(AppError::MalformedBody("EOF".into())).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["message"], "Malformed request body: EOF");
}

#[tokio::test]
async fn handler_panic_gets_the_generic_500_body() {
    async fn explode() -> &'static str {
        panic!("pipeline state corrupted");
    }

    let app = Router::new()
        .route("/explode", get(explode))
        .layer(CatchPanicLayer::custom(panic_response));

    let response = app
        .oneshot(Request::get("/explode").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(
        json,
        json!({
            "error": "Something went wrong!",
            "message": "Internal server error"
        })
    );
}
