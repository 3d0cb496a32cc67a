use std::net::SocketAddr;
use std::sync::Arc;

use calmcast_api::config::ServerConfig;
use calmcast_api::router::build_app_router;
use calmcast_api::state::AppState;
use calmcast_elevenlabs::ElevenLabsClient;
use calmcast_openai::OpenAiClient;
use calmcast_pipeline::adapters::PgTaskStore;
use calmcast_pipeline::{MeditationPipeline, TaskStore};
use calmcast_storage::StorageClient;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "calmcast_api=debug,calmcast_pipeline=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration (fail fast on missing credentials) ---
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            std::process::exit(1);
        }
    };
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let pool = calmcast_db::create_pool(&config.database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    calmcast_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    calmcast_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Provider clients (one per provider, shared by every task) ---
    let storage = StorageClient::new(
        config.supabase_url.clone(),
        config.supabase_service_key.clone(),
        config.storage_bucket.clone(),
    );
    let store: Arc<dyn TaskStore> = Arc::new(PgTaskStore::new(pool, storage));
    let writer = Arc::new(
        OpenAiClient::new(config.openai_api_key.clone()).with_model(config.openai_model.clone()),
    );
    let synthesizer = Arc::new(
        ElevenLabsClient::new(config.elevenlabs_api_key.clone())
            .with_model(config.elevenlabs_model.clone()),
    );
    tracing::info!(
        openai_model = %config.openai_model,
        elevenlabs_model = %config.elevenlabs_model,
        bucket = %config.storage_bucket,
        "Provider clients configured",
    );

    // --- App state ---
    let pipeline = Arc::new(MeditationPipeline::new(
        writer,
        synthesizer,
        Arc::clone(&store),
    ));
    let state = AppState { store, pipeline };
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // In-flight pipeline runs are dropped with the runtime; their tasks keep
    // whatever fields were already written.
    tracing::info!("Graceful shutdown complete");
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
