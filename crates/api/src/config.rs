use axum::http::HeaderValue;
use calmcast_storage::DEFAULT_BUCKET;

/// Startup configuration problems. Any of these aborts the process.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {name}: '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Server configuration loaded from environment variables.
///
/// Provider credentials have no defaults: every one of them must be set or
/// startup fails. Everything else falls back to local-development values.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins. Empty means any origin.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Postgres connection string for task records.
    pub database_url: String,
    /// Supabase project URL (object storage).
    pub supabase_url: String,
    /// Supabase service-role key.
    pub supabase_service_key: String,
    /// Bucket receiving meditation audio.
    pub storage_bucket: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub elevenlabs_api_key: String,
    pub elevenlabs_model: String,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                | Default                  |
    /// |------------------------|--------------------------|
    /// | `DATABASE_URL`         | required                 |
    /// | `SUPABASE_URL`         | required                 |
    /// | `SUPABASE_SERVICE_KEY` | required                 |
    /// | `OPENAI_API_KEY`       | required                 |
    /// | `ELEVENLABS_API_KEY`   | required                 |
    /// | `HOST`                 | `0.0.0.0`                |
    /// | `PORT`                 | `3000`                   |
    /// | `CORS_ORIGINS`         | `*`                      |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                     |
    /// | `STORAGE_BUCKET`       | `meditation-audio`       |
    /// | `OPENAI_MODEL`         | `gpt-4`                  |
    /// | `ELEVENLABS_MODEL`     | `eleven_monolingual_v1`  |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(name))
        };
        let or_default = |name: &str, default: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let database_url = required("DATABASE_URL")?;
        let supabase_url = required("SUPABASE_URL")?;
        let supabase_service_key = required("SUPABASE_SERVICE_KEY")?;
        let openai_api_key = required("OPENAI_API_KEY")?;
        let elevenlabs_api_key = required("ELEVENLABS_API_KEY")?;

        let port = parse_var("PORT", or_default("PORT", "3000"))?;
        let request_timeout_secs =
            parse_var("REQUEST_TIMEOUT_SECS", or_default("REQUEST_TIMEOUT_SECS", "30"))?;
        let cors_origins = parse_cors_origins(&or_default("CORS_ORIGINS", "*"))?;

        Ok(Self {
            host: or_default("HOST", "0.0.0.0"),
            port,
            cors_origins,
            request_timeout_secs,
            database_url,
            supabase_url,
            supabase_service_key,
            storage_bucket: or_default("STORAGE_BUCKET", DEFAULT_BUCKET),
            openai_api_key,
            openai_model: or_default("OPENAI_MODEL", calmcast_openai::DEFAULT_MODEL),
            elevenlabs_api_key,
            elevenlabs_model: or_default("ELEVENLABS_MODEL", calmcast_elevenlabs::DEFAULT_MODEL),
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}

/// Split a comma-separated origin list. `*` alone means any origin.
fn parse_cors_origins(raw: &str) -> Result<Vec<String>, ConfigError> {
    let origins: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if origins.iter().any(|o| o == "*") {
        return Ok(Vec::new());
    }

    for origin in &origins {
        if HeaderValue::from_str(origin).is_err() {
            return Err(ConfigError::Invalid {
                name: "CORS_ORIGINS",
                value: origin.clone(),
            });
        }
    }
    Ok(origins)
}
