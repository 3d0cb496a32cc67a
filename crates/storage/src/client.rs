//! REST client for a Supabase Storage bucket.

/// Bucket holding meditation audio unless configured otherwise.
pub const DEFAULT_BUCKET: &str = "meditation-audio";

/// HTTP client for one storage bucket.
#[derive(Clone)]
pub struct StorageClient {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
    bucket: String,
}

/// Errors from the storage REST layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Storage returned a non-2xx status code.
    #[error("Storage API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },
}

impl StorageClient {
    /// Create a client for `bucket` on the project at `base_url`.
    ///
    /// * `base_url` - Project URL, e.g. `https://abc.supabase.co`.
    /// * `service_key` - Service-role key; sent as both bearer token and `apikey`.
    pub fn new(
        base_url: impl Into<String>,
        service_key: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, service_key, bucket)
    }

    /// Create a client reusing an existing [`reqwest::Client`].
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        service_key: impl Into<String>,
        bucket: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_key: service_key.into(),
            bucket: bucket.into(),
        }
    }

    /// Bucket this client writes to.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Upload `bytes` as a new object at `path`.
    ///
    /// Existing objects are not overwritten: storage rejects the upload and
    /// the rejection surfaces as [`StorageError::Api`].
    pub async fn upload(
        &self,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        cache_control_secs: u32,
    ) -> Result<(), StorageError> {
        let size = bytes.len();
        let response = self
            .client
            .post(self.object_url(path))
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .header(
                reqwest::header::CACHE_CONTROL,
                format!("max-age={cache_control_secs}"),
            )
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await?;

        Self::ensure_success(response).await?;
        tracing::debug!(bucket = %self.bucket, path, size, "Object uploaded");
        Ok(())
    }

    /// Public URL under which an object in this bucket is served.
    pub fn public_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url, self.bucket, path
        )
    }

    fn object_url(&self, path: &str) -> String {
        format!("{}/storage/v1/object/{}/{}", self.base_url, self.bucket, path)
    }

    /// Return the response unchanged on success, or an
    /// [`StorageError::Api`] with the status and body text on failure.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, StorageError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(StorageError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}
