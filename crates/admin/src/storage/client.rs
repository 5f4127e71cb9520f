//! Client for a Supabase-compatible storage REST API.
//!
//! Objects are written with `POST {url}/storage/v1/object/{bucket}/{name}`
//! and served from `{url}/storage/v1/object/public/{bucket}/{name}`.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use thiserror::Error;
use tracing::{instrument, warn};

use rosa_studio_core::ports::{BlobStore, StoreError};

use crate::config::StorageConfig;

/// Longest error body kept in a log line.
const MAX_ERROR_BODY: usize = 200;

/// Errors building a [`StorageClient`].
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage service key is not a valid header value")]
    InvalidKey,

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Uploads images and returns their public URLs.
#[derive(Clone)]
pub struct StorageClient {
    inner: Arc<StorageClientInner>,
}

struct StorageClientInner {
    client: reqwest::Client,
    base_url: String,
    bucket: String,
}

impl std::fmt::Debug for StorageClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageClient")
            .field("base_url", &self.inner.base_url)
            .field("bucket", &self.inner.bucket)
            .finish_non_exhaustive()
    }
}

impl StorageClient {
    /// Create a client with the service key as default auth headers.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not a valid header value or the HTTP
    /// client cannot be built.
    pub fn new(config: &StorageConfig) -> Result<Self, StorageError> {
        let key = config.service_key.expose_secret();

        let mut bearer =
            HeaderValue::from_str(&format!("Bearer {key}")).map_err(|_| StorageError::InvalidKey)?;
        bearer.set_sensitive(true);
        let mut apikey = HeaderValue::from_str(key).map_err(|_| StorageError::InvalidKey)?;
        apikey.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer);
        headers.insert("apikey", apikey);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            inner: Arc::new(StorageClientInner {
                client,
                base_url: config.url.trim_end_matches('/').to_owned(),
                bucket: config.bucket.clone(),
            }),
        })
    }

    /// Where an object is written.
    #[must_use]
    pub fn object_url(&self, object_name: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{object_name}",
            self.inner.base_url, self.inner.bucket
        )
    }

    /// Where an object is served from once written.
    #[must_use]
    pub fn public_url(&self, object_name: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{object_name}",
            self.inner.base_url, self.inner.bucket
        )
    }
}

#[async_trait]
impl BlobStore for StorageClient {
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    async fn upload(
        &self,
        object_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, StoreError> {
        let response = self
            .inner
            .client
            .post(self.object_url(object_name))
            .header(CONTENT_TYPE, content_type)
            .header(CACHE_CONTROL, "max-age=3600")
            .header("x-upsert", "false")
            .body(bytes)
            .send()
            .await
            .map_err(|e| StoreError::Unavailable(format!("storage request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body: String = response
                .text()
                .await
                .unwrap_or_default()
                .chars()
                .take(MAX_ERROR_BODY)
                .collect();
            warn!(%status, body = %body, "Storage upload rejected");
            return Err(StoreError::Unavailable(format!(
                "storage upload returned {status}"
            )));
        }

        Ok(self.public_url(object_name))
    }
}
