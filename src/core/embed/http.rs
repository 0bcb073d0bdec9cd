//! OpenAI-compatible HTTP embedding client.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::config::EmbeddingConfig;
use crate::core::embed::EmbeddingProvider;
use crate::core::error::{DocseekError, Result};

/// Client for `POST {base_url}/embeddings`.
///
/// Each call makes a single attempt; retries belong to the pool.
#[derive(Debug, Clone)]
pub struct HttpEmbedder {
    client: Client,
    endpoint: String,
    model: String,
    dimension: Option<usize>,
}

impl HttpEmbedder {
    pub fn new(
        base_url: &str,
        model: &str,
        api_key: Option<&str>,
        dimension: Option<usize>,
        timeout: Duration,
    ) -> Result<Self> {
        if model.trim().is_empty() {
            return Err(DocseekError::ConfigError(
                "Missing embedding model name".to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(key) = api_key.map(str::trim).filter(|k| !k.is_empty()) {
            let auth = HeaderValue::from_str(&format!("Bearer {key}")).map_err(|e| {
                DocseekError::ConfigError(format!("Invalid embedding API key: {e}"))
            })?;
            headers.insert(AUTHORIZATION, auth);
        }

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| DocseekError::ConfigError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: format!("{}/embeddings", base_url.trim_end_matches('/')),
            model: model.to_string(),
            dimension,
        })
    }

    /// Build from configuration, reading the API key from the
    /// configured environment variable.
    pub fn from_config(config: &EmbeddingConfig) -> Result<Self> {
        let api_key = std::env::var(&config.api_key_env).ok();
        if api_key.is_none() {
            tracing::warn!(
                "{} is not set; sending embedding requests without credentials",
                config.api_key_env
            );
        }

        Self::new(
            &config.endpoint,
            &config.model,
            api_key.as_deref(),
            config.dimension,
            Duration::from_secs(config.request_timeout_sec),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}

fn classify_send_error(err: reqwest::Error) -> DocseekError {
    let reason = format!("embedding request failed: {err}");
    if err.is_timeout() || err.is_connect() || err.is_request() || err.is_body() {
        DocseekError::retryable(reason)
    } else {
        DocseekError::fatal(reason)
    }
}

#[async_trait]
impl EmbeddingProvider for HttpEmbedder {
    fn model_id(&self) -> &str {
        &self.model
    }

    fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingRequest {
            model: &self.model,
            input: [text],
            dimensions: self.dimension,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(classify_send_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<body unavailable>".to_string());
            let reason = format!("embeddings endpoint returned {status}: {body}");
            return Err(if is_retryable_status(status) {
                DocseekError::retryable(reason)
            } else {
                DocseekError::fatal(reason)
            });
        }

        let parsed: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| DocseekError::retryable(format!("malformed embedding response: {e}")))?;

        parsed
            .data
            .into_iter()
            .min_by_key(|entry| entry.index)
            .map(|entry| entry.embedding)
            .ok_or_else(|| DocseekError::fatal("embedding response contained no vectors"))
    }
}

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: [&'a str; 1],
    #[serde(skip_serializing_if = "Option::is_none")]
    dimensions: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
    #[serde(default)]
    index: usize,
}
