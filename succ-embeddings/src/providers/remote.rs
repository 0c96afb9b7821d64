//! Remote HTTP embedding provider.
//!
//! Calls a remote embedding API (`EmbeddingConfig::endpoint`) with retry
//! and exponential backoff. The API key is read from
//! `SUCC_EMBEDDING_API_KEY` at construction, never from the config file.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use succ_core::errors::{EmbeddingError, SuccResult};
use tracing::{debug, warn};

use super::Provider;

pub struct RemoteProvider {
    model: String,
    api_key: String,
    endpoint: String,
    dimensions: usize,
    available: AtomicBool,
    max_retries: u32,
}

#[derive(Serialize)]
struct EmbedRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    data: Vec<EmbedData>,
}

#[derive(Deserialize)]
struct EmbedData {
    embedding: Vec<f32>,
}

impl RemoteProvider {
    pub fn new(model: String, api_key: String, endpoint: String, dimensions: usize) -> Self {
        Self {
            model,
            api_key,
            endpoint,
            dimensions,
            available: AtomicBool::new(true),
            max_retries: 3,
        }
    }

    fn request_embeddings(&self, texts: Vec<String>) -> SuccResult<Vec<Vec<f32>>> {
        if !self.available.load(Ordering::Relaxed) {
            return Err(EmbeddingError::ProviderUnavailable { provider: self.name().to_string() }.into());
        }

        let body = serde_json::to_string(&EmbedRequest { model: self.model.clone(), input: texts })
            .map_err(|e| EmbeddingError::InferenceFailed {
                reason: format!("JSON serialization error: {e}"),
            })?;

        let mut last_err = None;
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = Duration::from_millis(100 * 2u64.pow(attempt - 1));
                std::thread::sleep(delay);
                debug!(attempt, "retrying remote embedding request");
            }

            match self.send_request(&body) {
                Ok(embeddings) => return Ok(embeddings),
                Err(e) => {
                    warn!(attempt, error = %e, "remote embedding request failed");
                    last_err = Some(e);
                }
            }
        }

        self.available.store(false, Ordering::Relaxed);
        Err(last_err.unwrap_or_else(|| {
            EmbeddingError::InferenceFailed { reason: "all retries exhausted".to_string() }.into()
        }))
    }

    /// Blocking call via a current-thread tokio runtime, since `Provider`
    /// is a synchronous (`&self`) trait.
    fn send_request(&self, body: &str) -> SuccResult<Vec<Vec<f32>>> {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| EmbeddingError::InferenceFailed { reason: format!("runtime error: {e}") })?;

        let client = reqwest::Client::new();
        let endpoint = self.endpoint.clone();
        let api_key = self.api_key.clone();
        let body_owned = body.to_string();
        let dims = self.dimensions;

        rt.block_on(async {
            let response = client
                .post(&endpoint)
                .header("Authorization", format!("Bearer {api_key}"))
                .header("Content-Type", "application/json")
                .body(body_owned)
                .send()
                .await
                .map_err(|e| EmbeddingError::InferenceFailed { reason: format!("HTTP error: {e}") })?;

            if !response.status().is_success() {
                let status = response.status();
                let text = response.text().await.unwrap_or_default();
                return Err(EmbeddingError::InferenceFailed {
                    reason: format!("API returned {status}: {text}"),
                }
                .into());
            }

            let resp: EmbedResponse = response
                .json()
                .await
                .map_err(|e| EmbeddingError::InferenceFailed { reason: format!("JSON parse error: {e}") })?;

            Ok(resp
                .data
                .into_iter()
                .map(|d| {
                    let mut v = d.embedding;
                    v.resize(dims, 0.0);
                    v
                })
                .collect())
        })
    }

    pub fn reset_availability(&self) {
        self.available.store(true, Ordering::Relaxed);
    }
}

impl Provider for RemoteProvider {
    fn embed(&self, text: &str) -> SuccResult<Vec<f32>> {
        let results = self.request_embeddings(vec![text.to_string()])?;
        results
            .into_iter()
            .next()
            .ok_or_else(|| EmbeddingError::InferenceFailed { reason: "empty response".to_string() }.into())
    }

    fn embed_batch(&self, texts: &[String]) -> SuccResult<Vec<Vec<f32>>> {
        self.request_embeddings(texts.to_vec())
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn name(&self) -> &str {
        &self.model
    }

    fn is_available(&self) -> bool {
        self.available.load(Ordering::Relaxed)
    }
}
