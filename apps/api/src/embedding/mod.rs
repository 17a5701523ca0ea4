//! Embedding Provider: turns free text into vectors via the Gemini
//! `embedContent` API.
//!
//! Owns the input budget (truncate, never reject) and the retry policy for
//! rate-limited calls. Every vector is tagged with the model that produced it;
//! vectors from different models are never compared.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Maximum characters submitted per embedding call.
pub const MAX_EMBED_CHARS: usize = 8000;
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("GEMINI_API_KEY is not set")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Embedding quota exhausted after {retries} attempts")]
    QuotaExceeded { retries: u32 },

    #[error("Provider returned an empty embedding")]
    EmptyVector,

    #[error("Provider returned a non-finite component at index {index}")]
    NonFinite { index: usize },
}

/// A finite-valued vector and the model that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddingVector {
    model: String,
    values: Vec<f32>,
}

impl EmbeddingVector {
    /// Rejects empty vectors and NaN/infinite components.
    pub fn new(model: impl Into<String>, values: Vec<f32>) -> Result<Self, EmbeddingError> {
        if values.is_empty() {
            return Err(EmbeddingError::EmptyVector);
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(EmbeddingError::NonFinite { index });
        }
        Ok(Self {
            model: model.into(),
            values,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    pub fn dimensions(&self) -> usize {
        self.values.len()
    }

    /// Typed storage parameter. Non-finite components become 0.
    pub fn to_pgvector(&self) -> pgvector::Vector {
        pgvector::Vector::from(
            self.values()
                .iter()
                .map(|v| if v.is_finite() { *v } else { 0.0 })
                .collect::<Vec<f32>>(),
        )
    }
}

/// Text in, vector out. Carried in `AppState` as `Arc<dyn Embedder>`.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Model name stamped on every vector this embedder returns.
    fn model(&self) -> &str;

    async fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError>;
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: String,
    content: EmbedContent<'a>,
}

#[derive(Debug, Serialize)]
struct EmbedContent<'a> {
    parts: Vec<EmbedPart<'a>>,
}

#[derive(Debug, Serialize)]
struct EmbedPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: Option<EmbedValues>,
}

#[derive(Debug, Deserialize)]
struct EmbedValues {
    #[serde(default)]
    values: Vec<f32>,
}

#[derive(Clone)]
pub struct GeminiEmbedder {
    client: Client,
    api_key: Option<String>,
    model: String,
}

impl GeminiEmbedder {
    pub fn new(client: Client, api_key: Option<String>, model: String) -> Self {
        Self {
            client,
            api_key,
            model,
        }
    }
}

#[async_trait]
impl Embedder for GeminiEmbedder {
    fn model(&self) -> &str {
        &self.model
    }

    /// Retries on 429 and 5xx with exponential backoff (1s, 2s).
    async fn embed(&self, text: &str) -> Result<EmbeddingVector, EmbeddingError> {
        let api_key = self.api_key.as_deref().ok_or(EmbeddingError::MissingApiKey)?;
        let text = truncate_chars(text, MAX_EMBED_CHARS);
        let url = format!("{GEMINI_API_BASE}/models/{}:embedContent", self.model);
        let request_body = EmbedRequest {
            model: format!("models/{}", self.model),
            content: EmbedContent {
                parts: vec![EmbedPart { text }],
            },
        };

        let mut last_error: Option<EmbeddingError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                let delay = std::time::Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Embedding attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = self
                .client
                .post(&url)
                .query(&[("key", api_key)])
                .json(&request_body)
                .send()
                .await;

            let response = match response {
                Ok(r) => r,
                Err(e) => {
                    last_error = Some(EmbeddingError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 {
                let body = response.text().await.unwrap_or_default();
                warn!("Embedding API rate limited: {body}");
                last_error = Some(EmbeddingError::QuotaExceeded {
                    retries: attempt + 1,
                });
                continue;
            }

            if status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Embedding API returned {}: {}", status, body);
                last_error = Some(EmbeddingError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(EmbeddingError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let parsed: EmbedResponse = response.json().await?;
            let values = parsed.embedding.map(|e| e.values).unwrap_or_default();
            let vector = EmbeddingVector::new(self.model.clone(), values)?;

            debug!(
                "Embedding succeeded: model={}, dimensions={}",
                self.model,
                vector.dimensions()
            );
            return Ok(vector);
        }

        Err(last_error.unwrap_or(EmbeddingError::QuotaExceeded {
            retries: MAX_RETRIES,
        }))
    }
}

/// Cuts `text` to at most `max_chars` characters on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
