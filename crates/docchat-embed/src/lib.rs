//! Embedding generation.
//!
//! `OpenAiEmbedder` calls an OpenAI-compatible `/v1/embeddings` endpoint.
//! `HashEmbedder` is a deterministic, network-free substitute used by tests
//! and offline runs; switch to it with `APP_USE_FAKE_EMBEDDINGS=1`.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use docchat_core::config::Config;
use docchat_core::traits::EmbeddingProvider;

pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com";

/// Dimensionality of `HashEmbedder` vectors, matching the default model.
pub const HASH_EMBEDDER_DIM: usize = 1536;

#[derive(Debug, thiserror::Error)]
pub enum EmbedError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("embedding API error: status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("embedding count mismatch: expected {expected}, got {got}")]
    CountMismatch { expected: usize, got: usize },
    #[error("texts cannot be empty or whitespace only")]
    EmptyInput,
}

/// Explicitly constructed client handle for an OpenAI-compatible
/// embeddings endpoint. Inject one per pipeline; there is no process-wide
/// singleton.
pub struct OpenAiEmbedder {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingItem>,
}

#[derive(Deserialize)]
struct EmbeddingItem {
    index: usize,
    embedding: Vec<f32>,
}

impl OpenAiEmbedder {
    pub fn new(api_key: String, model: String, base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            model,
            base_url,
        }
    }

    async fn request_embeddings(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbedError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        if texts.iter().any(|t| t.trim().is_empty()) {
            return Err(EmbedError::EmptyInput);
        }

        let url = format!("{}/v1/embeddings", self.base_url);
        let body = serde_json::json!({
            "model": self.model,
            "input": texts,
            "encoding_format": "float",
        });

        debug!("embedding request to {} ({} texts)", url, texts.len());

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status().as_u16();
        if status != 200 {
            let body = response.text().await.unwrap_or_default();
            return Err(EmbedError::Api { status, body });
        }

        let resp: EmbeddingResponse = response.json().await?;
        let mut items = resp.data;
        // The API does not guarantee input order.
        items.sort_by_key(|item| item.index);
        if items.len() != texts.len() {
            return Err(EmbedError::CountMismatch {
                expected: texts.len(),
                got: items.len(),
            });
        }
        Ok(items.into_iter().map(|item| item.embedding).collect())
    }
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbedder {
    async fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        let mut vectors = self.request_embeddings(&[text.to_string()]).await?;
        vectors
            .pop()
            .ok_or_else(|| anyhow::anyhow!("embedding API returned no vector"))
    }

    async fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        Ok(self.request_embeddings(texts).await?)
    }
}

/// Deterministic token-hashing embedder. Same input, same L2-normalized
/// vector, no network.
pub struct HashEmbedder {
    dim: usize,
}

impl HashEmbedder {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }

    fn embed_sync(&self, text: &str) -> Vec<f32> {
        use std::hash::{Hash, Hasher};
        use twox_hash::XxHash64;

        let mut v = vec![0f32; self.dim];
        for (i, token) in text.split_whitespace().enumerate() {
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h as usize) % self.dim;
            let val = (((h >> 32) as u32) as f32) / (u32::MAX as f32);
            v[idx] += val + (i as f32 % 3.0) * 0.01;
        }
        let norm = (v.iter().map(|x| x * x).sum::<f32>()).sqrt().max(1e-6);
        for x in &mut v {
            *x /= norm;
        }
        v
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        Ok(self.embed_sync(text))
    }

    async fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_sync(t)).collect())
    }
}

/// Build the configured embedding provider.
///
/// `APP_USE_FAKE_EMBEDDINGS=1` selects the hash embedder; otherwise the
/// OpenAI-compatible client is constructed from `openai.api_key`,
/// `embedding.model` and `openai.base_url`.
pub fn default_provider(config: &Config) -> anyhow::Result<Box<dyn EmbeddingProvider>> {
    let use_fake = std::env::var("APP_USE_FAKE_EMBEDDINGS")
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);
    if use_fake {
        debug!("using deterministic hash embedder");
        return Ok(Box::new(HashEmbedder::new(HASH_EMBEDDER_DIM)));
    }
    let api_key: String = config.get("openai.api_key")?;
    let model = config.get_or("embedding.model", DEFAULT_EMBEDDING_MODEL.to_string());
    let base_url = config.get_or("openai.base_url", DEFAULT_BASE_URL.to_string());
    Ok(Box::new(OpenAiEmbedder::new(api_key, model, base_url)))
}
