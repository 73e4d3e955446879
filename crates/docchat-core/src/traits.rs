use crate::types::{ChatMessage, DocumentChunk, SearchResult};
use async_trait::async_trait;

/// Maps text to fixed-length vectors, one per input, order-preserving.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    async fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>>;
    async fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;
}

/// Persists chunk/embedding pairs and answers nearest-neighbor queries.
///
/// `store` must preserve the pairing between parallel arrays; `search`
/// returns results ranked best-first (lowest distance).
#[async_trait]
pub trait VectorStore: Send + Sync {
    async fn store(&self, chunks: &[DocumentChunk], embeddings: &[Vec<f32>]) -> anyhow::Result<()>;
    async fn search(&self, query_embedding: &[f32], k: usize) -> anyhow::Result<Vec<SearchResult>>;
}

/// Produces an assistant completion for a conversation.
#[async_trait]
pub trait ChatProvider: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> anyhow::Result<String>;
}

/// A shared store handle is itself a store, so the ingestion pipeline and
/// the chat engine can address the same backend.
#[async_trait]
impl<T: VectorStore + ?Sized> VectorStore for std::sync::Arc<T> {
    async fn store(&self, chunks: &[DocumentChunk], embeddings: &[Vec<f32>]) -> anyhow::Result<()> {
        (**self).store(chunks, embeddings).await
    }

    async fn search(&self, query_embedding: &[f32], k: usize) -> anyhow::Result<Vec<SearchResult>> {
        (**self).search(query_embedding, k).await
    }
}
