//! Vector storage adapters.
//!
//! `ChromaStore` talks to a Chroma-style HTTP service; `MemoryStore` is a
//! brute-force in-memory implementation of the same `VectorStore` trait for
//! tests and offline runs.

pub mod chroma;
pub mod memory;

pub use chroma::ChromaStore;
pub use memory::MemoryStore;

use docchat_core::types::DocumentChunk;

/// Hard cap on `k` for nearest-neighbor queries.
pub const MAX_SEARCH_RESULTS: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("vector store API error: status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("invalid store input: {0}")]
    InvalidInput(String),
    #[error("invalid response from vector store: {0}")]
    BadResponse(String),
}

/// Reject malformed store batches before anything is written. The pairing
/// between chunks and embeddings is positional, so the arrays must agree.
pub(crate) fn validate_batch(
    chunks: &[DocumentChunk],
    embeddings: &[Vec<f32>],
) -> Result<(), StoreError> {
    if chunks.is_empty() {
        return Err(StoreError::InvalidInput(
            "chunks must be a non-empty array".to_string(),
        ));
    }
    if embeddings.is_empty() {
        return Err(StoreError::InvalidInput(
            "embeddings must be a non-empty array".to_string(),
        ));
    }
    if chunks.len() != embeddings.len() {
        return Err(StoreError::InvalidInput(format!(
            "mismatch: {} chunks but {} embeddings",
            chunks.len(),
            embeddings.len()
        )));
    }
    for (i, chunk) in chunks.iter().enumerate() {
        if chunk.id.is_empty() {
            return Err(StoreError::InvalidInput(format!(
                "chunk at index {i}: missing id"
            )));
        }
        if chunk.content.is_empty() {
            return Err(StoreError::InvalidInput(format!(
                "chunk at index {i}: missing content"
            )));
        }
        if embeddings[i].is_empty() {
            return Err(StoreError::InvalidInput(format!(
                "embedding at index {i}: cannot be empty"
            )));
        }
    }
    Ok(())
}

pub(crate) fn validate_query(query_embedding: &[f32], k: usize) -> Result<(), StoreError> {
    if query_embedding.is_empty() {
        return Err(StoreError::InvalidInput(
            "query embedding must be non-empty".to_string(),
        ));
    }
    if k == 0 {
        return Err(StoreError::InvalidInput(
            "result count must be a positive number".to_string(),
        ));
    }
    if k > MAX_SEARCH_RESULTS {
        return Err(StoreError::InvalidInput(format!(
            "result count cannot exceed {MAX_SEARCH_RESULTS}"
        )));
    }
    Ok(())
}
