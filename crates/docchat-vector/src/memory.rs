//! In-memory brute-force store.

use async_trait::async_trait;
use std::sync::Mutex;

use docchat_core::traits::VectorStore;
use docchat_core::types::{DocumentChunk, SearchResult};

use crate::{validate_batch, validate_query, StoreError};

/// Keeps chunk/embedding pairs in memory and answers queries by exhaustive
/// cosine-distance scan. Same validation rules as the HTTP adapter, so
/// pipeline tests exercise the real contract.
#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<Vec<(DocumentChunk, Vec<f32>)>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        match self.rows.lock() {
            Ok(rows) => rows.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Cosine distance: 0.0 for identical directions, up to 2.0 for opposite.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let na: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    1.0 - dot / (na * nb).max(1e-12)
}

#[async_trait]
impl VectorStore for MemoryStore {
    async fn store(&self, chunks: &[DocumentChunk], embeddings: &[Vec<f32>]) -> anyhow::Result<()> {
        validate_batch(chunks, embeddings)?;
        let mut rows = match self.rows.lock() {
            Ok(rows) => rows,
            Err(poisoned) => poisoned.into_inner(),
        };
        for (chunk, embedding) in chunks.iter().zip(embeddings) {
            rows.push((chunk.clone(), embedding.clone()));
        }
        Ok(())
    }

    async fn search(
        &self,
        query_embedding: &[f32],
        k: usize,
    ) -> anyhow::Result<Vec<SearchResult>> {
        validate_query(query_embedding, k)?;
        let rows = match self.rows.lock() {
            Ok(rows) => rows,
            Err(poisoned) => poisoned.into_inner(),
        };
        for (_, embedding) in rows.iter() {
            if embedding.len() != query_embedding.len() {
                return Err(StoreError::InvalidInput(format!(
                    "query dimension {} does not match stored dimension {}",
                    query_embedding.len(),
                    embedding.len()
                ))
                .into());
            }
        }
        let mut results: Vec<SearchResult> = rows
            .iter()
            .map(|(chunk, embedding)| SearchResult {
                chunk: chunk.clone(),
                score: cosine_distance(query_embedding, embedding),
            })
            .collect();
        results.sort_by(|a, b| {
            a.score
                .partial_cmp(&b.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        results.truncate(k);
        Ok(results)
    }
}
