//! Chroma HTTP adapter.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use docchat_core::traits::VectorStore;
use docchat_core::types::{ChunkMetadata, DocumentChunk, SearchResult};

use crate::{validate_batch, validate_query, StoreError};

/// Adapter around a Chroma-style vector database. The collection is
/// resolved (get-or-create by name) once at connect time; `store` and
/// `search` then address it by id.
pub struct ChromaStore {
    client: reqwest::Client,
    base_url: String,
    collection_id: String,
}

#[derive(Deserialize)]
struct CollectionResponse {
    id: String,
}

#[derive(Deserialize)]
struct QueryResponse {
    ids: Option<Vec<Vec<String>>>,
    documents: Option<Vec<Vec<String>>>,
    metadatas: Option<Vec<Vec<serde_json::Value>>>,
    distances: Option<Vec<Vec<f32>>>,
}

impl ChromaStore {
    /// Connect to the service at `base_url` and get-or-create `collection`.
    pub async fn connect(base_url: &str, collection: &str) -> Result<Self, StoreError> {
        if base_url.trim().is_empty() {
            return Err(StoreError::InvalidInput(
                "vector store url cannot be empty".to_string(),
            ));
        }
        if collection.trim().is_empty() {
            return Err(StoreError::InvalidInput(
                "collection name cannot be empty".to_string(),
            ));
        }

        let base_url = base_url.trim_end_matches('/').to_string();
        let client = reqwest::Client::new();
        let url = format!("{base_url}/api/v1/collections");
        debug!("resolving collection '{}' at {}", collection, url);

        let response = client
            .post(&url)
            .json(&serde_json::json!({
                "name": collection,
                "get_or_create": true,
            }))
            .send()
            .await?;

        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Api { status, body });
        }
        let resolved: CollectionResponse = response.json().await?;

        Ok(Self {
            client,
            base_url,
            collection_id: resolved.id,
        })
    }

    async fn post_json(
        &self,
        endpoint: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response, StoreError> {
        let url = format!(
            "{}/api/v1/collections/{}/{}",
            self.base_url, self.collection_id, endpoint
        );
        debug!("vector store request to {}", url);
        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Api { status, body });
        }
        Ok(response)
    }

    async fn add(
        &self,
        chunks: &[DocumentChunk],
        embeddings: &[Vec<f32>],
    ) -> Result<(), StoreError> {
        validate_batch(chunks, embeddings)?;

        let metadatas = chunks
            .iter()
            .map(|c| serde_json::to_value(&c.metadata))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| StoreError::InvalidInput(format!("unserializable metadata: {e}")))?;

        let body = serde_json::json!({
            "ids": chunks.iter().map(|c| c.id.as_str()).collect::<Vec<_>>(),
            "documents": chunks.iter().map(|c| c.content.as_str()).collect::<Vec<_>>(),
            "metadatas": metadatas,
            "embeddings": embeddings,
        });
        self.post_json("add", &body).await?;
        Ok(())
    }

    async fn query(
        &self,
        query_embedding: &[f32],
        k: usize,
    ) -> Result<Vec<SearchResult>, StoreError> {
        validate_query(query_embedding, k)?;

        let body = serde_json::json!({
            "query_embeddings": [query_embedding],
            "n_results": k,
            "include": ["documents", "metadatas", "distances"],
        });
        let response = self.post_json("query", &body).await?;
        let parsed: QueryResponse = response.json().await?;

        // Results come back as parallel arrays, one row per query embedding.
        let ids = first_row(parsed.ids, "ids")?;
        let documents = first_row(parsed.documents, "documents")?;
        let metadatas = first_row(parsed.metadatas, "metadatas")?;
        let distances = first_row(parsed.distances, "distances")?;

        if ids.len() != documents.len()
            || ids.len() != metadatas.len()
            || ids.len() != distances.len()
        {
            return Err(StoreError::BadResponse(
                "inconsistent result array lengths".to_string(),
            ));
        }

        let mut results = Vec::with_capacity(ids.len());
        for (((id, content), metadata), score) in ids
            .into_iter()
            .zip(documents)
            .zip(metadatas)
            .zip(distances)
        {
            let metadata: ChunkMetadata = serde_json::from_value(metadata)
                .map_err(|e| StoreError::BadResponse(format!("malformed metadata: {e}")))?;
            results.push(SearchResult {
                chunk: DocumentChunk {
                    id,
                    content,
                    metadata,
                },
                score,
            });
        }
        Ok(results)
    }
}

fn first_row<T>(rows: Option<Vec<Vec<T>>>, field: &str) -> Result<Vec<T>, StoreError> {
    rows.and_then(|mut r| {
        if r.is_empty() {
            None
        } else {
            Some(r.remove(0))
        }
    })
    .ok_or_else(|| StoreError::BadResponse(format!("missing {field}")))
}

#[async_trait]
impl VectorStore for ChromaStore {
    async fn store(&self, chunks: &[DocumentChunk], embeddings: &[Vec<f32>]) -> anyhow::Result<()> {
        Ok(self.add(chunks, embeddings).await?)
    }

    async fn search(
        &self,
        query_embedding: &[f32],
        k: usize,
    ) -> anyhow::Result<Vec<SearchResult>> {
        Ok(self.query(query_embedding, k).await?)
    }
}
