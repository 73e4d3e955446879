use std::collections::HashMap;

use docchat_core::traits::VectorStore;
use docchat_core::types::{ChunkMetadata, DocumentChunk};
use docchat_vector::memory::cosine_distance;
use docchat_vector::MemoryStore;

fn chunk(id: &str, content: &str) -> DocumentChunk {
    DocumentChunk {
        id: id.to_string(),
        content: content.to_string(),
        metadata: ChunkMetadata {
            source: "test.md".to_string(),
            start_line: 1,
            end_line: 1,
            extra: HashMap::new(),
        },
    }
}

#[tokio::test]
async fn store_rejects_length_mismatch() {
    let store = MemoryStore::new();
    let chunks = vec![chunk("chunk-0", "a"), chunk("chunk-1", "b")];
    let embeddings = vec![vec![1.0, 0.0]];

    let err = store.store(&chunks, &embeddings).await.expect_err("must fail");
    assert!(err.to_string().contains("2 chunks but 1 embeddings"));
    assert!(store.is_empty(), "nothing may be written on failure");
}

#[tokio::test]
async fn store_rejects_empty_batches() {
    let store = MemoryStore::new();
    let err = store.store(&[], &[]).await.expect_err("must fail");
    assert!(err.to_string().contains("non-empty"));
}

#[tokio::test]
async fn search_ranks_exact_match_first() {
    let store = MemoryStore::new();
    let chunks = vec![
        chunk("chunk-0", "north"),
        chunk("chunk-1", "east"),
        chunk("chunk-2", "diagonal"),
    ];
    let embeddings = vec![
        vec![1.0, 0.0, 0.0],
        vec![0.0, 1.0, 0.0],
        vec![0.7, 0.7, 0.0],
    ];
    store.store(&chunks, &embeddings).await.expect("store");
    assert_eq!(store.len(), 3);

    let results = store.search(&[0.0, 1.0, 0.0], 2).await.expect("search");
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].chunk.id, "chunk-1");
    assert!(results[0].score < results[1].score, "ranked by ascending distance");
}

#[tokio::test]
async fn search_rejects_bad_arguments() {
    let store = MemoryStore::new();
    store
        .store(&[chunk("chunk-0", "x")], &[vec![1.0]])
        .await
        .expect("store");

    assert!(store.search(&[], 5).await.is_err(), "empty query embedding");
    assert!(store.search(&[1.0], 0).await.is_err(), "k must be positive");
    assert!(store.search(&[1.0], 101).await.is_err(), "k capped at 100");
    assert!(
        store.search(&[1.0, 2.0], 5).await.is_err(),
        "dimension mismatch"
    );
}

#[test]
fn cosine_distance_extremes() {
    assert!(cosine_distance(&[1.0, 0.0], &[1.0, 0.0]).abs() < 1e-6);
    assert!((cosine_distance(&[1.0, 0.0], &[-1.0, 0.0]) - 2.0).abs() < 1e-6);
    assert!((cosine_distance(&[1.0, 0.0], &[0.0, 1.0]) - 1.0).abs() < 1e-6);
}
