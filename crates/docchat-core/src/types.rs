//! Domain types shared by the ingestion and retrieval pipelines.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub type ChunkId = String;

/// A bounded slice of a source document, the atomic unit of embedding
/// and retrieval.
///
/// - `id`: unique within one chunking invocation (`chunk-0`, `chunk-1`, ...)
/// - `content`: chunk text, trimmed, never empty
/// - `metadata`: source document name and 1-based line range
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub id: ChunkId,
    pub content: String,
    pub metadata: ChunkMetadata,
}

/// Positional metadata attached to every chunk.
///
/// `source` is written as a placeholder by the chunker and overwritten by
/// the ingestion pipeline once the document name is known. `start_line` and
/// `end_line` are 1-based and inclusive. Callers may attach further keys via
/// `extra`; they ride along unconstrained.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub source: String,
    pub start_line: usize,
    pub end_line: usize,
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// A retrieved chunk with its distance to the query embedding.
/// Lower scores rank better.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub chunk: DocumentChunk,
    pub score: f32,
}

/// A chat conversation turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// Output of the file text extractor.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub content: String,
    pub source: String,
    pub line_count: usize,
}
