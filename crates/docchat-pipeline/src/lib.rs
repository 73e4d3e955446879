//! Ingestion and retrieval orchestration.
//!
//! `IngestPipeline` runs extract -> chunk -> embed -> store for one document;
//! `ChatEngine` grounds a completion in the nearest stored chunks. Both own
//! their collaborators explicitly; nothing here keeps global state.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::info;

use docchat_chat::{build_context, system_prompt};
use docchat_core::chunker::{chunk_text, ChunkOptions};
use docchat_core::extractor::{extract_text, is_allowed_file};
use docchat_core::traits::{ChatProvider, EmbeddingProvider, VectorStore};
use docchat_core::types::{ChatMessage, DocumentChunk, Role};

/// Chunks retrieved per question.
pub const DEFAULT_TOP_K: usize = 5;

#[derive(Debug, Clone)]
pub struct IngestReport {
    pub source: String,
    pub chunk_count: usize,
}

#[derive(Debug, Clone)]
pub struct ChatReply {
    pub response: String,
    /// Retrieved chunks in rank order, best first.
    pub sources: Vec<DocumentChunk>,
}

pub struct IngestPipeline<V: VectorStore> {
    embedder: Box<dyn EmbeddingProvider>,
    store: V,
    options: ChunkOptions,
}

impl<V: VectorStore> IngestPipeline<V> {
    pub fn new(embedder: Box<dyn EmbeddingProvider>, store: V, options: ChunkOptions) -> Self {
        Self {
            embedder,
            store,
            options,
        }
    }

    /// Ingest a single document: extract, chunk, stamp the source name onto
    /// every chunk, embed the ordered contents, and store the pairs.
    ///
    /// An empty document yields a zero-chunk report without touching the
    /// embedding or store collaborators.
    pub async fn ingest_file(&self, path: &Path) -> Result<IngestReport> {
        let parsed = extract_text(path)?;
        if parsed.content.trim().is_empty() {
            info!("'{}' is empty, nothing to ingest", parsed.source);
            return Ok(IngestReport {
                source: parsed.source,
                chunk_count: 0,
            });
        }

        let mut chunks = chunk_text(&parsed.content, &self.options)?;
        // The chunker writes a placeholder source; this is the one permitted
        // post-creation metadata overwrite.
        for chunk in &mut chunks {
            chunk.metadata.source = parsed.source.clone();
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;
        if embeddings.len() != chunks.len() {
            anyhow::bail!(
                "embedding count mismatch: expected {}, got {}",
                chunks.len(),
                embeddings.len()
            );
        }

        self.store.store(&chunks, &embeddings).await?;
        info!("ingested '{}' as {} chunks", parsed.source, chunks.len());
        Ok(IngestReport {
            source: parsed.source,
            chunk_count: chunks.len(),
        })
    }
}

pub struct ChatEngine<V: VectorStore, C: ChatProvider> {
    embedder: Box<dyn EmbeddingProvider>,
    store: V,
    chat: C,
    top_k: usize,
}

impl<V: VectorStore, C: ChatProvider> ChatEngine<V, C> {
    pub fn new(embedder: Box<dyn EmbeddingProvider>, store: V, chat: C) -> Self {
        Self {
            embedder,
            store,
            chat,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Answer the conversation's final user message, grounded in retrieved
    /// chunks. The conversation must end with a user turn.
    pub async fn answer(&self, messages: &[ChatMessage]) -> Result<ChatReply> {
        let last = messages
            .last()
            .filter(|m| m.role == Role::User)
            .ok_or_else(|| anyhow::anyhow!("conversation must end with a user message"))?;

        let query_embedding = self.embedder.embed(&last.content).await?;
        let results = self.store.search(&query_embedding, self.top_k).await?;
        info!("retrieved {} chunks for grounding", results.len());

        let context = build_context(&results);
        let mut prompt_messages = Vec::with_capacity(messages.len() + 1);
        prompt_messages.push(ChatMessage {
            role: Role::System,
            content: system_prompt(&context),
        });
        prompt_messages.extend_from_slice(messages);

        let response = self.chat.complete(&prompt_messages).await?;
        let sources = results.into_iter().map(|r| r.chunk).collect();
        Ok(ChatReply { response, sources })
    }
}

/// All ingestable files under `root`, sorted for deterministic runs.
pub fn list_documents(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = walkdir::WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter(|e| is_allowed_file(e.path()))
        .map(|e| e.path().to_path_buf())
        .collect();
    files.sort();
    files
}
