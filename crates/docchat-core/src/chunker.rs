//! Line-oriented document chunking.
//!
//! Splits a document into bounded, optionally overlapping chunks for
//! embedding. Packing is greedy and line-granular: a chunk boundary always
//! falls on a line boundary, so every chunk carries a human-readable source
//! line range. A single line longer than `max_chunk_size` is never split;
//! the size bound closes the previous chunk, it is not a hard ceiling on one
//! line's own length.

use crate::error::{Error, Result};
use crate::types::{ChunkMetadata, DocumentChunk};
use std::collections::HashMap;

/// Options for one chunking call.
///
/// `max_chunk_size` bounds the accumulated content of a chunk in characters,
/// counting the line terminators added during packing. `overlap` is a
/// character budget for trailing content carried into the next chunk; it
/// must stay strictly below `max_chunk_size`.
#[derive(Debug, Clone)]
pub struct ChunkOptions {
    pub max_chunk_size: usize,
    pub overlap: usize,
}

impl Default for ChunkOptions {
    fn default() -> Self {
        Self {
            max_chunk_size: 500,
            overlap: 50,
        }
    }
}

fn validate_options(options: &ChunkOptions) -> Result<()> {
    if options.max_chunk_size == 0 {
        return Err(Error::InvalidConfig(
            "max_chunk_size must be a positive number".to_string(),
        ));
    }
    if options.overlap >= options.max_chunk_size {
        return Err(Error::InvalidConfig(
            "overlap must be less than max_chunk_size".to_string(),
        ));
    }
    Ok(())
}

/// Split `text` into ordered, bounded, overlapping chunks.
///
/// Empty (or whitespace-only) input yields an empty vec. Invalid options
/// fail with `Error::InvalidConfig` before any chunk is produced. Chunk ids
/// are `chunk-0`, `chunk-1`, ... in emission order; `metadata.source` is the
/// placeholder `"unknown"` until the caller overwrites it.
pub fn chunk_text(text: &str, options: &ChunkOptions) -> Result<Vec<DocumentChunk>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    validate_options(options)?;

    let mut chunks: Vec<DocumentChunk> = Vec::new();
    let mut current = String::new();
    let mut current_len: usize = 0;
    let mut start_line: usize = 1;
    let mut current_line: usize = 1;

    // Split purely on the separator: no line is dropped, and a trailing
    // empty line after a final newline is preserved.
    for line in text.split('\n') {
        let line_len = line.chars().count() + 1;

        if current_len + line_len > options.max_chunk_size && !current.is_empty() {
            chunks.push(make_chunk(&current, chunks.len(), start_line, current_line));

            if options.overlap > 0 {
                // Carry trailing words into the next chunk. The divisor 5
                // approximates average word length, converting the character
                // budget into a word count; the -1 keeps the carry from
                // consuming the entire buffer.
                let words: Vec<&str> = current.split(' ').collect();
                let take = options.overlap.div_ceil(5).min(words.len() - 1);
                let carried = &words[words.len() - take..];
                start_line = current_line.saturating_sub(carried.len()).max(1);
                let mut seeded = carried.join(" ");
                seeded.push(' ');
                current_len = seeded.chars().count();
                current = seeded;
            } else {
                current.clear();
                current_len = 0;
                start_line = current_line;
            }
        }

        current.push_str(line);
        current.push('\n');
        current_len += line_len;
        current_line += 1;
    }

    if !current.trim().is_empty() {
        chunks.push(make_chunk(&current, chunks.len(), start_line, current_line));
    }

    Ok(chunks)
}

fn make_chunk(
    accumulator: &str,
    index: usize,
    start_line: usize,
    current_line: usize,
) -> DocumentChunk {
    DocumentChunk {
        id: format!("chunk-{index}"),
        content: accumulator.trim().to_string(),
        metadata: ChunkMetadata {
            source: "unknown".to_string(),
            start_line,
            end_line: current_line - 1,
            extra: HashMap::new(),
        },
    }
}
