//! Plain-text and markdown file extraction.

use crate::error::{Error, Result};
use crate::types::ParsedDocument;
use std::fs;
use std::path::Path;

const ALLOWED_EXTENSIONS: &[&str] = &["md", "txt", "markdown", "text"];

/// True when the file name carries an extension this system ingests.
pub fn is_allowed_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .is_some_and(|e| ALLOWED_EXTENSIONS.contains(&e.as_str()))
}

/// Read a document from disk, producing its raw text plus source metadata.
///
/// The returned `source` is the file name (final path component); the
/// pipeline stamps it onto every chunk after chunking. A file that is empty
/// after trimming yields empty `content` and `line_count == 0` rather than
/// an error.
pub fn extract_text(path: &Path) -> Result<ParsedDocument> {
    let source = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    if source.trim().is_empty() {
        return Err(Error::UnsupportedDocument(
            "file name cannot be empty".to_string(),
        ));
    }
    if !is_allowed_file(path) {
        return Err(Error::UnsupportedDocument(format!(
            "unsupported file extension for '{source}'; allowed: .md, .txt, .markdown, .text"
        )));
    }

    let content = read_file_content(path)?;
    if content.trim().is_empty() {
        return Ok(ParsedDocument {
            content: String::new(),
            source,
            line_count: 0,
        });
    }

    let line_count = content.split('\n').count();
    Ok(ParsedDocument {
        content,
        source,
        line_count,
    })
}

fn read_file_content(path: &Path) -> Result<String> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(content),
        Err(_) => Ok(String::from_utf8_lossy(&fs::read(path)?).to_string()),
    }
}
