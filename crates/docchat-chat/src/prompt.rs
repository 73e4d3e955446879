//! Grounding-prompt assembly.

use docchat_core::types::SearchResult;

/// Render retrieved chunks into the context block shown to the model, one
/// `Source:` header per chunk, separated by `---` rules.
pub fn build_context(results: &[SearchResult]) -> String {
    results
        .iter()
        .map(|r| format!("Source: {}\n{}", r.chunk.metadata.source, r.chunk.content))
        .collect::<Vec<_>>()
        .join("\n\n---\n\n")
}

/// The system prompt that instructs the model to answer only from the
/// provided context.
pub fn system_prompt(context: &str) -> String {
    format!(
        "You are a helpful assistant that answers questions based on the provided documentation.\n\
         Use the following context to answer the user's question. If the context doesn't contain the answer, say so.\n\
         \n\
         Context:\n\
         {context}"
    )
}
