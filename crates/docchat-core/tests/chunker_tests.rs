use docchat_core::chunker::{chunk_text, ChunkOptions};
use docchat_core::error::Error;

fn opts(max_chunk_size: usize, overlap: usize) -> ChunkOptions {
    ChunkOptions {
        max_chunk_size,
        overlap,
    }
}

#[test]
fn empty_and_whitespace_input_yield_no_chunks() {
    let chunks = chunk_text("", &opts(100, 10)).expect("chunk");
    assert!(chunks.is_empty());

    let chunks = chunk_text("   \n\n  ", &opts(100, 10)).expect("chunk");
    assert!(chunks.is_empty());
}

#[test]
fn size_bound_respected_on_multiline_input() {
    let text = "a line of text\n".repeat(100);
    let chunks = chunk_text(&text, &opts(100, 0)).expect("chunk");

    assert!(chunks.len() > 1, "100 lines of 15 chars exceed one chunk");
    for c in &chunks {
        assert!(c.content.chars().count() <= 100, "chunk '{}' too long", c.id);
    }
}

#[test]
fn line_ranges_contiguous_without_overlap() {
    let text = "line1\nline2\nline3\nline4\nline5";
    let chunks = chunk_text(text, &opts(20, 0)).expect("chunk");

    assert!(chunks.len() > 1);
    assert_eq!(chunks[0].metadata.start_line, 1);
    for pair in chunks.windows(2) {
        assert_eq!(
            pair[1].metadata.start_line,
            pair[0].metadata.end_line + 1,
            "ranges must be contiguous"
        );
    }
    assert_eq!(chunks.last().map(|c| c.metadata.end_line), Some(5));
}

#[test]
fn start_lines_never_below_one_with_overlap() {
    let text = "alpha beta gamma delta epsilon\n".repeat(20);
    let chunks = chunk_text(&text, &opts(60, 40)).expect("chunk");

    assert!(chunks.len() > 1);
    for c in &chunks {
        assert!(c.metadata.start_line >= 1);
        assert!(c.metadata.start_line <= c.metadata.end_line);
    }
}

#[test]
fn ids_are_sequential_and_unique() {
    let text = "one line\n".repeat(50);
    let chunks = chunk_text(&text, &opts(40, 0)).expect("chunk");

    assert!(chunks.len() > 1);
    for (i, c) in chunks.iter().enumerate() {
        assert_eq!(c.id, format!("chunk-{i}"));
    }
}

#[test]
fn short_input_yields_single_chunk() {
    let chunks = chunk_text("short text", &opts(500, 50)).expect("chunk");

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].content, "short text");
    assert_eq!(chunks[0].metadata.start_line, 1);
    assert_eq!(chunks[0].metadata.end_line, 1);
    assert_eq!(chunks[0].metadata.source, "unknown");
}

#[test]
fn over_long_line_is_never_split() {
    let long_line = "x".repeat(1000);
    let chunks = chunk_text(&long_line, &opts(10, 0)).expect("chunk");

    assert_eq!(chunks.len(), 1, "a single line is appended whole");
    assert_eq!(chunks[0].content, long_line);
}

#[test]
fn overlap_carries_trailing_words_into_next_chunk() {
    // Each 31-char line closes the 60-char chunk; overlap 10 -> carry 2 words.
    let text = "alpha beta gamma delta epsilon\n".repeat(4);
    let chunks = chunk_text(&text, &opts(60, 10)).expect("chunk");

    assert!(chunks.len() > 1);
    assert!(
        chunks[1].content.starts_with("delta epsilon"),
        "second chunk should open with the carried words, got '{}'",
        chunks[1].content
    );
}

#[test]
fn zero_max_chunk_size_is_rejected() {
    let err = chunk_text("x", &opts(0, 0)).expect_err("must fail");
    assert!(matches!(err, Error::InvalidConfig(_)));
    assert!(err.to_string().contains("max_chunk_size must be a positive number"));
}

#[test]
fn overlap_not_below_max_chunk_size_is_rejected() {
    let err = chunk_text("x", &opts(10, 10)).expect_err("must fail");
    assert!(matches!(err, Error::InvalidConfig(_)));
    assert!(err.to_string().contains("overlap must be less than max_chunk_size"));
}

#[test]
fn default_options_match_ingestion_call_site() {
    let d = ChunkOptions::default();
    assert_eq!(d.max_chunk_size, 500);
    assert_eq!(d.overlap, 50);
}

#[test]
fn trailing_newline_preserves_empty_last_line() {
    // Split is purely on the separator, so "a\n" has a trailing empty line
    // and the final chunk's end_line accounts for it.
    let chunks = chunk_text("a\n", &opts(100, 0)).expect("chunk");
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].content, "a");
    assert_eq!(chunks[0].metadata.end_line, 2);
}
