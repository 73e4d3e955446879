use std::fs;
use tempfile::TempDir;

use docchat_core::error::Error;
use docchat_core::extractor::{extract_text, is_allowed_file};

#[test]
fn extracts_content_and_line_count() {
    let tmp = TempDir::new().expect("tempdir");
    let path = tmp.path().join("notes.md");
    fs::write(&path, "# Title\n\nbody line\n").expect("write");

    let parsed = extract_text(&path).expect("extract");
    assert_eq!(parsed.source, "notes.md");
    assert_eq!(parsed.line_count, 4, "split on separator keeps trailing line");
    assert!(parsed.content.starts_with("# Title"));
}

#[test]
fn uppercase_extension_is_accepted() {
    let tmp = TempDir::new().expect("tempdir");
    let path = tmp.path().join("README.MD");
    fs::write(&path, "hello").expect("write");

    let parsed = extract_text(&path).expect("extract");
    assert_eq!(parsed.source, "README.MD");
    assert_eq!(parsed.line_count, 1);
}

#[test]
fn unsupported_extension_is_rejected() {
    let tmp = TempDir::new().expect("tempdir");
    let path = tmp.path().join("report.pdf");
    fs::write(&path, "%PDF-1.4").expect("write");

    let err = extract_text(&path).expect_err("must fail");
    assert!(matches!(err, Error::UnsupportedDocument(_)));
}

#[test]
fn empty_file_reports_zero_lines() {
    let tmp = TempDir::new().expect("tempdir");
    let path = tmp.path().join("blank.txt");
    fs::write(&path, "   \n  \n").expect("write");

    let parsed = extract_text(&path).expect("extract");
    assert!(parsed.content.is_empty());
    assert_eq!(parsed.line_count, 0);
}

#[test]
fn allowed_file_filter_matches_ingestable_extensions() {
    use std::path::Path;
    assert!(is_allowed_file(Path::new("a.md")));
    assert!(is_allowed_file(Path::new("a.markdown")));
    assert!(is_allowed_file(Path::new("a.txt")));
    assert!(is_allowed_file(Path::new("a.text")));
    assert!(!is_allowed_file(Path::new("a.pdf")));
    assert!(!is_allowed_file(Path::new("noext")));
}
