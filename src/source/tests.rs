use super::*;
use crate::chunker::Page;
use crate::error::ChunkError;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

// ========================================================================
// FormFeedSource
// ========================================================================

#[test]
fn test_form_feed_splits_pages() {
    let pages = FormFeedSource
        .pages("doc.txt", b"First page.\x0cSecond page.\x0cThird page.")
        .unwrap();

    assert_eq!(
        pages,
        vec![
            Page::new(1, "First page."),
            Page::new(2, "Second page."),
            Page::new(3, "Third page."),
        ]
    );
}

#[test]
fn test_form_feed_trailing_break() {
    let pages = FormFeedSource.pages("doc.txt", b"One.\x0cTwo.\x0c\n").unwrap();
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[1].page_number, 2);
}

#[test]
fn test_form_feed_keeps_blank_inner_pages() {
    let pages = FormFeedSource.pages("doc.txt", b"One.\x0c\x0cThree.").unwrap();
    assert_eq!(pages.len(), 3);
    assert_eq!(pages[2], Page::new(3, "Three."));
}

#[test]
fn test_form_feed_without_breaks_is_one_page() {
    let pages = FormFeedSource.pages("doc.txt", b"No breaks here").unwrap();
    assert_eq!(pages, vec![Page::new(1, "No breaks here")]);
}

#[test]
fn test_form_feed_empty_file() {
    assert!(FormFeedSource.pages("doc.txt", b"").unwrap().is_empty());
}

#[test]
fn test_form_feed_rejects_invalid_utf8() {
    let result = FormFeedSource.pages("doc.txt", &[0xFF, 0xFE, 0x00]);
    assert!(matches!(result, Err(ChunkError::MalformedSource { .. })));
}

// ========================================================================
// JsonPagesSource
// ========================================================================

#[test]
fn test_json_bare_array() {
    let json = br#"[{"page_number": 1, "text": "a"}, {"page_number": 3, "text": "b"}]"#;
    let pages = JsonPagesSource.pages("doc.json", json).unwrap();
    assert_eq!(pages, vec![Page::new(1, "a"), Page::new(3, "b")]);
}

#[test]
fn test_json_wrapped() {
    let json = br#"{"pages": [{"page_number": 2, "text": "only"}]}"#;
    let pages = JsonPagesSource.pages("doc.json", json).unwrap();
    assert_eq!(pages, vec![Page::new(2, "only")]);
}

#[test]
fn test_json_missing_text_is_invalid_input() {
    let json = br#"[{"page_number": 1}]"#;
    let result = JsonPagesSource.pages("doc.json", json);
    assert!(matches!(result, Err(ChunkError::InvalidInput(_))));
}

#[test]
fn test_json_zero_page_number_is_invalid_input() {
    let json = br#"[{"page_number": 0, "text": "x"}]"#;
    let result = JsonPagesSource.pages("doc.json", json);
    assert!(matches!(result, Err(ChunkError::InvalidInput(_))));
}

#[test]
fn test_json_syntax_error_is_malformed() {
    let result = JsonPagesSource.pages("doc.json", b"[{not json");
    assert!(matches!(result, Err(ChunkError::MalformedSource { .. })));
}

// ========================================================================
// SourceRegistry
// ========================================================================

#[test]
fn test_registry_defaults() {
    let registry = SourceRegistry::new();
    assert_eq!(registry.source_count(), 3);
    assert_eq!(registry.registered_extensions(), vec!["json", "text", "txt"]);
    assert!(registry.supports(Path::new("notes/book.TXT")));
    assert!(!registry.supports(Path::new("image.png")));
}

#[test]
fn test_registry_selects_by_extension() {
    let registry = SourceRegistry::new();

    let pages = registry
        .select("pages.json")
        .pages("pages.json", br#"[{"page_number": 1, "text": "hi"}]"#)
        .unwrap();
    assert_eq!(pages, vec![Page::new(1, "hi")]);

    // Unknown extension falls back to form feed text
    let pages = registry.select("notes.md").pages("notes.md", b"hi").unwrap();
    assert_eq!(pages, vec![Page::new(1, "hi")]);
}

#[test]
fn test_registry_custom_source() {
    struct Upper;
    impl PageSource for Upper {
        fn pages(&self, _path: &str, bytes: &[u8]) -> crate::error::Result<Vec<Page>> {
            Ok(vec![Page::new(1, String::from_utf8_lossy(bytes).to_uppercase())])
        }
    }

    let mut registry = SourceRegistry::empty();
    registry.register("UP", Upper);

    assert_eq!(registry.registered_extensions(), vec!["up"]);
    let pages = registry.select("x.up").pages("x.up", b"abc").unwrap();
    assert_eq!(pages[0].text, "ABC");
}

#[test]
fn test_registry_load_from_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("book.txt");
    fs::write(&path, "Page one.\x0cPage two.").unwrap();

    let pages = SourceRegistry::new().load(&path).unwrap();
    assert_eq!(pages.len(), 2);
}

#[test]
fn test_registry_load_missing_file() {
    let dir = tempdir().unwrap();
    let result = SourceRegistry::new().load(&dir.path().join("nope.txt"));
    assert!(matches!(result, Err(ChunkError::Io(_))));
}

// ========================================================================
// discover_documents
// ========================================================================

#[test]
fn test_discover_walks_and_filters() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("nested")).unwrap();
    fs::create_dir_all(root.join(".hidden")).unwrap();
    fs::create_dir_all(root.join("target")).unwrap();

    fs::write(root.join("b.txt"), "b").unwrap();
    fs::write(root.join("a.json"), "[]").unwrap();
    fs::write(root.join("nested/c.txt"), "c").unwrap();
    fs::write(root.join("image.png"), [0u8; 4]).unwrap();
    fs::write(root.join(".hidden/d.txt"), "d").unwrap();
    fs::write(root.join("target/e.txt"), "e").unwrap();

    let found = discover_documents(root, &SourceRegistry::new()).unwrap();
    let names: Vec<String> = found
        .iter()
        .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
        .collect();

    assert_eq!(names, vec!["a.json", "b.txt", "nested/c.txt"]);
}

#[test]
fn test_discover_single_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("only.md");
    fs::write(&path, "x").unwrap();

    let found = discover_documents(&path, &SourceRegistry::new()).unwrap();
    assert_eq!(found, vec![path]);
}
