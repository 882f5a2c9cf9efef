use super::PageSource;
use crate::chunker::Page;
use crate::error::{ChunkError, Result};

/// Page separator emitted by plain-text PDF extractors
pub const PAGE_BREAK: char = '\x0c';

/// Plain UTF-8 text with pages separated by form feeds.
///
/// Text without any form feed is a single page.
pub struct FormFeedSource;

impl PageSource for FormFeedSource {
    fn pages(&self, path: &str, bytes: &[u8]) -> Result<Vec<Page>> {
        let text = std::str::from_utf8(bytes).map_err(|e| ChunkError::MalformedSource {
            path: path.to_string(),
            reason: format!("not valid UTF-8: {}", e),
        })?;

        if text.is_empty() {
            return Ok(vec![]);
        }

        let mut segments: Vec<&str> = text.split(PAGE_BREAK).collect();

        // A trailing break closes the last page rather than opening a new one
        if segments.len() > 1 && segments.last().is_some_and(|s| s.trim().is_empty()) {
            segments.pop();
        }

        Ok(segments
            .into_iter()
            .zip(1u32..)
            .map(|(segment, page_number)| Page::new(page_number, segment))
            .collect())
    }
}
