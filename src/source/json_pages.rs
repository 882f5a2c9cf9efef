use serde::Deserialize;

use super::PageSource;
use crate::chunker::{Page, RawPage};
use crate::error::{ChunkError, Result};

/// JSON page records, either a bare array or wrapped in `{"pages": [...]}`
pub struct JsonPagesSource;

#[derive(Deserialize)]
#[serde(untagged)]
enum PagesDocument {
    Bare(Vec<RawPage>),
    Wrapped { pages: Vec<RawPage> },
}

impl PageSource for JsonPagesSource {
    fn pages(&self, path: &str, bytes: &[u8]) -> Result<Vec<Page>> {
        let document: PagesDocument =
            serde_json::from_slice(bytes).map_err(|e| ChunkError::MalformedSource {
                path: path.to_string(),
                reason: e.to_string(),
            })?;

        let raw = match document {
            PagesDocument::Bare(pages) | PagesDocument::Wrapped { pages } => pages,
        };

        raw.into_iter().map(Page::try_from).collect()
    }
}
