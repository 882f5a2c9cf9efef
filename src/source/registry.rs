use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::debug;

use super::{FormFeedSource, JsonPagesSource, PageSource};
use crate::chunker::Page;
use crate::error::Result;

/// Extension-based dispatch to page sources
pub struct SourceRegistry {
    /// Used for extensions with no registered source
    fallback: Box<dyn PageSource>,
    /// Extension -> source mapping
    map: HashMap<String, Box<dyn PageSource>>,
}

impl SourceRegistry {
    /// Registry with the built-in text and JSON sources
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register("txt", FormFeedSource);
        registry.register("text", FormFeedSource);
        registry.register("json", JsonPagesSource);
        registry
    }

    /// Registry with only the form feed fallback
    pub fn empty() -> Self {
        Self {
            fallback: Box::new(FormFeedSource),
            map: HashMap::new(),
        }
    }

    /// Register a source for a file extension (without the dot)
    pub fn register(&mut self, extension: impl Into<String>, source: impl PageSource + 'static) {
        self.map
            .insert(extension.into().to_lowercase(), Box::new(source));
    }

    /// Pick the source for a path, falling back to form feed text
    pub fn select(&self, path: &str) -> &dyn PageSource {
        let ext = extension_of(path);
        self.map.get(&ext).map(|s| &**s).unwrap_or(&*self.fallback)
    }

    /// Whether a dedicated source exists for this path's extension
    pub fn supports(&self, path: &Path) -> bool {
        self.map.contains_key(&extension_of(&path.to_string_lossy()))
    }

    pub fn source_count(&self) -> usize {
        self.map.len()
    }

    pub fn registered_extensions(&self) -> Vec<&str> {
        let mut extensions: Vec<&str> = self.map.keys().map(|s| s.as_str()).collect();
        extensions.sort_unstable();
        extensions
    }

    /// Read a file and extract its pages
    pub fn load(&self, path: &Path) -> Result<Vec<Page>> {
        let bytes = fs::read(path)?;
        let shown = path.to_string_lossy();
        let pages = self.select(&shown).pages(&shown, &bytes)?;
        debug!(path = %shown, pages = pages.len(), "loaded document");
        Ok(pages)
    }
}

impl Default for SourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn extension_of(path: &str) -> String {
    Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .unwrap_or_default()
}
