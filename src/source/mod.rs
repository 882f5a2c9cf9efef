mod discover;
mod form_feed;
mod json_pages;
mod registry;

#[cfg(test)]
mod tests;

pub use discover::discover_documents;
pub use form_feed::{FormFeedSource, PAGE_BREAK};
pub use json_pages::JsonPagesSource;
pub use registry::SourceRegistry;

use crate::chunker::Page;
use crate::error::Result;

/// Turns raw document bytes into ordered pages
pub trait PageSource: Send + Sync {
    /// Extract pages from a document
    ///
    /// # Arguments
    /// * `path` - Path the bytes were read from, used in error messages
    /// * `bytes` - Raw file contents
    ///
    /// # Returns
    /// Pages in ascending page order
    fn pages(&self, path: &str, bytes: &[u8]) -> Result<Vec<Page>>;
}
