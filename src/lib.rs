// Public API exports
pub mod chunker;
pub mod config;
pub mod error;
pub mod report;
pub mod source;
pub mod store;

// Re-export main types for convenience
pub use chunker::{
    assemble_chunks, estimate_tokens, split_into_sentences, Assembler, CharRatioEstimator, Chunk,
    ChunkOrder, Page, RawPage, TokenEstimator, Unit, DEFAULT_MAX_TOKENS, DEFAULT_OVERLAP_UNITS,
};

pub use config::{ChunkerConfig, ConfigOverrides, OversizedPagePolicy};
pub use error::{ChunkError, Result};

pub use report::ChunkReport;

pub use source::{
    discover_documents, FormFeedSource, JsonPagesSource, PageSource, SourceRegistry, PAGE_BREAK,
};

pub use store::{content_hash, ChunkStore, DocumentRecord, StoreStats};
