mod assembler;
mod estimator;
mod packer;
mod sentence;
mod types;


pub use assembler::{assemble_chunks, Assembler};
pub use estimator::{estimate_tokens, CharRatioEstimator, TokenEstimator};
pub use sentence::split_into_sentences;
pub use types::{Chunk, Page, RawPage, Unit};

/// 1-based position of a chunk within one run
pub type ChunkOrder = usize;

/// Maximum estimated tokens per chunk
pub const DEFAULT_MAX_TOKENS: usize = 700;

/// Trailing units carried from one chunk into the next
pub const DEFAULT_OVERLAP_UNITS: usize = 1;
