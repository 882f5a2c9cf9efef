use serde::Serialize;

use crate::chunker::Chunk;

/// Summary of one chunking run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChunkReport {
    pub chunk_count: usize,
    pub total_tokens: usize,
    pub avg_tokens: f64,
    pub max_tokens_seen: usize,
    /// Chunks holding a single unit larger than the budget
    pub over_budget: usize,
    pub first_page: Option<u32>,
    pub last_page: Option<u32>,
}

impl ChunkReport {
    pub fn from_chunks(chunks: &[Chunk], max_tokens: usize) -> Self {
        if chunks.is_empty() {
            return Self::default();
        }

        let total_tokens: usize = chunks.iter().map(|c| c.token_count).sum();

        Self {
            chunk_count: chunks.len(),
            total_tokens,
            avg_tokens: total_tokens as f64 / chunks.len() as f64,
            max_tokens_seen: chunks.iter().map(|c| c.token_count).max().unwrap_or(0),
            over_budget: chunks.iter().filter(|c| c.token_count > max_tokens).count(),
            first_page: chunks.iter().map(|c| c.start_page).min(),
            last_page: chunks.iter().map(|c| c.end_page).max(),
        }
    }
}
