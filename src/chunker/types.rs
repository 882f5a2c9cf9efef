use serde::{Deserialize, Serialize};

use super::ChunkOrder;
use crate::error::{ChunkError, Result};

/// One page of extracted document text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    /// 1-based page number from the source document
    pub page_number: u32,
    /// Extracted text of the page
    pub text: String,
}

impl Page {
    pub fn new(page_number: u32, text: impl Into<String>) -> Self {
        Self {
            page_number,
            text: text.into(),
        }
    }
}

/// A page record as it arrives from an untrusted source, before validation
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawPage {
    pub page_number: Option<i64>,
    pub text: Option<String>,
}

impl TryFrom<RawPage> for Page {
    type Error = ChunkError;

    fn try_from(raw: RawPage) -> Result<Self> {
        let number = raw
            .page_number
            .ok_or_else(|| ChunkError::InvalidInput("page record is missing page_number".into()))?;
        let text = raw.text.ok_or_else(|| {
            ChunkError::InvalidInput(format!("page {} is missing text", number))
        })?;

        let page_number = u32::try_from(number)
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| {
                ChunkError::InvalidInput(format!("page_number must be >= 1, got {}", number))
            })?;

        Ok(Page { page_number, text })
    }
}

/// A bounded, ordered segment of document text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    /// Page number of the first contributing unit
    pub start_page: u32,
    /// Page number of the last contributing unit
    pub end_page: u32,
    /// Contributing units joined with a single space
    pub text: String,
    /// Sum of the estimated token counts of the contributing units
    pub token_count: usize,
    /// 1-based position among the chunks of one run
    pub order: ChunkOrder,
}

/// The packable pieces of a document.
///
/// Whole pages are packed across page boundaries; sentences only appear when a
/// single page is too large for one chunk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Unit {
    Page { page_number: u32, text: String },
    Sentence { page_number: u32, text: String },
}

impl Unit {
    pub fn page_number(&self) -> u32 {
        match self {
            Unit::Page { page_number, .. } | Unit::Sentence { page_number, .. } => *page_number,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Unit::Page { text, .. } | Unit::Sentence { text, .. } => text,
        }
    }
}
