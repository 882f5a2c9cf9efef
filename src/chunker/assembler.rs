use tracing::{debug, trace};

use super::packer::{Bucket, Packer};
use super::{split_into_sentences, CharRatioEstimator, Chunk, Page, TokenEstimator, Unit};
use crate::config::{ChunkerConfig, OversizedPagePolicy};
use crate::error::{ChunkError, Result};

/// Packs ordered pages into bounded, overlapping chunks
#[derive(Debug, Clone)]
pub struct Assembler<E = CharRatioEstimator> {
    config: ChunkerConfig,
    estimator: E,
}

impl Assembler<CharRatioEstimator> {
    pub fn new(config: ChunkerConfig) -> Result<Self> {
        Self::with_estimator(config, CharRatioEstimator::default())
    }
}

impl<E: TokenEstimator> Assembler<E> {
    /// Use a custom token estimator in place of the 4-chars-per-token rule
    pub fn with_estimator(config: ChunkerConfig, estimator: E) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, estimator })
    }

    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Chunk pages in the order given.
    ///
    /// Pages whose own estimate exceeds `max_tokens` are split into sentences
    /// and packed separately; all other pages are packed whole across page
    /// boundaries. Blank pages contribute nothing.
    pub fn assemble(&self, pages: &[Page]) -> Result<Vec<Chunk>> {
        validate_pages(pages)?;

        let packer = Packer {
            estimator: &self.estimator,
            max_tokens: self.config.max_tokens,
            overlap_units: self.config.overlap_units,
        };

        let mut chunks = Vec::new();
        let mut buffer = Bucket::default();

        for page in pages {
            if page.text.trim().is_empty() {
                trace!(page = page.page_number, "skipping blank page");
                continue;
            }

            let page_tokens = self.estimator.estimate(&page.text);

            if page_tokens > self.config.max_tokens {
                debug!(
                    page = page.page_number,
                    tokens = page_tokens,
                    "page exceeds budget, splitting into sentences"
                );

                if self.config.oversized_page == OversizedPagePolicy::FlushBuffer {
                    packer.finish(&mut buffer, &mut chunks);
                }

                let mut page_bucket = Bucket::default();
                for sentence in split_into_sentences(&page.text) {
                    let unit = Unit::Sentence {
                        page_number: page.page_number,
                        text: sentence,
                    };
                    packer.push(&mut page_bucket, unit, &mut chunks);
                }
                packer.finish(&mut page_bucket, &mut chunks);
                continue;
            }

            let unit = Unit::Page {
                page_number: page.page_number,
                text: page.text.clone(),
            };
            packer.push(&mut buffer, unit, &mut chunks);
        }

        packer.finish(&mut buffer, &mut chunks);

        debug!(
            pages = pages.len(),
            chunks = chunks.len(),
            "assembled chunks"
        );
        Ok(chunks)
    }
}

/// Chunk pages with the default estimator and buffer policy
pub fn assemble_chunks(
    pages: &[Page],
    max_tokens: usize,
    overlap_units: usize,
) -> Result<Vec<Chunk>> {
    Assembler::new(ChunkerConfig::new(max_tokens, overlap_units))?.assemble(pages)
}

fn validate_pages(pages: &[Page]) -> Result<()> {
    let mut previous = 0;

    for page in pages {
        if page.page_number == 0 {
            return Err(ChunkError::InvalidInput(
                "page_number must be >= 1, got 0".into(),
            ));
        }
        if page.page_number < previous {
            return Err(ChunkError::InvalidInput(format!(
                "pages out of order: page {} follows page {}",
                page.page_number, previous
            )));
        }
        previous = page.page_number;
    }

    Ok(())
}
