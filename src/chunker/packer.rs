use tracing::debug;

use super::{Chunk, TokenEstimator, Unit};

/// A unit together with its estimated token count
#[derive(Debug, Clone)]
struct Measured {
    unit: Unit,
    tokens: usize,
}

/// In-progress group of units waiting to become a chunk
#[derive(Debug, Clone, Default)]
pub(crate) struct Bucket {
    units: Vec<Measured>,
    tokens: usize,
}

impl Bucket {
    pub(crate) fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    fn push(&mut self, unit: Unit, tokens: usize) {
        self.tokens += tokens;
        self.units.push(Measured { unit, tokens });
    }

    /// Keep only the last `count` units
    fn retain_tail(&mut self, count: usize) {
        let skip = self.units.len().saturating_sub(count);
        self.units.drain(..skip);
        self.tokens = self.units.iter().map(|s| s.tokens).sum();
    }

    /// Drop the oldest unit
    fn pop_front(&mut self) {
        if !self.units.is_empty() {
            let dropped = self.units.remove(0);
            self.tokens -= dropped.tokens;
        }
    }

    fn to_chunk(&self, order: usize) -> Chunk {
        let start_page = self.units.first().map(|s| s.unit.page_number()).unwrap_or(0);
        let end_page = self.units.last().map(|s| s.unit.page_number()).unwrap_or(0);
        let text = self
            .units
            .iter()
            .map(|s| s.unit.text())
            .collect::<Vec<_>>()
            .join(" ");

        Chunk {
            start_page,
            end_page,
            text,
            token_count: self.tokens,
            order,
        }
    }
}

/// Bin-packing rule shared by cross-page packing and oversized page splitting.
///
/// Chunks are appended to `out`; a chunk's `order` is its 1-based position in
/// `out`.
pub(crate) struct Packer<'a, E: ?Sized> {
    pub estimator: &'a E,
    pub max_tokens: usize,
    pub overlap_units: usize,
}

impl<'a, E: TokenEstimator + ?Sized> Packer<'a, E> {
    /// Add one unit, flushing the bucket first if the unit would overflow it
    pub(crate) fn push(&self, bucket: &mut Bucket, unit: Unit, out: &mut Vec<Chunk>) {
        let tokens = self.estimator.estimate(unit.text());

        if !bucket.is_empty() && bucket.tokens + tokens > self.max_tokens {
            self.emit(bucket, out);
            bucket.retain_tail(self.overlap_units);

            // Overlap never pushes a chunk past the budget
            while !bucket.is_empty() && bucket.tokens + tokens > self.max_tokens {
                bucket.pop_front();
            }
        }

        bucket.push(unit, tokens);
    }

    /// Flush whatever remains; nothing is carried over
    pub(crate) fn finish(&self, bucket: &mut Bucket, out: &mut Vec<Chunk>) {
        if !bucket.is_empty() {
            self.emit(bucket, out);
        }
        *bucket = Bucket::default();
    }

    fn emit(&self, bucket: &Bucket, out: &mut Vec<Chunk>) {
        let chunk = bucket.to_chunk(out.len() + 1);
        debug!(
            order = chunk.order,
            start_page = chunk.start_page,
            end_page = chunk.end_page,
            tokens = chunk.token_count,
            units = bucket.units.len(),
            "flushed chunk"
        );
        out.push(chunk);
    }
}

#[cfg(test)]
mod packer_tests {
    use super::*;
    use crate::chunker::CharRatioEstimator;

    fn sentence(page_number: u32, text: &str) -> Unit {
        Unit::Sentence {
            page_number,
            text: text.to_string(),
        }
    }

    #[test]
    fn test_never_flushes_empty_bucket() {
        let estimator = CharRatioEstimator::default();
        let packer = Packer {
            estimator: &estimator,
            max_tokens: 2,
            overlap_units: 1,
        };
        let mut bucket = Bucket::default();
        let mut out = Vec::new();

        packer.push(&mut bucket, sentence(1, &"x".repeat(40)), &mut out);
        assert!(out.is_empty());

        packer.finish(&mut bucket, &mut out);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].token_count, 10);
    }

    #[test]
    fn test_overlap_seed_is_retained() {
        let estimator = CharRatioEstimator::default();
        let packer = Packer {
            estimator: &estimator,
            max_tokens: 3,
            overlap_units: 1,
        };
        let mut bucket = Bucket::default();
        let mut out = Vec::new();

        for text in ["aaaa", "bbbb", "cccc", "dddd"] {
            packer.push(&mut bucket, sentence(1, text), &mut out);
        }
        packer.finish(&mut bucket, &mut out);

        let texts: Vec<&str> = out.iter().map(|c| c.text.as_str()).collect();
        assert_eq!(texts, vec!["aaaa bbbb cccc", "cccc dddd"]);
        assert!(bucket.is_empty());
    }

    #[test]
    fn test_overlap_trimmed_when_it_would_overflow() {
        let estimator = CharRatioEstimator::default();
        let packer = Packer {
            estimator: &estimator,
            max_tokens: 2,
            overlap_units: 1,
        };
        let mut bucket = Bucket::default();
        let mut out = Vec::new();

        packer.push(&mut bucket, sentence(1, "aaaaaaaa"), &mut out);
        packer.push(&mut bucket, sentence(2, "bbbbbbbb"), &mut out);
        packer.finish(&mut bucket, &mut out);

        assert_eq!(out.len(), 2);
        assert_eq!(out[1].text, "bbbbbbbb");
        assert_eq!(out[1].start_page, 2);
    }
}
