/// Strategy for estimating how many model tokens a text consumes
pub trait TokenEstimator {
    fn estimate(&self, text: &str) -> usize;
}

/// Fixed characters-per-token approximation.
///
/// Counts Unicode scalar values, not bytes, and rounds up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharRatioEstimator {
    pub chars_per_token: usize,
}

impl CharRatioEstimator {
    pub const fn new(chars_per_token: usize) -> Self {
        Self { chars_per_token }
    }
}

impl Default for CharRatioEstimator {
    fn default() -> Self {
        Self::new(4)
    }
}

impl TokenEstimator for CharRatioEstimator {
    fn estimate(&self, text: &str) -> usize {
        text.chars().count().div_ceil(self.chars_per_token.max(1))
    }
}

impl<F> TokenEstimator for F
where
    F: Fn(&str) -> usize,
{
    fn estimate(&self, text: &str) -> usize {
        self(text)
    }
}

/// Estimate token count with the default 4 characters per token rule
pub fn estimate_tokens(text: &str) -> usize {
    CharRatioEstimator::default().estimate(text)
}
