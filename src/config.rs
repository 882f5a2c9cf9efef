use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

use crate::chunker::{DEFAULT_MAX_TOKENS, DEFAULT_OVERLAP_UNITS};
use crate::error::{ChunkError, Result};

pub const MAX_TOKENS_VAR: &str = "MAX_TOKENS";
pub const OVERLAP_VAR: &str = "OVERLAP_SENTENCES";
pub const OVERSIZED_PAGE_VAR: &str = "OVERSIZED_PAGE_POLICY";

/// What to do with the cross-page buffer when a page is too large for one chunk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OversizedPagePolicy {
    /// Split the page on its own and resume the buffer afterwards.
    /// Chunks from the oversized page are emitted before the buffered pages
    /// that precede it.
    #[default]
    Detached,
    /// Flush the buffer first so chunks stay in page order
    FlushBuffer,
}

impl FromStr for OversizedPagePolicy {
    type Err = ChunkError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "detached" => Ok(Self::Detached),
            "flush_buffer" | "flush" => Ok(Self::FlushBuffer),
            other => Err(ChunkError::InvalidInput(format!(
                "unknown oversized page policy: {}",
                other
            ))),
        }
    }
}

/// Values supplied by the caller (e.g. command line flags) that take
/// precedence over the environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub max_tokens: Option<usize>,
    pub overlap_units: Option<usize>,
    pub oversized_page: Option<OversizedPagePolicy>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkerConfig {
    /// Maximum estimated tokens per chunk
    pub max_tokens: usize,
    /// Trailing units carried into the next chunk
    pub overlap_units: usize,
    #[serde(default)]
    pub oversized_page: OversizedPagePolicy,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            overlap_units: DEFAULT_OVERLAP_UNITS,
            oversized_page: OversizedPagePolicy::default(),
        }
    }
}

impl ChunkerConfig {
    pub fn new(max_tokens: usize, overlap_units: usize) -> Self {
        Self {
            max_tokens,
            overlap_units,
            ..Self::default()
        }
    }

    pub fn with_oversized_page(mut self, policy: OversizedPagePolicy) -> Self {
        self.oversized_page = policy;
        self
    }

    /// Defaults overridden by `MAX_TOKENS`, `OVERLAP_SENTENCES` and
    /// `OVERSIZED_PAGE_POLICY` when set
    pub fn from_env() -> Result<Self> {
        Self::from_env_with(ConfigOverrides::default())
    }

    /// Like [`ChunkerConfig::from_env`], but an override replaces its
    /// variable entirely; the variable is not read or parsed
    pub fn from_env_with(overrides: ConfigOverrides) -> Result<Self> {
        Self::from_lookup_with(|key| env::var(key).ok(), overrides)
    }

    /// Build from an arbitrary key lookup; unset keys keep their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_lookup_with(lookup, ConfigOverrides::default())
    }

    pub fn from_lookup_with<F>(lookup: F, overrides: ConfigOverrides) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        match overrides.max_tokens {
            Some(max_tokens) => config.max_tokens = max_tokens,
            None => {
                if let Some(raw) = lookup(MAX_TOKENS_VAR) {
                    config.max_tokens = parse_var(MAX_TOKENS_VAR, &raw)?;
                }
            }
        }
        match overrides.overlap_units {
            Some(overlap_units) => config.overlap_units = overlap_units,
            None => {
                if let Some(raw) = lookup(OVERLAP_VAR) {
                    config.overlap_units = parse_var(OVERLAP_VAR, &raw)?;
                }
            }
        }
        match overrides.oversized_page {
            Some(policy) => config.oversized_page = policy,
            None => {
                if let Some(raw) = lookup(OVERSIZED_PAGE_VAR) {
                    config.oversized_page = raw.parse()?;
                }
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_tokens == 0 {
            return Err(ChunkError::InvalidInput(
                "max_tokens must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

fn parse_var(key: &str, raw: &str) -> Result<usize> {
    raw.trim().parse().map_err(|_| {
        ChunkError::InvalidInput(format!("{} must be a non-negative integer, got {:?}", key, raw))
    })
}
