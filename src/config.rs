//! Build-time configuration for the superset index.

use serde::{Deserialize, Serialize};

use crate::errors::{BitsieveError, Result};

/// Parameters controlling index construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Total bit width; every record's set bits must lie in `[0, width)`.
    pub width: usize,
    /// Maximum records stored directly in a leaf before a further split is
    /// attempted.
    pub bin_size: usize,
    /// How many shuffled candidate split bits to score before settling for
    /// the best seen so far.
    pub max_tries: usize,
    /// Seed for the split-bit shuffle. Identical inputs and seed always
    /// produce an identical tree.
    pub seed: u64,
}

impl BuildConfig {
    /// Config for the given width with default tuning parameters.
    pub fn new(width: usize) -> Self {
        Self {
            width,
            ..Self::default()
        }
    }

    /// Reject configurations the builder cannot honor.
    pub fn validate(&self) -> Result<()> {
        if self.width < 1 {
            return Err(BitsieveError::InvalidConfig(
                "width must be at least 1".into(),
            ));
        }
        if self.bin_size < 1 {
            return Err(BitsieveError::InvalidConfig(
                "bin_size must be at least 1".into(),
            ));
        }
        if self.max_tries < 1 {
            return Err(BitsieveError::InvalidConfig(
                "max_tries must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            width: 2048,
            bin_size: 256,
            max_tries: 20,
            seed: 0,
        }
    }
}
