use serde::{Deserialize, Serialize};

use crate::{Error, Result};

pub const DEFAULT_PAGE_SIZE: usize = 1500;
pub const DEFAULT_TOP_K: usize = 5;

/// Tuning knobs for query rounds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Number of consecutive queries handed to one worker thread.
    pub page_size: usize,
    /// Maximum number of documents reported per query.
    pub top_k: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { page_size: DEFAULT_PAGE_SIZE, top_k: DEFAULT_TOP_K }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::InvalidConfig("page_size must be at least 1".into()));
        }
        if self.top_k == 0 {
            return Err(Error::InvalidConfig("top_k must be at least 1".into()));
        }
        Ok(())
    }
}
