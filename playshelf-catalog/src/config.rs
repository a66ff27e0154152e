//! Engine tuning knobs that a rendering collaborator may override.
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::constants::{
    PAGE_SIZE, QUERY_DEBOUNCE, RECENT_LIMIT, SPOTLIGHT_FALLBACK_POOL, TAG_FACET_LIMIT, TICKER_SIZE,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub page_size: usize,
    pub spotlight_fallback_pool: usize,
    pub tag_facet_limit: usize,
    pub ticker_size: usize,
    pub recent_limit: usize,
    /// Debounce window for query input, in milliseconds.
    pub debounce_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            page_size: PAGE_SIZE,
            spotlight_fallback_pool: SPOTLIGHT_FALLBACK_POOL,
            tag_facet_limit: TAG_FACET_LIMIT,
            ticker_size: TICKER_SIZE,
            recent_limit: RECENT_LIMIT,
            debounce_ms: u64::try_from(QUERY_DEBOUNCE.as_millis()).unwrap_or(120),
        }
    }
}

impl EngineConfig {
    /// Parse a partial configuration; missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub const fn debounce_window(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    /// Page size never drops below one so paging always makes progress.
    #[must_use]
    pub fn effective_page_size(&self) -> usize {
        self.page_size.max(1)
    }
}
