//! Centralized tuning constants for the Playshelf catalog engine.
//!
//! Paging, pool sizes, and presentation defaults live here so that behavior
//! only changes through reviewed code rather than through catalog data.

use std::time::Duration;

// Logging keys -------------------------------------------------------------
pub(crate) const LOG_TARGET: &str = "playshelf::catalog";

// Record defaults ----------------------------------------------------------
pub const DEFAULT_TITLE: &str = "Untitled game";
pub const DEFAULT_DESCRIPTION: &str = "Play instantly in your browser.";
pub const DEFAULT_CATEGORY: &str = "Arcade";
pub(crate) const PLACEHOLDER_IMAGE_PREFIX: &str = "placeholder://game/";

// Criteria -----------------------------------------------------------------
/// Sentinel label for "no category restriction".
pub const ALL_CATEGORIES: &str = "all";

// Paging -------------------------------------------------------------------
pub const PAGE_SIZE: usize = 24;

// Facets -------------------------------------------------------------------
pub const TAG_FACET_LIMIT: usize = 12;
/// Chips shown when the catalog yields no repeated tags.
pub const DEFAULT_TAG_CHIPS: [&str; 6] = [
    "action",
    "arcade",
    "puzzle",
    "racing",
    "retro",
    "multiplayer",
];

// Spotlight ----------------------------------------------------------------
pub const SPOTLIGHT_FALLBACK_POOL: usize = 12;

// Ticker -------------------------------------------------------------------
pub const TICKER_SIZE: usize = 4;
pub const QUICK_PICK_COUNT: usize = 3;
pub const TICKER_FALLBACK_TAG: &str = "popular";
pub const TICKER_INTERVAL: Duration = Duration::from_secs(8);

// Recently opened ----------------------------------------------------------
pub const RECENT_LIMIT: usize = 3;

// Input --------------------------------------------------------------------
pub const QUERY_DEBOUNCE: Duration = Duration::from_millis(120);
