//! Playshelf Catalog Engine
//!
//! Platform-agnostic core for browsing a catalog of instantly playable games:
//! normalization, facets, filtering, ranking, paging, spotlight rotation, and
//! the single-record playback session. Drawing and fetching belong to the
//! host; this crate only owns state and the transitions on it.

pub mod browser;
pub mod config;
pub mod constants;
pub mod debounce;
pub mod error;
pub mod facets;
pub mod filter;
pub mod load;
pub mod pager;
pub mod playback;
pub mod record;
pub mod render;
pub mod rng;
pub mod sort;
pub mod spotlight;
pub mod ticker;

// Re-export commonly used types
pub use browser::{CatalogBrowser, ResultsView};
pub use config::EngineConfig;
pub use debounce::QueryDebouncer;
pub use error::{CatalogError, CatalogLoadError, UnknownSortMode};
pub use facets::{CatalogStats, Facets, TagChips, TagCount, categories, popular_tags, tag_chips};
pub use filter::{CategoryFilter, FilterCriteria, filter};
pub use load::{CatalogSource, LoadStatus, Notice, NoticeKind, StaticSource, load_catalog};
pub use pager::{PageState, visible};
pub use playback::{PlaybackSession, PlaybackState, RecentlyOpened};
pub use record::{Catalog, GameRecord, TagList, normalize_all, normalize_record};
pub use render::{Presenter, Renderer};
pub use rng::{CountingRng, RngBundle};
pub use sort::{SortMode, collate, compare, sort};
pub use spotlight::{Direction, Spotlight, SpotlightState};
pub use ticker::{Ticker, TickerItem};

/// Entry point pairing a catalog source with engine tuning.
pub struct CatalogEngine<S>
where
    S: CatalogSource,
{
    source: S,
    config: EngineConfig,
}

impl<S> CatalogEngine<S>
where
    S: CatalogSource,
{
    pub const fn new(source: S, config: EngineConfig) -> Self {
        Self { source, config }
    }

    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Fetch and normalize the catalog without building any view state.
    ///
    /// # Errors
    ///
    /// Returns an error if the source fails or its text is not a JSON array.
    pub async fn load(&self) -> Result<Catalog, CatalogLoadError> {
        load_catalog(&self.source).await
    }

    /// Build a browser seeded with `seed` and run the initial load.
    /// A failed load yields the safe empty browser plus a notice.
    pub async fn open_browser(&self, seed: u64) -> (CatalogBrowser, Option<Notice>) {
        let mut browser = CatalogBrowser::new(self.config.clone(), RngBundle::from_user_seed(seed));
        let outcome = self.load().await;
        let notice = browser.finish_load(outcome);
        (browser, notice)
    }

    /// Like [`Self::open_browser`] but wired to a renderer.
    pub async fn open_presenter<R: Renderer>(&self, seed: u64, renderer: R) -> Presenter<R> {
        let browser = CatalogBrowser::new(self.config.clone(), RngBundle::from_user_seed(seed));
        let mut presenter = Presenter::new(browser, renderer);
        if let Err(err) = presenter.load(&self.source).await {
            log::warn!(target: constants::LOG_TARGET, "initial load skipped: {err}");
        }
        presenter
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"[
        { "title": "Comet", "featured": true, "tags": ["space"] },
        { "title": "Burrow", "category": "Puzzle" }
    ]"#;

    #[tokio::test]
    async fn engine_opens_seeded_browser() {
        let engine = CatalogEngine::new(StaticSource::new(FIXTURE), EngineConfig::default());
        let (browser, notice) = engine.open_browser(0xABCD).await;
        assert!(notice.is_none());
        assert_eq!(browser.rngs().seed(), 0xABCD);
        assert_eq!(browser.catalog().len(), 2);
        assert_eq!(browser.facets().categories, vec!["Arcade", "Puzzle"]);
        assert_eq!(browser.spotlight_record().map(|r| r.title.as_str()), Some("Comet"));
    }

    #[tokio::test]
    async fn engine_surfaces_bad_catalog_as_notice() {
        let engine = CatalogEngine::new(StaticSource::new(r#"{"games": []}"#), EngineConfig::default());
        let (browser, notice) = engine.open_browser(1).await;
        assert!(notice.is_some_and(|n| n.kind == NoticeKind::Error));
        assert!(browser.catalog().is_empty());
        assert!(matches!(browser.status(), LoadStatus::Failed(_)));
    }

    #[tokio::test]
    async fn same_seed_same_view() {
        let engine = CatalogEngine::new(StaticSource::new(FIXTURE), EngineConfig::default());
        let (mut first, _) = engine.open_browser(77).await;
        let (mut second, _) = engine.open_browser(77).await;
        first.set_sort_mode(SortMode::Random);
        second.set_sort_mode(SortMode::Random);
        let ids = |b: &CatalogBrowser| b.filtered().iter().map(|r| r.id).collect::<Vec<_>>();
        assert_eq!(ids(&first), ids(&second));
    }
}
