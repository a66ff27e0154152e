//! The owned presentation-state container.
//!
//! `CatalogBrowser` holds the catalog plus everything a user can change about
//! how it is viewed. Every transition is a method on an explicitly owned
//! value; there is no ambient state.
use serde::Serialize;

use crate::config::EngineConfig;
use crate::constants::LOG_TARGET;
use crate::error::{CatalogError, CatalogLoadError};
use crate::facets::{CatalogStats, Facets, TagChips, tag_chips};
use crate::filter::{CategoryFilter, FilterCriteria, filter};
use crate::load::{LoadStatus, Notice};
use crate::pager::{PageState, visible};
use crate::playback::{PlaybackSession, RecentlyOpened};
use crate::record::{Catalog, GameRecord};
use crate::rng::RngBundle;
use crate::sort::{SortMode, sort};
use crate::spotlight::{Direction, Spotlight};
use crate::ticker::Ticker;
use rand::seq::SliceRandom;

/// Visible slice of the filtered, sorted results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultsView<'a> {
    pub items: Vec<&'a GameRecord>,
    /// Size of the whole filtered set.
    pub total: usize,
    /// Whether a "load more" control should be offered.
    pub has_more: bool,
    /// Counts over the whole filtered set, not just the visible page.
    pub stats: CatalogStats,
}

impl ResultsView<'_> {
    /// No matches: renderers show an empty-state message, never a bare
    /// container with a load-more control.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug)]
pub struct CatalogBrowser {
    config: EngineConfig,
    catalog: Catalog,
    facets: Facets,
    criteria: FilterCriteria,
    sort_mode: SortMode,
    page: PageState,
    /// Ids of the filtered records in display order.
    results: Vec<usize>,
    spotlight: Spotlight,
    playback: PlaybackSession,
    recent: RecentlyOpened,
    ticker: Ticker,
    rngs: RngBundle,
    status: LoadStatus,
    generation: u64,
}

impl Default for CatalogBrowser {
    fn default() -> Self {
        Self::new(EngineConfig::default(), RngBundle::from_entropy())
    }
}

impl CatalogBrowser {
    #[must_use]
    pub fn new(config: EngineConfig, rngs: RngBundle) -> Self {
        Self {
            page: PageState::new(config.effective_page_size()),
            recent: RecentlyOpened::with_limit(config.recent_limit),
            config,
            catalog: Catalog::empty(),
            facets: Facets::default(),
            criteria: FilterCriteria::default(),
            sort_mode: SortMode::default(),
            results: Vec::new(),
            spotlight: Spotlight::default(),
            playback: PlaybackSession::new(),
            ticker: Ticker::default(),
            rngs,
            status: LoadStatus::Idle,
            generation: 0,
        }
    }

    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::new(EngineConfig::default(), RngBundle::from_user_seed(seed))
    }

    // Loading ---------------------------------------------------------------

    /// Mark a load as started.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::LoadInFlight`] if a previous load has not
    /// finished yet.
    pub fn begin_load(&mut self) -> Result<(), CatalogError> {
        if self.status == LoadStatus::Loading {
            log::warn!(target: LOG_TARGET, "rejected overlapping catalog load");
            return Err(CatalogError::LoadInFlight);
        }
        self.status = LoadStatus::Loading;
        Ok(())
    }

    /// Install the result of a load. A failure leaves the safe empty state
    /// and yields a notice for the user; it is never propagated.
    pub fn finish_load(&mut self, outcome: Result<Catalog, CatalogLoadError>) -> Option<Notice> {
        self.generation = self.generation.saturating_add(1);
        match outcome {
            Ok(catalog) => {
                self.install(catalog.with_generation(self.generation));
                self.status = LoadStatus::Ready;
                log::info!(
                    target: LOG_TARGET,
                    "catalog generation {} loaded: {} games, {} categories",
                    self.generation,
                    self.facets.stats.total,
                    self.facets.stats.categories
                );
                None
            }
            Err(err) => {
                log::warn!(target: LOG_TARGET, "catalog load failed: {err}");
                self.install(Catalog::empty().with_generation(self.generation));
                self.status = LoadStatus::Failed(err.to_string());
                Some(Notice::error(format!("Could not load games: {err}")))
            }
        }
    }

    /// Synchronous convenience for catalogs already in memory.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::LoadInFlight`] if an async load is pending.
    pub fn load_json(&mut self, json: &str) -> Result<Option<Notice>, CatalogError> {
        self.begin_load()?;
        Ok(self.finish_load(Catalog::from_json(json)))
    }

    fn install(&mut self, catalog: Catalog) {
        self.facets = Facets::build_with_limit(&catalog, self.config.tag_facet_limit);
        self.spotlight = Spotlight::init_with_fallback(
            &catalog,
            self.config.spotlight_fallback_pool,
            &mut *self.rngs.spotlight(),
        );
        self.ticker
            .refresh_sized(&catalog, self.config.ticker_size, &mut *self.rngs.ticker());
        self.catalog = catalog;
        self.recent.clear();
        self.playback.close();
        self.criteria = FilterCriteria::default();
        self.sort_mode = SortMode::default();
        self.refresh_results();
    }

    // Criteria --------------------------------------------------------------

    pub fn set_query(&mut self, query: &str) {
        self.criteria.set_query(query);
        self.refresh_results();
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.criteria.category = category;
        self.refresh_results();
    }

    /// Select `tag`, or clear it when it is already the active chip.
    pub fn toggle_tag(&mut self, tag: &str) {
        if self.criteria.tag.as_deref() == Some(tag) {
            self.criteria.tag = None;
        } else {
            self.criteria.tag = Some(tag.to_string());
        }
        self.refresh_results();
    }

    pub fn clear_tag(&mut self) {
        self.criteria.tag = None;
        self.refresh_results();
    }

    pub fn set_featured_only(&mut self, featured_only: bool) {
        self.criteria.featured_only = featured_only;
        self.refresh_results();
    }

    pub fn toggle_featured_only(&mut self) {
        self.set_featured_only(!self.criteria.featured_only);
    }

    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
        self.refresh_results();
    }

    pub fn set_sort_mode(&mut self, mode: SortMode) {
        self.sort_mode = mode;
        self.refresh_results();
    }

    /// Expose one more page. Returns false when everything is already shown.
    pub fn load_more(&mut self) -> bool {
        if !self.page.has_more(self.results.len()) {
            return false;
        }
        self.page = self.page.advance();
        true
    }

    /// Clear every user choice: criteria, sort, page, and the open session.
    /// The catalog and spotlight pool are untouched.
    pub fn reset_filters(&mut self) {
        self.criteria = FilterCriteria::default();
        self.sort_mode = SortMode::default();
        self.playback.close();
        self.spotlight.settle(&mut *self.rngs.spotlight());
        self.refresh_results();
    }

    fn refresh_results(&mut self) {
        let matching = filter(&self.catalog, &self.criteria);
        let ordered = sort(&matching, self.sort_mode, &mut *self.rngs.shuffle());
        self.results = ordered.iter().map(|record| record.id).collect();
        self.page = self.page.reset();
        log::debug!(
            target: LOG_TARGET,
            "criteria {:?} sort {} -> {} of {} games",
            self.criteria,
            self.sort_mode,
            self.results.len(),
            self.catalog.len()
        );
    }

    // Views -----------------------------------------------------------------

    #[must_use]
    pub fn results(&self) -> ResultsView<'_> {
        let shown = visible(&self.results, &self.page);
        ResultsView {
            items: shown
                .iter()
                .filter_map(|id| self.catalog.get(*id))
                .collect(),
            total: self.results.len(),
            has_more: self.page.has_more(self.results.len()),
            stats: CatalogStats::from_records(
                self.results.iter().filter_map(|id| self.catalog.get(*id)),
            ),
        }
    }

    /// Every filtered record in display order, ignoring paging.
    #[must_use]
    pub fn filtered(&self) -> Vec<&GameRecord> {
        self.results
            .iter()
            .filter_map(|id| self.catalog.get(*id))
            .collect()
    }

    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub const fn facets(&self) -> &Facets {
        &self.facets
    }

    #[must_use]
    pub fn tag_chips(&self) -> TagChips {
        tag_chips(&self.facets)
    }

    #[must_use]
    pub const fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    #[must_use]
    pub const fn sort_mode(&self) -> SortMode {
        self.sort_mode
    }

    #[must_use]
    pub const fn page(&self) -> &PageState {
        &self.page
    }

    #[must_use]
    pub const fn status(&self) -> &LoadStatus {
        &self.status
    }

    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    #[must_use]
    pub const fn rngs(&self) -> &RngBundle {
        &self.rngs
    }

    // Spotlight -------------------------------------------------------------

    #[must_use]
    pub const fn spotlight(&self) -> &Spotlight {
        &self.spotlight
    }

    #[must_use]
    pub fn spotlight_record(&self) -> Option<&GameRecord> {
        self.spotlight.current(&self.catalog)
    }

    pub fn spotlight_refresh(&mut self) {
        self.spotlight.refresh(&mut *self.rngs.spotlight());
    }

    pub fn spotlight_shift(&mut self, direction: Direction) {
        self.spotlight.shift(direction);
    }

    /// Highlight a specific catalog record. Returns false for unknown ids.
    pub fn spotlight_focus(&mut self, id: usize) -> bool {
        if self.catalog.get(id).is_none() {
            return false;
        }
        self.spotlight.focus(id);
        true
    }

    // Playback --------------------------------------------------------------

    #[must_use]
    pub const fn playback(&self) -> &PlaybackSession {
        &self.playback
    }

    /// Open a record for play. Returns false for unknown ids.
    pub fn open(&mut self, id: usize) -> bool {
        let Some(record) = self.catalog.get(id) else {
            return false;
        };
        self.playback.open(record.clone());
        self.recent.record(id);
        true
    }

    /// Mount the open record's content and return the url to embed.
    pub fn embed(&mut self) -> Option<String> {
        self.playback.embed().map(str::to_string)
    }

    /// Close the session. Returns whether embedded content was released.
    pub fn close(&mut self) -> bool {
        self.playback.close()
    }

    /// Open a random record from the filtered set, or from the whole
    /// catalog when nothing matches.
    pub fn surprise_me(&mut self) -> Option<usize> {
        let pool: Vec<usize> = if self.results.is_empty() {
            self.catalog.iter().map(|record| record.id).collect()
        } else {
            self.results.clone()
        };
        let picked = pool.choose(&mut *self.rngs.surprise()).copied()?;
        self.open(picked);
        Some(picked)
    }

    #[must_use]
    pub fn recent(&self) -> Vec<&GameRecord> {
        self.recent
            .iter()
            .filter_map(|id| self.catalog.get(id))
            .collect()
    }

    // Ticker ----------------------------------------------------------------

    #[must_use]
    pub const fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    pub fn refresh_ticker(&mut self) {
        self.ticker.refresh_sized(
            &self.catalog,
            self.config.ticker_size,
            &mut *self.rngs.ticker(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"[
        { "title": "Zeta", "category": "Arcade", "tags": ["retro"], "featured": true, "url": "https://g/z" },
        { "title": "Alpha", "category": "Puzzle", "tags": ["logic"], "url": "https://g/a" },
        { "title": "Mid", "category": "Arcade", "tags": ["retro", "fast"] }
    ]"#;

    fn loaded() -> CatalogBrowser {
        let mut browser = CatalogBrowser::with_seed(42);
        assert!(browser.load_json(CATALOG).unwrap().is_none());
        browser
    }

    fn titles(view: &ResultsView<'_>) -> Vec<String> {
        view.items.iter().map(|r| r.title.clone()).collect()
    }

    #[test]
    fn load_builds_curated_first_page() {
        let browser = loaded();
        assert_eq!(browser.status(), &LoadStatus::Ready);
        assert_eq!(browser.catalog().generation(), 1);
        let view = browser.results();
        assert_eq!(titles(&view), vec!["Zeta", "Alpha", "Mid"]);
        assert!(!view.has_more);
        assert_eq!(browser.spotlight().pool(), &[0]);
        assert_eq!(browser.spotlight_record().map(|r| r.id), Some(0));
    }

    #[test]
    fn failed_load_is_safe_and_empty() {
        let mut browser = loaded();
        let notice = browser.load_json("{ nope").unwrap();
        assert!(notice.is_some());
        assert!(matches!(browser.status(), LoadStatus::Failed(_)));
        assert!(browser.catalog().is_empty());
        assert_eq!(browser.facets(), &Facets::default());
        assert_eq!(browser.spotlight_record(), None);
        assert!(browser.results().is_empty());
        assert_eq!(browser.catalog().generation(), 2);
    }

    #[test]
    fn overlapping_loads_are_rejected() {
        let mut browser = CatalogBrowser::with_seed(1);
        browser.begin_load().unwrap();
        assert!(matches!(
            browser.begin_load(),
            Err(CatalogError::LoadInFlight)
        ));
        assert!(browser.finish_load(Catalog::from_json(CATALOG)).is_none());
        assert!(browser.begin_load().is_ok());
    }

    #[test]
    fn criteria_change_resets_page() {
        let mut browser = CatalogBrowser::new(
            EngineConfig {
                page_size: 1,
                ..EngineConfig::default()
            },
            RngBundle::from_user_seed(3),
        );
        browser.load_json(CATALOG).unwrap();
        assert!(browser.load_more());
        assert_eq!(browser.page().page_index(), 1);
        browser.set_query("retro");
        assert_eq!(browser.page().page_index(), 0);
        assert_eq!(browser.results().total, 2);
        assert!(browser.results().has_more);
    }

    #[test]
    fn toggling_the_active_tag_clears_it() {
        let mut browser = loaded();
        browser.toggle_tag("logic");
        assert_eq!(titles(&browser.results()), vec!["Alpha"]);
        browser.toggle_tag("logic");
        assert!(browser.criteria().is_unfiltered());
        assert_eq!(browser.results().total, 3);
    }

    #[test]
    fn reset_restores_default_view_and_closes_session() {
        let mut browser = loaded();
        browser.set_sort_mode(SortMode::AlphabeticalDescending);
        browser.set_category(CategoryFilter::Named("Arcade".to_string()));
        browser.toggle_featured_only();
        assert!(browser.open(1));
        browser.spotlight_focus(2);

        browser.reset_filters();
        assert!(browser.criteria().is_unfiltered());
        assert_eq!(browser.sort_mode(), SortMode::Curated);
        assert!(!browser.playback().is_open());
        assert!(browser.spotlight().is_in_pool());
        assert_eq!(titles(&browser.results()), vec!["Zeta", "Alpha", "Mid"]);
        assert_eq!(browser.recent().len(), 1);
    }

    #[test]
    fn results_stats_follow_the_filtered_set() {
        let mut browser = loaded();
        assert_eq!(browser.results().stats, browser.facets().stats);

        browser.set_category(CategoryFilter::Named("Arcade".to_string()));
        let stats = browser.results().stats;
        assert_eq!(
            (stats.total, stats.categories, stats.featured),
            (2, 1, 1)
        );

        browser.set_query("alpha");
        assert_eq!(browser.results().stats, CatalogStats::default());

        browser.reset_filters();
        let stats = browser.results().stats;
        assert_eq!(stats, browser.facets().stats);
        assert_eq!((stats.total, stats.categories, stats.featured), (3, 2, 1));
    }

    #[test]
    fn stats_count_records_beyond_the_visible_page() {
        let mut browser = CatalogBrowser::new(
            EngineConfig {
                page_size: 1,
                ..EngineConfig::default()
            },
            RngBundle::from_user_seed(3),
        );
        browser.load_json(CATALOG).unwrap();
        let view = browser.results();
        assert_eq!(view.items.len(), 1);
        assert_eq!(view.stats.total, 3);
    }

    #[test]
    fn surprise_prefers_filtered_results() {
        let mut browser = loaded();
        browser.set_query("alpha");
        assert_eq!(browser.surprise_me(), Some(1));
        assert_eq!(browser.playback().active().map(|r| r.id), Some(1));

        browser.set_query("no such game");
        let picked = browser.surprise_me();
        assert!(picked.is_some_and(|id| id < 3));
    }

    #[test]
    fn open_embed_close_cycle() {
        let mut browser = loaded();
        assert!(!browser.open(99));
        assert!(browser.open(2));
        assert_eq!(browser.embed(), None);
        assert!(browser.open(0));
        assert_eq!(browser.embed().as_deref(), Some("https://g/z"));
        assert!(browser.close());
        assert!(!browser.playback().is_embedded());
        let recent: Vec<_> = browser.recent().iter().map(|r| r.id).collect();
        assert_eq!(recent, vec![0, 2]);
    }
}
