//! Boundary between the engine and whatever draws it.
//!
//! A [`Renderer`] receives read-only views after each transition. The
//! [`Presenter`] drives a [`CatalogBrowser`] and decides which views changed.
use crate::browser::{CatalogBrowser, ResultsView};
use crate::error::CatalogError;
use crate::facets::{Facets, TagChips};
use crate::filter::CategoryFilter;
use crate::load::{CatalogSource, Notice, load_catalog};
use crate::playback::PlaybackSession;
use crate::record::{Catalog, GameRecord};
use crate::sort::SortMode;
use crate::spotlight::{Direction, Spotlight};
use crate::ticker::Ticker;

/// Rendering collaborator. Only the results grid is mandatory; a headless
/// consumer can ignore the rest.
pub trait Renderer {
    fn render_results(&mut self, results: &ResultsView<'_>);

    fn render_catalog(&mut self, _catalog: &Catalog) {}

    fn render_facets(&mut self, _facets: &Facets, _chips: &TagChips) {}

    fn render_spotlight(&mut self, _record: Option<&GameRecord>, _spotlight: &Spotlight) {}

    fn render_playback(&mut self, _session: &PlaybackSession, _recent: &[&GameRecord]) {}

    fn render_ticker(&mut self, _ticker: &Ticker) {}

    fn notify(&mut self, _notice: &Notice) {}
}

pub struct Presenter<R> {
    browser: CatalogBrowser,
    renderer: R,
}

impl<R: Renderer> Presenter<R> {
    pub const fn new(browser: CatalogBrowser, renderer: R) -> Self {
        Self { browser, renderer }
    }

    pub const fn browser(&self) -> &CatalogBrowser {
        &self.browser
    }

    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    pub const fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn into_parts(self) -> (CatalogBrowser, R) {
        (self.browser, self.renderer)
    }

    /// Fetch a catalog and render every view. Load failures are reported to
    /// the renderer as a notice, not returned.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::LoadInFlight`] when a load is already running.
    pub async fn load<S: CatalogSource>(&mut self, source: &S) -> Result<(), CatalogError> {
        self.browser.begin_load()?;
        let outcome = load_catalog(source).await;
        let notice = self.browser.finish_load(outcome);
        self.render_all();
        if let Some(notice) = notice {
            self.renderer.notify(&notice);
        }
        Ok(())
    }

    /// Push every view, e.g. after a load or when a renderer attaches.
    pub fn render_all(&mut self) {
        let browser = &self.browser;
        self.renderer.render_catalog(browser.catalog());
        self.renderer
            .render_facets(browser.facets(), &browser.tag_chips());
        self.renderer.render_results(&browser.results());
        self.renderer
            .render_spotlight(browser.spotlight_record(), browser.spotlight());
        self.renderer.render_ticker(browser.ticker());
        self.renderer
            .render_playback(browser.playback(), &browser.recent());
    }

    fn push_results(&mut self) {
        self.renderer.render_results(&self.browser.results());
    }

    fn push_spotlight(&mut self) {
        self.renderer.render_spotlight(
            self.browser.spotlight_record(),
            self.browser.spotlight(),
        );
    }

    fn push_playback(&mut self) {
        self.renderer
            .render_playback(self.browser.playback(), &self.browser.recent());
    }

    pub fn set_query(&mut self, query: &str) {
        self.browser.set_query(query);
        self.push_results();
    }

    pub fn set_category(&mut self, category: CategoryFilter) {
        self.browser.set_category(category);
        self.push_results();
    }

    pub fn toggle_tag(&mut self, tag: &str) {
        self.browser.toggle_tag(tag);
        self.push_results();
    }

    pub fn set_featured_only(&mut self, featured_only: bool) {
        self.browser.set_featured_only(featured_only);
        self.push_results();
    }

    pub fn toggle_featured_only(&mut self) {
        self.browser.toggle_featured_only();
        self.push_results();
    }

    pub fn set_sort_mode(&mut self, mode: SortMode) {
        self.browser.set_sort_mode(mode);
        self.push_results();
    }

    pub fn load_more(&mut self) -> bool {
        let advanced = self.browser.load_more();
        if advanced {
            self.push_results();
        }
        advanced
    }

    pub fn reset_filters(&mut self) {
        self.browser.reset_filters();
        self.push_results();
        self.push_spotlight();
        self.push_playback();
    }

    pub fn spotlight_refresh(&mut self) {
        self.browser.spotlight_refresh();
        self.push_spotlight();
    }

    pub fn spotlight_shift(&mut self, direction: Direction) {
        self.browser.spotlight_shift(direction);
        self.push_spotlight();
    }

    pub fn spotlight_focus(&mut self, id: usize) -> bool {
        let focused = self.browser.spotlight_focus(id);
        if focused {
            self.push_spotlight();
        }
        focused
    }

    pub fn open(&mut self, id: usize) -> bool {
        let opened = self.browser.open(id);
        if opened {
            self.push_playback();
        }
        opened
    }

    pub fn embed(&mut self) -> Option<String> {
        let url = self.browser.embed();
        self.push_playback();
        url
    }

    pub fn close(&mut self) -> bool {
        let released = self.browser.close();
        self.push_playback();
        released
    }

    pub fn surprise_me(&mut self) -> Option<usize> {
        let picked = self.browser.surprise_me();
        if picked.is_some() {
            self.push_playback();
        }
        picked
    }

    pub fn refresh_ticker(&mut self) {
        self.browser.refresh_ticker();
        self.renderer.render_ticker(self.browser.ticker());
    }
}
