//! Live ticker: a periodically refreshed random sample of the catalog.
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::constants::{QUICK_PICK_COUNT, TICKER_FALLBACK_TAG, TICKER_SIZE};
use crate::record::Catalog;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerItem {
    pub id: usize,
    pub title: String,
    pub category: String,
    pub lead_tag: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ticker {
    items: Vec<TickerItem>,
    refreshes: u64,
}

impl Ticker {
    /// Replace the sample with up to `TICKER_SIZE` distinct records.
    pub fn refresh<R: Rng + ?Sized>(&mut self, catalog: &Catalog, rng: &mut R) {
        self.refresh_sized(catalog, TICKER_SIZE, rng);
    }

    pub fn refresh_sized<R: Rng + ?Sized>(&mut self, catalog: &Catalog, size: usize, rng: &mut R) {
        self.items = catalog
            .records()
            .choose_multiple(rng, size)
            .map(|record| TickerItem {
                id: record.id,
                title: record.title.clone(),
                category: record.category.clone(),
                lead_tag: record
                    .lead_tag()
                    .unwrap_or(TICKER_FALLBACK_TAG)
                    .to_string(),
            })
            .collect();
        self.refreshes = self.refreshes.saturating_add(1);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn items(&self) -> &[TickerItem] {
        &self.items
    }

    /// Leading entries offered as one-click shortcuts.
    #[must_use]
    pub fn quick_picks(&self) -> &[TickerItem] {
        &self.items[..self.items.len().min(QUICK_PICK_COUNT)]
    }

    #[must_use]
    pub const fn refreshes(&self) -> u64 {
        self.refreshes
    }
}
