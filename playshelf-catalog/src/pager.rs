//! Incremental "load more" paging over a sorted result set.
use serde::{Deserialize, Serialize};

use crate::constants::PAGE_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    page_index: usize,
    page_size: usize,
}

impl Default for PageState {
    fn default() -> Self {
        Self::new(PAGE_SIZE)
    }
}

impl PageState {
    #[must_use]
    pub fn new(page_size: usize) -> Self {
        Self {
            page_index: 0,
            page_size: page_size.max(1),
        }
    }

    #[must_use]
    pub const fn page_index(&self) -> usize {
        self.page_index
    }

    #[must_use]
    pub const fn page_size(&self) -> usize {
        self.page_size
    }

    /// Next page state; the index only ever grows by one.
    #[must_use]
    pub const fn advance(self) -> Self {
        Self {
            page_index: self.page_index.saturating_add(1),
            page_size: self.page_size,
        }
    }

    #[must_use]
    pub const fn reset(self) -> Self {
        Self {
            page_index: 0,
            page_size: self.page_size,
        }
    }

    /// Number of items exposed for a result set of `total` items.
    #[must_use]
    pub const fn visible_count(&self, total: usize) -> usize {
        let wanted = self.page_index.saturating_add(1).saturating_mul(self.page_size);
        if wanted < total { wanted } else { total }
    }

    #[must_use]
    pub const fn has_more(&self, total: usize) -> bool {
        self.visible_count(total) < total
    }
}

/// Visible prefix of `sorted` for the current page state.
#[must_use]
pub fn visible<'s, T>(sorted: &'s [T], page: &PageState) -> &'s [T] {
    &sorted[..page.visible_count(sorted.len())]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visible_grows_by_page_and_clamps() {
        let items: Vec<u32> = (0..5).collect();
        let page = PageState::new(2);
        assert_eq!(visible(&items, &page), &[0, 1]);
        let page = page.advance();
        assert_eq!(visible(&items, &page), &[0, 1, 2, 3]);
        assert!(page.has_more(items.len()));
        let page = page.advance();
        assert_eq!(visible(&items, &page).len(), 5);
        assert!(!page.has_more(items.len()));
        let page = page.advance();
        assert_eq!(visible(&items, &page).len(), 5);
    }

    #[test]
    fn visible_count_is_monotonic() {
        let mut page = PageState::new(3);
        let mut last = 0;
        for _ in 0..10 {
            let count = page.visible_count(20);
            assert!(count >= last);
            assert!(count <= 20);
            last = count;
            page = page.advance();
        }
    }

    #[test]
    fn reset_returns_to_first_page() {
        let page = PageState::default().advance().advance();
        assert_eq!(page.page_index(), 2);
        let page = page.reset();
        assert_eq!(page.page_index(), 0);
        assert_eq!(page.page_size(), PAGE_SIZE);
    }

    #[test]
    fn empty_results_have_no_more() {
        let page = PageState::default();
        let items: Vec<u8> = Vec::new();
        assert!(visible(&items, &page).is_empty());
        assert!(!page.has_more(0));
    }
}
