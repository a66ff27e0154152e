use anyhow::{Result, ensure};
use playshelf_catalog::constants::ALL_CATEGORIES;
use playshelf_catalog::{LoadStatus, SortMode, SpotlightState};

use super::{CatalogScenario, ScenarioCtx};

pub fn scenario() -> CatalogScenario {
    CatalogScenario::new(
        "smoke",
        "Catalog loads, facets derive, first curated page renders",
        smoke_check,
    )
}

fn smoke_check(ctx: &ScenarioCtx<'_>) -> Result<()> {
    let browser = ctx.browser()?;
    let catalog = browser.catalog();
    ensure!(
        browser.status() == &LoadStatus::Ready,
        "status {:?}",
        browser.status()
    );
    ensure!(
        catalog.iter().enumerate().all(|(i, r)| r.id == i),
        "ids are not dense and positional"
    );
    ensure!(
        catalog.iter().all(|r| !r.title.is_empty() && !r.category.is_empty()),
        "normalized record with empty title or category"
    );

    let facets = browser.facets();
    ensure!(
        facets.categories.windows(2).all(|w| w[0] < w[1]),
        "categories not strictly sorted: {:?}",
        facets.categories
    );
    ensure!(
        !facets.categories.iter().any(|c| c == ALL_CATEGORIES),
        "facet list leaked the all sentinel"
    );
    ensure!(
        facets.tags.iter().all(|t| t.count > 1),
        "facet tag with a single occurrence"
    );

    let view = browser.results();
    let page_size = browser.page().page_size();
    ensure!(
        view.items.len() == catalog.len().min(page_size),
        "first page shows {} of {}",
        view.items.len(),
        catalog.len()
    );
    ensure!(view.has_more == (catalog.len() > page_size), "has_more mismatch");
    ensure!(browser.sort_mode() == SortMode::Curated, "default sort not curated");

    let spotlight = browser.spotlight();
    if catalog.is_empty() {
        ensure!(
            spotlight.state() == SpotlightState::Empty,
            "spotlight active on an empty catalog"
        );
    } else {
        ensure!(spotlight.is_in_pool(), "spotlight not initialized from pool");
    }
    ensure!(!browser.playback().is_open(), "session open after load");
    Ok(())
}
