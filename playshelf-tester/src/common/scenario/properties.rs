use anyhow::{Result, ensure};
use playshelf_catalog::filter::{matches_featured, matches_query, matches_tag};
use playshelf_catalog::{
    Direction, EngineConfig, GameRecord, PageState, SortMode, filter, normalize_record, sort,
    visible,
};
use rand::seq::SliceRandom;

use super::{CatalogScenario, ScenarioCtx, sample_criteria};

const SAMPLES: usize = 24;

pub fn scenarios() -> Vec<CatalogScenario> {
    vec![
        CatalogScenario::new(
            "normalize-idempotence",
            "Re-normalizing a normalized record changes nothing",
            normalize_idempotence,
        ),
        CatalogScenario::new(
            "filter-soundness",
            "Every match satisfies each active predicate, in catalog order",
            filter_soundness,
        ),
        CatalogScenario::new(
            "filter-commutativity",
            "Predicate order never changes the matching subset",
            filter_commutativity,
        ),
        CatalogScenario::new(
            "sort-stability",
            "Deterministic modes repeat; curated puts featured first",
            sort_stability,
        ),
        CatalogScenario::new(
            "pager-monotonicity",
            "Visible prefix only grows and never exceeds the result set",
            pager_monotonicity,
        ),
        CatalogScenario::new(
            "random-prefix",
            "Loading more under random order extends the same shuffle",
            random_prefix,
        ),
        CatalogScenario::new(
            "spotlight-wraparound",
            "A full lap of shifts returns to the starting record",
            spotlight_wraparound,
        ),
        CatalogScenario::new(
            "reset-round-trip",
            "Reset reproduces the unfiltered first curated page",
            reset_round_trip,
        ),
    ]
}

fn ids(records: &[&GameRecord]) -> Vec<usize> {
    records.iter().map(|record| record.id).collect()
}

fn normalize_idempotence(ctx: &ScenarioCtx<'_>) -> Result<()> {
    let browser = ctx.browser()?;
    for record in browser.catalog() {
        let again = normalize_record(&serde_json::to_value(record)?, record.id);
        ensure!(&again == record, "record {} changed on re-normalization", record.id);
    }
    Ok(())
}

fn filter_soundness(ctx: &ScenarioCtx<'_>) -> Result<()> {
    let browser = ctx.browser()?;
    let mut rng = ctx.sampler();
    let mut matched_total = 0;
    for _ in 0..SAMPLES {
        let criteria = sample_criteria(&browser, &mut rng);
        let matched = filter(browser.catalog(), &criteria);
        matched_total += matched.len();
        for record in &matched {
            ensure!(matches_query(record, criteria.query()), "query {:?} vs {}", criteria.query(), record.id);
            ensure!(criteria.category.matches(&record.category), "category vs {}", record.id);
            ensure!(matches_featured(record, criteria.featured_only), "featured vs {}", record.id);
            ensure!(matches_tag(record, criteria.tag.as_deref()), "tag vs {}", record.id);
        }
        ensure!(
            ids(&matched).windows(2).all(|w| w[0] < w[1]),
            "filter reordered the catalog"
        );
    }
    if ctx.verbose {
        println!("     filter-soundness: {matched_total} matches over {SAMPLES} samples");
    }
    Ok(())
}

fn filter_commutativity(ctx: &ScenarioCtx<'_>) -> Result<()> {
    let browser = ctx.browser()?;
    let mut rng = ctx.sampler();
    for _ in 0..SAMPLES {
        let criteria = sample_criteria(&browser, &mut rng);
        let mut order = [0_u8, 1, 2, 3];
        order.shuffle(&mut rng);
        let check = |record: &GameRecord, which: u8| match which {
            0 => matches_query(record, criteria.query()),
            1 => criteria.category.matches(&record.category),
            2 => matches_featured(record, criteria.featured_only),
            _ => matches_tag(record, criteria.tag.as_deref()),
        };
        let chained: Vec<usize> = browser
            .catalog()
            .iter()
            .filter(|record| order.iter().all(|which| check(*record, *which)))
            .map(|record| record.id)
            .collect();
        ensure!(
            chained == ids(&filter(browser.catalog(), &criteria)),
            "predicate order {order:?} changed the subset"
        );
    }
    Ok(())
}

fn sort_stability(ctx: &ScenarioCtx<'_>) -> Result<()> {
    let browser = ctx.browser()?;
    let all: Vec<&GameRecord> = browser.catalog().iter().collect();
    let mut rng = ctx.sampler();
    for mode in SortMode::ALL.into_iter().filter(|mode| mode.is_deterministic()) {
        let first = sort(&all, mode, &mut rng);
        let second = sort(&all, mode, &mut rng);
        ensure!(ids(&first) == ids(&second), "{mode} is not repeatable");
    }
    let curated = sort(&all, SortMode::Curated, &mut rng);
    let boundary = curated.iter().take_while(|record| record.featured).count();
    ensure!(
        curated[boundary..].iter().all(|record| !record.featured),
        "featured record after a non-featured one in curated order"
    );
    let mut shuffled = ids(&sort(&all, SortMode::Random, &mut rng));
    shuffled.sort_unstable();
    ensure!(shuffled == ids(&all), "random order is not a permutation");
    Ok(())
}

fn pager_monotonicity(ctx: &ScenarioCtx<'_>) -> Result<()> {
    let browser = ctx.browser()?;
    let all: Vec<&GameRecord> = browser.catalog().iter().collect();
    for size in [1, 3, 7, 24] {
        let mut page = PageState::new(size);
        let mut previous = 0;
        for _ in 0..=all.len() {
            let shown = visible(&all, &page).len();
            ensure!(shown >= previous, "page size {size}: shrank from {previous} to {shown}");
            ensure!(shown <= all.len(), "page size {size}: overshot");
            ensure!(
                page.has_more(all.len()) == (shown < all.len()),
                "page size {size}: has_more disagrees with visible count"
            );
            previous = shown;
            page = page.advance();
        }
    }
    Ok(())
}

fn random_prefix(ctx: &ScenarioCtx<'_>) -> Result<()> {
    let config = EngineConfig {
        page_size: 4,
        ..EngineConfig::default()
    };
    let mut browser = ctx.browser_with(config)?;
    browser.set_sort_mode(SortMode::Random);
    let mut previous: Vec<usize> = Vec::new();
    loop {
        let current: Vec<usize> = browser.results().items.iter().map(|r| r.id).collect();
        ensure!(
            current.starts_with(&previous),
            "load more reshuffled the visible prefix"
        );
        previous = current;
        if !browser.load_more() {
            break;
        }
    }
    ensure!(previous.len() == browser.catalog().len(), "did not reach the end");
    Ok(())
}

fn spotlight_wraparound(ctx: &ScenarioCtx<'_>) -> Result<()> {
    let mut browser = ctx.browser()?;
    let start = browser.spotlight().current_id();
    let lap = browser.spotlight().pool().len();
    for direction in [Direction::Next, Direction::Previous] {
        for _ in 0..lap {
            browser.spotlight_shift(direction);
            ensure!(
                browser.spotlight().is_in_pool() || lap == 0,
                "shift left the pool"
            );
        }
        ensure!(
            browser.spotlight().current_id() == start,
            "{direction:?} lap of {lap} did not return to start"
        );
    }
    Ok(())
}

fn reset_round_trip(ctx: &ScenarioCtx<'_>) -> Result<()> {
    let mut browser = ctx.browser_with(EngineConfig {
        page_size: 6,
        ..EngineConfig::default()
    })?;
    let pristine: Vec<usize> = browser.results().items.iter().map(|r| r.id).collect();
    let mut rng = ctx.sampler();
    for _ in 0..SAMPLES {
        browser.set_criteria(sample_criteria(&browser, &mut rng));
        if let Some(mode) = SortMode::ALL.choose(&mut rng) {
            browser.set_sort_mode(*mode);
        }
        browser.load_more();
        browser.reset_filters();
        let view = browser.results();
        ensure!(
            view.items.iter().map(|r| r.id).collect::<Vec<_>>() == pristine,
            "reset did not restore the default view"
        );
        ensure!(view.total == browser.catalog().len(), "reset left a filter active");
        ensure!(browser.page().page_index() == 0, "reset left the page advanced");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIVE: &str = r#"[
        { "title": "A", "category": "Arcade",   "tags": ["retro"],         "featured": true  },
        { "title": "B", "category": "Puzzle",   "tags": ["logic"],         "featured": false },
        { "title": "C", "category": "Arcade",   "tags": ["retro", "fast"], "featured": false },
        { "title": "D", "category": "Strategy", "tags": [],                "featured": true  },
        { "title": "E", "category": "Puzzle",   "tags": ["logic"],         "featured": false }
    ]"#;

    #[test]
    fn property_scenarios_hold_on_five_record_catalog() {
        for seed in 0..8 {
            let ctx = ScenarioCtx {
                catalog_json: FIVE,
                seed,
                verbose: false,
            };
            for scenario in scenarios() {
                scenario
                    .run(&ctx)
                    .unwrap_or_else(|err| panic!("{} seed {seed}: {err:#}", scenario.key()));
            }
        }
    }

    #[test]
    fn property_scenarios_tolerate_empty_catalog() {
        let ctx = ScenarioCtx {
            catalog_json: "[]",
            seed: 2,
            verbose: false,
        };
        for scenario in scenarios() {
            scenario.run(&ctx).unwrap();
        }
    }
}
