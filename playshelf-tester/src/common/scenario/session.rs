use anyhow::{Result, ensure};
use playshelf_catalog::constants::{QUICK_PICK_COUNT, TICKER_FALLBACK_TAG};
use playshelf_catalog::{
    CatalogBrowser, Facets, LoadStatus, NoticeKind, QueryDebouncer, RngBundle, SpotlightState,
};
use rand::Rng;
use std::time::Duration;

use super::{CatalogScenario, ScenarioCtx};

pub fn scenarios() -> Vec<CatalogScenario> {
    vec![
        CatalogScenario::new(
            "playback-lifecycle",
            "Open, embed, reopen, and close never leave content mounted",
            playback_lifecycle,
        ),
        CatalogScenario::new(
            "recently-opened",
            "Recent list is most-recent-first, deduplicated, and bounded",
            recently_opened,
        ),
        CatalogScenario::new(
            "surprise-me",
            "Surprise picks from filtered results, else from the whole catalog",
            surprise_me,
        ),
        CatalogScenario::new(
            "ticker-rotation",
            "Ticker samples distinct records with a lead tag",
            ticker_rotation,
        ),
        CatalogScenario::new(
            "load-failure",
            "A broken catalog leaves the safe empty state and a notice",
            load_failure,
        ),
        CatalogScenario::new(
            "query-debounce",
            "Rapid keystrokes reach the filter once",
            query_debounce,
        ),
    ]
}

fn playback_lifecycle(ctx: &ScenarioCtx<'_>) -> Result<()> {
    let mut browser = ctx.browser()?;
    let mut rng = ctx.sampler();
    let len = browser.catalog().len();
    if len == 0 {
        ensure!(!browser.open(0), "opened a record in an empty catalog");
        return Ok(());
    }
    for _ in 0..16 {
        let id = rng.gen_range(0..len);
        ensure!(browser.open(id), "could not open {id}");
        ensure!(!browser.playback().is_embedded(), "reopen kept content mounted");
        let playable = browser.playback().is_playable();
        let url = browser.embed();
        ensure!(url.is_some() == playable, "embed disagrees with playability for {id}");
        ensure!(browser.playback().is_embedded() == playable, "embedded flag wrong");
        if rng.gen_bool(0.5) {
            let released = browser.close();
            ensure!(released == playable, "close misreported mounted content");
            ensure!(!browser.playback().is_open(), "session open after close");
            ensure!(!browser.playback().is_embedded(), "content still mounted after close");
        }
    }
    browser.close();
    ensure!(!browser.close(), "second close reported mounted content");
    Ok(())
}

fn recently_opened(ctx: &ScenarioCtx<'_>) -> Result<()> {
    let mut browser = ctx.browser()?;
    let mut rng = ctx.sampler();
    let len = browser.catalog().len();
    let limit = browser.config().recent_limit;
    let mut opened = Vec::new();
    for _ in 0..12.min(len * 3) {
        let id = rng.gen_range(0..len);
        browser.open(id);
        opened.retain(|existing| *existing != id);
        opened.insert(0, id);
        opened.truncate(limit);
        let recent: Vec<usize> = browser.recent().iter().map(|r| r.id).collect();
        ensure!(recent == opened, "recent {recent:?} expected {opened:?}");
    }
    browser.reset_filters();
    ensure!(browser.recent().len() == opened.len(), "reset cleared the recent list");
    Ok(())
}

fn surprise_me(ctx: &ScenarioCtx<'_>) -> Result<()> {
    let mut browser = ctx.browser()?;
    if browser.catalog().is_empty() {
        ensure!(browser.surprise_me().is_none(), "surprise on an empty catalog");
        return Ok(());
    }
    let featured: Vec<usize> = browser
        .catalog()
        .iter()
        .filter(|r| r.featured)
        .map(|r| r.id)
        .collect();
    browser.set_featured_only(true);
    for _ in 0..8 {
        let picked = browser.surprise_me();
        ensure!(picked.is_some(), "surprise returned nothing");
        let id = picked.unwrap_or_default();
        if !featured.is_empty() {
            ensure!(featured.contains(&id), "surprise {id} escaped the filter");
        }
        ensure!(
            browser.playback().active().map(|r| r.id) == Some(id),
            "surprise did not open its pick"
        );
    }
    browser.set_query("\u{1F47E} no title contains this");
    let picked = browser.surprise_me();
    ensure!(
        picked.is_some_and(|id| id < browser.catalog().len()),
        "surprise with no matches must fall back to the catalog"
    );
    Ok(())
}

fn ticker_rotation(ctx: &ScenarioCtx<'_>) -> Result<()> {
    let mut browser = ctx.browser()?;
    let size = browser.config().ticker_size;
    for _ in 0..6 {
        let ticker = browser.ticker();
        let expected = size.min(browser.catalog().len());
        ensure!(ticker.items().len() == expected, "ticker size {}", ticker.items().len());
        ensure!(
            ticker.quick_picks().len() == expected.min(QUICK_PICK_COUNT),
            "quick picks size"
        );
        let mut ids: Vec<usize> = ticker.items().iter().map(|item| item.id).collect();
        ids.sort_unstable();
        ids.dedup();
        ensure!(ids.len() == expected, "ticker repeated a record");
        for item in ticker.items() {
            let record = browser.catalog().get(item.id);
            let lead = record
                .and_then(|r| r.lead_tag())
                .unwrap_or(TICKER_FALLBACK_TAG);
            ensure!(item.lead_tag == lead, "lead tag for {}", item.id);
        }
        browser.refresh_ticker();
    }
    Ok(())
}

fn load_failure(ctx: &ScenarioCtx<'_>) -> Result<()> {
    let mut browser = CatalogBrowser::new(Default::default(), RngBundle::from_user_seed(ctx.seed));
    browser.load_json(ctx.catalog_json)?;
    let notice = browser.load_json("{\"truncated\": [")?;
    ensure!(
        notice.is_some_and(|n| n.kind == NoticeKind::Error),
        "failure produced no error notice"
    );
    ensure!(matches!(browser.status(), LoadStatus::Failed(_)), "status not failed");
    ensure!(browser.catalog().is_empty(), "catalog not emptied");
    ensure!(browser.facets() == &Facets::default(), "facets not emptied");
    ensure!(browser.spotlight().state() == SpotlightState::Empty, "spotlight not empty");
    ensure!(browser.ticker().items().is_empty(), "ticker not emptied");
    ensure!(browser.results().is_empty(), "results not emptied");
    ensure!(!browser.results().has_more, "load more offered on empty state");
    Ok(())
}

fn query_debounce(ctx: &ScenarioCtx<'_>) -> Result<()> {
    let browser = ctx.browser()?;
    let window = browser.config().debounce_window();
    let mut debouncer: QueryDebouncer<Duration> = QueryDebouncer::new(window);
    let typed = ["r", "re", "ret", "retr", "retro"];
    let mut delivered = Vec::new();
    let mut now = Duration::ZERO;
    for text in typed {
        debouncer.push(text, now);
        now += window / 2;
        delivered.extend(debouncer.poll(now));
    }
    now += window;
    delivered.extend(debouncer.poll(now));
    ensure!(delivered == vec!["retro".to_string()], "delivered {delivered:?}");
    ensure!(debouncer.poll(now + window).is_none(), "query delivered twice");
    Ok(())
}
