use anyhow::{Context, Result};
use playshelf_catalog::{CatalogBrowser, CategoryFilter, EngineConfig, FilterCriteria, RngBundle};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

pub mod properties;
pub mod session;
pub mod smoke;

/// Inputs shared by every scenario run.
#[derive(Debug, Clone)]
pub struct ScenarioCtx<'a> {
    pub catalog_json: &'a str,
    pub seed: u64,
    pub verbose: bool,
}

impl ScenarioCtx<'_> {
    /// Fresh browser over the scenario catalog, seeded from the run seed.
    pub fn browser(&self) -> Result<CatalogBrowser> {
        self.browser_with(EngineConfig::default())
    }

    pub fn browser_with(&self, config: EngineConfig) -> Result<CatalogBrowser> {
        let mut browser = CatalogBrowser::new(config, RngBundle::from_user_seed(self.seed));
        let notice = browser
            .load_json(self.catalog_json)
            .context("starting catalog load")?;
        if let Some(notice) = notice {
            anyhow::bail!("catalog failed to load: {}", notice.message);
        }
        Ok(browser)
    }

    /// Sampling rng for scenario inputs, independent of the engine streams.
    pub fn sampler(&self) -> SmallRng {
        SmallRng::seed_from_u64(self.seed ^ 0x5EED_CA7A_1065)
    }
}

/// Random criteria drawn from the browser's own facets so they have a fair
/// chance of matching something.
pub fn sample_criteria(browser: &CatalogBrowser, rng: &mut SmallRng) -> FilterCriteria {
    let facets = browser.facets();
    let mut criteria = FilterCriteria::new();
    if rng.gen_bool(0.4) {
        let words: Vec<&str> = browser
            .catalog()
            .iter()
            .flat_map(|record| record.title.split_whitespace())
            .collect();
        if let Some(&word) = words.choose(rng) {
            let cut = word.len().min(rng.gen_range(2..=5));
            criteria.set_query(word.get(..cut).unwrap_or(word));
        }
    }
    if rng.gen_bool(0.4)
        && let Some(category) = facets.categories.choose(rng)
    {
        criteria.category = CategoryFilter::Named(category.clone());
    }
    if rng.gen_bool(0.4) {
        criteria.tag = browser.tag_chips().labels.choose(rng).cloned();
    }
    criteria.featured_only = rng.gen_bool(0.25);
    criteria
}

pub type ScenarioCheck = fn(&ScenarioCtx<'_>) -> Result<()>;

#[derive(Clone)]
pub struct CatalogScenario {
    key: &'static str,
    description: &'static str,
    check: ScenarioCheck,
}

impl CatalogScenario {
    pub const fn new(key: &'static str, description: &'static str, check: ScenarioCheck) -> Self {
        Self {
            key,
            description,
            check,
        }
    }

    #[must_use]
    pub const fn key(&self) -> &'static str {
        self.key
    }

    #[must_use]
    pub const fn description(&self) -> &'static str {
        self.description
    }

    /// Run the check once.
    ///
    /// # Errors
    ///
    /// Returns the first violated expectation.
    pub fn run(&self, ctx: &ScenarioCtx<'_>) -> Result<()> {
        (self.check)(ctx)
    }
}

fn registry() -> Vec<CatalogScenario> {
    let mut scenarios = vec![smoke::scenario()];
    scenarios.extend(properties::scenarios());
    scenarios.extend(session::scenarios());
    scenarios
}

pub fn get_scenario(name: &str) -> Option<CatalogScenario> {
    registry().into_iter().find(|scenario| scenario.key == name)
}

pub fn list_scenarios() -> Vec<(&'static str, &'static str)> {
    registry()
        .iter()
        .map(|scenario| (scenario.key(), scenario.description()))
        .collect()
}

/// Expand `all` into every registered key, keeping explicit names.
pub fn expand_scenarios(requested: &[String]) -> Vec<String> {
    let mut scenarios: Vec<String> = requested
        .iter()
        .filter(|name| name.as_str() != "all")
        .cloned()
        .collect();
    if requested.iter().any(|name| name == "all") {
        for (key, _) in list_scenarios() {
            if !scenarios.iter().any(|name| name == key) {
                scenarios.push(key.to_string());
            }
        }
    }
    scenarios
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = include_str!("../../../../data/games.json");

    #[test]
    fn scenario_keys_are_unique() {
        let keys: Vec<_> = list_scenarios().into_iter().map(|(key, _)| key).collect();
        let mut deduped = keys.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(keys.len(), deduped.len());
    }

    #[test]
    fn all_expands_without_duplicates() {
        let expanded = expand_scenarios(&["smoke".to_string(), "all".to_string()]);
        assert_eq!(expanded.len(), list_scenarios().len());
        assert_eq!(expanded[0], "smoke");
    }

    #[test]
    fn every_scenario_passes_on_bundled_catalog() {
        for seed in [1, 1337, 0xDEAD_BEEF] {
            let ctx = ScenarioCtx {
                catalog_json: FIXTURE,
                seed,
                verbose: false,
            };
            for (key, _) in list_scenarios() {
                let scenario = get_scenario(key).unwrap();
                scenario
                    .run(&ctx)
                    .unwrap_or_else(|err| panic!("{key} failed for seed {seed}: {err:#}"));
            }
        }
    }

    #[test]
    fn browser_rejects_broken_catalog() {
        let ctx = ScenarioCtx {
            catalog_json: "not json",
            seed: 1,
            verbose: false,
        };
        assert!(ctx.browser().is_err());
    }
}
