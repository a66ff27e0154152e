use colored::Colorize;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::common::scenario::{CatalogScenario, ScenarioCtx};

/// Outcome of one scenario under one base seed. Timings are serialized as
/// whole microseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub scenario_name: String,
    pub seed: u64,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    #[serde(with = "micros")]
    pub average_duration: Duration,
    #[serde(with = "micros")]
    pub slowest_duration: Duration,
}

#[derive(Default)]
struct Tally {
    passed: usize,
    elapsed: Duration,
    slowest: Duration,
    failures: Vec<String>,
}

impl Tally {
    fn pass(&mut self, took: Duration) {
        self.passed += 1;
        self.elapsed += took;
        self.slowest = self.slowest.max(took);
    }

    fn average(&self) -> Duration {
        u32::try_from(self.passed)
            .ok()
            .and_then(|passed| self.elapsed.checked_div(passed))
            .unwrap_or_default()
    }
}

/// Runs registered catalog scenarios against one catalog text.
pub struct LogicTester<'a> {
    catalog_json: &'a str,
    verbose: bool,
}

impl<'a> LogicTester<'a> {
    pub const fn new(catalog_json: &'a str, verbose: bool) -> Self {
        Self {
            catalog_json,
            verbose,
        }
    }

    pub fn run_scenario(
        &self,
        scenario: &CatalogScenario,
        seeds: &[u64],
        iterations: usize,
    ) -> Vec<ScenarioResult> {
        seeds
            .iter()
            .map(|&seed| {
                if self.verbose {
                    println!(
                        "🧪 Checking {} (seed {seed})",
                        scenario.key().bright_white()
                    );
                }
                self.run_seed(scenario, seed, iterations)
            })
            .collect()
    }

    /// Iteration `i` runs with `seed + i` so each one samples a fresh catalog walk.
    fn run_seed(&self, scenario: &CatalogScenario, seed: u64, iterations: usize) -> ScenarioResult {
        let mut tally = Tally::default();
        for offset in 0..iterations {
            let iteration_seed = seed.wrapping_add(offset as u64);
            let ctx = ScenarioCtx {
                catalog_json: self.catalog_json,
                seed: iteration_seed,
                verbose: self.verbose,
            };
            let started = Instant::now();
            let outcome = scenario.run(&ctx);
            let took = started.elapsed();
            match outcome {
                Ok(()) => {
                    tally.pass(took);
                    if self.verbose {
                        println!("  ✅ {}/{iterations} in {took:?}", offset + 1);
                    }
                }
                Err(err) => {
                    let message =
                        format!("Iteration {} (seed {iteration_seed}): {err:#}", offset + 1);
                    if self.verbose {
                        println!("  ❌ {}", message.red());
                    }
                    log::debug!("{} failed: {message}", scenario.key());
                    tally.failures.push(message);
                }
            }
        }

        ScenarioResult {
            scenario_name: scenario.key().to_string(),
            seed,
            passed: tally.failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: tally.passed,
            average_duration: tally.average(),
            slowest_duration: tally.slowest,
            failures: tally.failures,
        }
    }
}

mod micros {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(u64::try_from(value.as_micros()).unwrap_or(u64::MAX))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_micros)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::scenario::get_scenario;
    use anyhow::bail;

    fn always_fails(_ctx: &ScenarioCtx<'_>) -> anyhow::Result<()> {
        bail!("nope")
    }

    fn odd_seeds_fail(ctx: &ScenarioCtx<'_>) -> anyhow::Result<()> {
        if ctx.seed % 2 == 1 {
            bail!("odd");
        }
        Ok(())
    }

    #[test]
    fn runs_one_result_per_seed() {
        let tester = LogicTester::new("[]", false);
        let smoke = get_scenario("smoke").unwrap();
        let results = tester.run_scenario(&smoke, &[1, 2, 3], 2);
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.passed && r.successful_iterations == 2));
        assert!(results.iter().all(|r| r.slowest_duration >= r.average_duration));
        assert_eq!(results[1].seed, 2);
    }

    #[test]
    fn failures_are_collected_with_iteration_seed() {
        let tester = LogicTester::new("[]", false);
        let scenario = CatalogScenario::new("broken", "always fails", always_fails);
        let results = tester.run_scenario(&scenario, &[10], 3);
        let result = &results[0];
        assert!(!result.passed);
        assert_eq!(result.failures.len(), 3);
        assert!(result.failures[2].contains("seed 12"));
        assert_eq!(result.average_duration, Duration::ZERO);
        assert_eq!(result.slowest_duration, Duration::ZERO);
    }

    #[test]
    fn partial_failures_still_fail_the_seed() {
        let tester = LogicTester::new("[]", false);
        let scenario = CatalogScenario::new("flaky", "odd seeds fail", odd_seeds_fail);
        let result = &tester.run_scenario(&scenario, &[4], 4)[0];
        assert!(!result.passed);
        assert_eq!(result.successful_iterations, 2);
        assert!(result.failures[0].starts_with("Iteration 2 (seed 5)"));
    }

    #[test]
    fn tally_averages_only_passing_runs() {
        let mut tally = Tally::default();
        assert_eq!(tally.average(), Duration::ZERO);
        tally.pass(Duration::from_micros(100));
        tally.pass(Duration::from_micros(300));
        assert_eq!(tally.passed, 2);
        assert_eq!(tally.average(), Duration::from_micros(200));
        assert_eq!(tally.slowest, Duration::from_micros(300));
    }

    #[test]
    fn durations_serialize_as_micros() {
        let result = ScenarioResult {
            scenario_name: "smoke".into(),
            seed: 1,
            passed: true,
            iterations_run: 1,
            successful_iterations: 1,
            failures: Vec::new(),
            average_duration: Duration::from_millis(2),
            slowest_duration: Duration::from_micros(2500),
        };
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value["average_duration"], 2000);
        assert_eq!(value["slowest_duration"], 2500);
        let back: ScenarioResult = serde_json::from_value(value).unwrap();
        assert_eq!(back.slowest_duration, Duration::from_micros(2500));
    }
}
