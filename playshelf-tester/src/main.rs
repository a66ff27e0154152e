mod common;
mod console;
mod logic;
mod script;

use anyhow::{Context, Result, bail};
use clap::Parser;
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use common::scenario::{expand_scenarios, get_scenario, list_scenarios};
use common::{FileSource, parse_seeds, run_stamp, split_csv};
use console::ConsoleRenderer;
use logic::{LogicTester, ScenarioResult};
use playshelf_catalog::{
    CatalogEngine, CategoryFilter, EngineConfig, LoadStatus, Presenter, SortMode, UnknownSortMode,
};
use script::{ScriptRunner, parse_script};

#[derive(Debug, Parser)]
#[command(name = "playshelf-tester", version = "0.3.0")]
#[command(about = "Browse a Playshelf game catalog in the terminal and run catalog QA scenarios")]
struct Args {
    /// Catalog JSON file
    #[arg(long, default_value = "data/games.json")]
    catalog: PathBuf,

    /// Optional engine tuning file (JSON, every field optional)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for spotlight, shuffle, ticker, and surprise picks (random if omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Free-text search
    #[arg(long)]
    query: Option<String>,

    /// Category name, or "all"
    #[arg(long)]
    category: Option<String>,

    /// Tag to filter by
    #[arg(long)]
    tag: Option<String>,

    /// Only show featured games
    #[arg(long)]
    featured_only: bool,

    /// Sort mode: curated, az, za, category, random
    #[arg(long, value_parser = parse_sort)]
    sort: Option<SortMode>,

    /// Number of result pages to show
    #[arg(long, default_value_t = 1)]
    pages: usize,

    /// Replay interaction commands from a file
    #[arg(long)]
    script: Option<PathBuf>,

    /// List all available scenarios and exit
    #[arg(long)]
    list_scenarios: bool,

    /// Scenarios to run (comma-separated, or "all"); switches to QA mode
    #[arg(long)]
    scenarios: Option<String>,

    /// Seeds to run scenarios with (comma-separated, decimal or 0x hex)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of iterations per scenario and seed
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Output report format
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["console", "json", "markdown"])]
    report: String,

    /// Optional path to write output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn parse_sort(value: &str) -> Result<SortMode, UnknownSortMode> {
    value.parse()
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_scenarios(&args)? {
        return Ok(());
    }

    announce_banner();

    if let Some(requested) = args.scenarios.as_deref() {
        let results = run_scenarios(&args, requested).await?;
        if results.iter().any(|r| !r.passed) {
            std::process::exit(1);
        }
        return Ok(());
    }

    browse(&args).await
}

fn maybe_list_scenarios(args: &Args) -> Result<bool> {
    if !args.list_scenarios {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available scenarios:")?;
    for (key, description) in list_scenarios() {
        writeln!(output_target.writer(), "  {key:25} - {description}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🎮 Playshelf Catalog Tester".bright_cyan().bold());
    println!("{}", "===========================".cyan());
}

fn load_config(args: &Args) -> Result<EngineConfig> {
    let Some(path) = args.config.as_ref() else {
        return Ok(EngineConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    EngineConfig::from_json(&text).with_context(|| format!("invalid config {}", path.display()))
}

fn apply_criteria(args: &Args, presenter: &mut Presenter<ConsoleRenderer>) {
    if let Some(query) = args.query.as_deref() {
        presenter.set_query(query);
    }
    if let Some(category) = args.category.as_deref() {
        presenter.set_category(CategoryFilter::from_label(category));
    }
    if let Some(tag) = args.tag.as_deref() {
        presenter.toggle_tag(tag);
    }
    if args.featured_only {
        presenter.set_featured_only(true);
    }
    if let Some(mode) = args.sort {
        presenter.set_sort_mode(mode);
    }
    for _ in 1..args.pages.max(1) {
        if !presenter.load_more() {
            break;
        }
    }
}

async fn browse(args: &Args) -> Result<()> {
    let config = load_config(args)?;
    let debounce = config.debounce_window();
    let seed = args.seed.unwrap_or_else(rand::random);
    println!("🎲 Seed: {seed}");

    let engine = CatalogEngine::new(FileSource::new(&args.catalog), config);
    let mut presenter = engine
        .open_presenter(seed, ConsoleRenderer::new(args.verbose))
        .await;
    apply_criteria(args, &mut presenter);

    let stats = match args.script.as_ref() {
        Some(path) => {
            let text = tokio::fs::read_to_string(path)
                .await
                .with_context(|| format!("failed to read script {}", path.display()))?;
            let steps = parse_script(&text)
                .with_context(|| format!("invalid script {}", path.display()))?;
            Some(ScriptRunner::new(debounce).run(&mut presenter, &steps))
        }
        None => None,
    };

    let mut output_target = OutputTarget::new(args.output.clone())?;
    for line in presenter.renderer_mut().drain() {
        writeln!(output_target, "{line}")?;
    }
    if let Some(stats) = stats {
        writeln!(output_target)?;
        writeln!(
            output_target,
            "🏁 Script: {} steps, {} queries applied, {} ticker refreshes, {:?} simulated",
            stats.steps, stats.queries_applied, stats.ticker_refreshes, stats.elapsed
        )?;
    }
    output_target.flush_inner()?;

    if let LoadStatus::Failed(reason) = presenter.browser().status() {
        bail!("catalog {} failed to load: {reason}", args.catalog.display());
    }
    Ok(())
}

async fn run_scenarios(args: &Args, requested: &str) -> Result<Vec<ScenarioResult>> {
    let start_time = Instant::now();
    let catalog_json = tokio::fs::read_to_string(&args.catalog)
        .await
        .with_context(|| format!("failed to read catalog {}", args.catalog.display()))?;
    let seeds = parse_seeds(&args.seeds)?;
    let scenarios = expand_scenarios(&split_csv(requested));

    println!("{}", "🧠 Running Catalog Scenarios".bright_yellow().bold());
    println!("{}", "-".repeat(30).yellow());

    let tester = LogicTester::new(&catalog_json, args.verbose);
    let mut results = Vec::new();
    for name in &scenarios {
        match get_scenario(name) {
            Some(scenario) => {
                results.extend(tester.run_scenario(&scenario, &seeds, args.iterations));
            }
            None => eprintln!("⚠️  Unknown scenario: {}", name.yellow()),
        }
    }

    write_reports(args, &results, start_time)?;
    Ok(results)
}

fn write_reports(args: &Args, results: &[ScenarioResult], start_time: Instant) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => logic::reports::generate_json_report(&mut output_target, results)?,
        "markdown" => {
            if results.is_empty() {
                writeln!(
                    &mut output_target,
                    "# Playshelf Catalog Scenario Results\n\n_No scenarios executed._"
                )?;
            } else {
                let stamp = run_stamp();
                logic::reports::generate_markdown_report(&mut output_target, results, &stamp)?;
            }
        }
        _ => {
            if results.is_empty() {
                writeln!(&mut output_target, "No scenarios executed.")?;
            } else {
                logic::reports::generate_console_report(
                    &mut output_target,
                    results,
                    start_time.elapsed(),
                )?;
            }
            let duration = start_time.elapsed();
            writeln!(&mut output_target)?;
            writeln!(&mut output_target, "🏁 Total time: {duration:?}")?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
