use colored::Colorize;
use playshelf_catalog::constants::ALL_CATEGORIES;
use playshelf_catalog::{
    Catalog, Facets, GameRecord, Notice, NoticeKind, PlaybackSession, PlaybackState, Renderer,
    ResultsView, Spotlight, TagChips, Ticker,
};

/// Text renderer for the terminal. Lines are buffered so the caller decides
/// where they go.
#[derive(Debug, Default)]
pub struct ConsoleRenderer {
    lines: Vec<String>,
    verbose: bool,
}

impl ConsoleRenderer {
    pub fn new(verbose: bool) -> Self {
        Self {
            lines: Vec::new(),
            verbose,
        }
    }

    pub fn drain(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }

    fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    fn card(record: &GameRecord) -> String {
        let star = if record.featured { " ★" } else { "" };
        let tags = if record.tags.is_empty() {
            String::new()
        } else {
            format!(" #{}", record.tags.join(" #"))
        };
        format!(
            "#{:<3} {}{} [{}]{}",
            record.id,
            record.title.bold(),
            star.yellow(),
            record.category.cyan(),
            tags.dimmed()
        )
    }
}

impl Renderer for ConsoleRenderer {
    fn render_results(&mut self, results: &ResultsView<'_>) {
        if results.is_empty() {
            self.push(format!("{}", "No games match your filters.".yellow()));
            return;
        }
        self.push(format!(
            "{} showing {} of {}",
            "🎮".bold(),
            results.items.len(),
            results.total
        ));
        let stats = results.stats;
        self.push(format!(
            "   {} in view · {} categories · {} featured",
            stats.total, stats.categories, stats.featured
        ));
        for record in &results.items {
            self.push(format!("  {}", Self::card(record)));
            if self.verbose {
                self.push(format!("       {}", record.description.dimmed()));
            }
        }
        if results.has_more {
            let remaining = results.total.saturating_sub(results.items.len());
            self.push(format!("  {}", format!("… load more ({remaining} remaining)").blue()));
        }
    }

    fn render_catalog(&mut self, catalog: &Catalog) {
        self.push(format!(
            "{} generation {}: {} games",
            "📚 Catalog".bright_cyan().bold(),
            catalog.generation(),
            catalog.len()
        ));
    }

    fn render_facets(&mut self, facets: &Facets, chips: &TagChips) {
        let mut categories = vec![ALL_CATEGORIES.to_string()];
        categories.extend(facets.categories.iter().cloned());
        self.push(format!("Categories: {}", categories.join(", ")));
        let counts: Vec<String> = facets
            .tags
            .iter()
            .map(|t| format!("{}({})", t.tag, t.count))
            .collect();
        if chips.fallback {
            self.push(format!("Tags (suggested): {}", chips.labels.join(", ")));
        } else {
            self.push(format!("Tags: {}", counts.join(", ")));
        }
        self.push(format!(
            "{} featured across {} categories",
            facets.stats.featured, facets.stats.categories
        ));
    }

    fn render_spotlight(&mut self, record: Option<&GameRecord>, spotlight: &Spotlight) {
        match record {
            Some(record) => {
                let position = spotlight
                    .pool()
                    .iter()
                    .position(|id| *id == record.id)
                    .map_or_else(|| "focused".to_string(), |i| format!("{}/{}", i + 1, spotlight.pool().len()));
                self.push(format!(
                    "{} {} ({position})",
                    "🔦 Spotlight:".magenta().bold(),
                    Self::card(record)
                ));
            }
            None => self.push(format!("{} none", "🔦 Spotlight:".magenta().bold())),
        }
    }

    fn render_playback(&mut self, session: &PlaybackSession, recent: &[&GameRecord]) {
        match session.state() {
            PlaybackState::Closed => self.push(format!("{}", "⏹  Player closed".dimmed())),
            PlaybackState::Open { record, embedded } => {
                let detail = if *embedded {
                    format!("embedded {}", record.play_url)
                } else if record.is_playable() {
                    "ready to play".to_string()
                } else {
                    "no playable link".red().to_string()
                };
                self.push(format!(
                    "{} {} ({detail})",
                    "▶  Playing".green().bold(),
                    record.title.bold()
                ));
            }
        }
        if !recent.is_empty() {
            let titles: Vec<&str> = recent.iter().map(|r| r.title.as_str()).collect();
            self.push(format!("Recently opened: {}", titles.join(", ")));
        }
    }

    fn render_ticker(&mut self, ticker: &Ticker) {
        if ticker.items().is_empty() {
            return;
        }
        let entries: Vec<String> = ticker
            .items()
            .iter()
            .map(|item| format!("{} · {} · #{}", item.title, item.category, item.lead_tag))
            .collect();
        self.push(format!("{} {}", "📰 Live:".bright_blue().bold(), entries.join(" | ")));
        let picks: Vec<&str> = ticker
            .quick_picks()
            .iter()
            .map(|item| item.title.as_str())
            .collect();
        self.push(format!("Quick picks: {}", picks.join(", ")));
    }

    fn notify(&mut self, notice: &Notice) {
        let line = match notice.kind {
            NoticeKind::Error => format!("⚠️  {}", notice.message).red().to_string(),
            NoticeKind::Info => format!("ℹ️  {}", notice.message),
        };
        self.push(line);
    }
}
