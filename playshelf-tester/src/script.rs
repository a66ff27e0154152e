//! Scripted interaction replay.
//!
//! One command per line, optionally prefixed with `+<ms>` to advance the
//! simulated clock first. Blank lines and `#` comments are ignored.
use playshelf_catalog::constants::TICKER_INTERVAL;
use playshelf_catalog::{
    CategoryFilter, Direction, Presenter, QueryDebouncer, Renderer, SortMode, UnknownSortMode,
};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Type(String),
    Category(CategoryFilter),
    Tag(String),
    Featured,
    Sort(SortMode),
    More,
    Reset,
    Next,
    Prev,
    ShuffleSpotlight,
    Focus(usize),
    Open(usize),
    Embed,
    Close,
    Surprise,
    Tick,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptStep {
    pub line: usize,
    pub delay: Duration,
    pub command: Command,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("line {line}: unknown command '{command}'")]
    UnknownCommand { line: usize, command: String },
    #[error("line {line}: '{command}' needs an argument")]
    MissingArgument { line: usize, command: String },
    #[error("line {line}: invalid id '{value}'")]
    InvalidId { line: usize, value: String },
    #[error("line {line}: invalid delay '{value}'")]
    InvalidDelay { line: usize, value: String },
    #[error("line {line}: {source}")]
    Sort {
        line: usize,
        #[source]
        source: UnknownSortMode,
    },
}

pub fn parse_script(text: &str) -> Result<Vec<ScriptStep>, ScriptError> {
    text.lines()
        .enumerate()
        .filter_map(|(index, raw)| {
            let trimmed = raw.trim();
            (!trimmed.is_empty() && !trimmed.starts_with('#')).then_some((index + 1, trimmed))
        })
        .map(|(line, trimmed)| parse_line(line, trimmed))
        .collect()
}

fn parse_line(line: usize, trimmed: &str) -> Result<ScriptStep, ScriptError> {
    let (delay, rest) = match trimmed.strip_prefix('+') {
        Some(after) => {
            let (value, rest) = after.split_once(char::is_whitespace).unwrap_or((after, ""));
            let millis = value.parse::<u64>().map_err(|_| ScriptError::InvalidDelay {
                line,
                value: value.to_string(),
            })?;
            (Duration::from_millis(millis), rest.trim())
        }
        None => (Duration::ZERO, trimmed),
    };
    let (name, argument) = rest
        .split_once(char::is_whitespace)
        .map_or((rest, ""), |(name, arg)| (name, arg.trim()));

    let require = |command: &str| {
        if argument.is_empty() {
            Err(ScriptError::MissingArgument {
                line,
                command: command.to_string(),
            })
        } else {
            Ok(argument.to_string())
        }
    };
    let id = |command: &str| {
        let value = require(command)?;
        value
            .parse::<usize>()
            .map_err(|_| ScriptError::InvalidId { line, value })
    };

    let command = match name {
        "type" => Command::Type(argument.to_string()),
        "category" => Command::Category(CategoryFilter::from_label(&require(name)?)),
        "tag" => Command::Tag(require(name)?),
        "featured" => Command::Featured,
        "sort" => Command::Sort(
            require(name)?
                .parse()
                .map_err(|source| ScriptError::Sort { line, source })?,
        ),
        "more" => Command::More,
        "reset" => Command::Reset,
        "next" => Command::Next,
        "prev" => Command::Prev,
        "shuffle-spotlight" => Command::ShuffleSpotlight,
        "focus" => Command::Focus(id(name)?),
        "open" => Command::Open(id(name)?),
        "embed" => Command::Embed,
        "close" => Command::Close,
        "surprise" => Command::Surprise,
        "tick" => Command::Tick,
        other => {
            return Err(ScriptError::UnknownCommand {
                line,
                command: other.to_string(),
            });
        }
    };
    Ok(ScriptStep {
        line,
        delay,
        command,
    })
}

/// What a replay did, for the run summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplayStats {
    pub steps: usize,
    pub queries_applied: usize,
    pub ticker_refreshes: usize,
    pub elapsed: Duration,
}

/// Replays steps on a simulated clock. `type` goes through the debouncer;
/// the ticker refreshes whenever the clock crosses its interval.
pub struct ScriptRunner {
    debouncer: QueryDebouncer<Duration>,
    now: Duration,
    last_tick: Duration,
    stats: ReplayStats,
}

impl ScriptRunner {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debouncer: QueryDebouncer::new(debounce),
            now: Duration::ZERO,
            last_tick: Duration::ZERO,
            stats: ReplayStats::default(),
        }
    }

    pub fn run<R: Renderer>(
        mut self,
        presenter: &mut Presenter<R>,
        steps: &[ScriptStep],
    ) -> ReplayStats {
        for step in steps {
            self.advance(presenter, step.delay);
            self.apply(presenter, step);
            self.stats.steps += 1;
        }
        if let Some(query) = self.debouncer.flush() {
            presenter.set_query(&query);
            self.stats.queries_applied += 1;
        }
        self.stats.elapsed = self.now;
        self.stats
    }

    fn advance<R: Renderer>(&mut self, presenter: &mut Presenter<R>, delay: Duration) {
        self.now += delay;
        if let Some(query) = self.debouncer.poll(self.now) {
            presenter.set_query(&query);
            self.stats.queries_applied += 1;
        }
        while self.now - self.last_tick >= TICKER_INTERVAL {
            self.last_tick += TICKER_INTERVAL;
            presenter.refresh_ticker();
            self.stats.ticker_refreshes += 1;
        }
    }

    fn apply<R: Renderer>(&mut self, presenter: &mut Presenter<R>, step: &ScriptStep) {
        log::debug!("script line {}: {:?}", step.line, step.command);
        match &step.command {
            Command::Type(text) => self.debouncer.push(text.clone(), self.now),
            Command::Category(category) => presenter.set_category(category.clone()),
            Command::Tag(tag) => presenter.toggle_tag(tag),
            Command::Featured => presenter.toggle_featured_only(),
            Command::Sort(mode) => presenter.set_sort_mode(*mode),
            Command::More => {
                if !presenter.load_more() {
                    log::info!("line {}: nothing more to load", step.line);
                }
            }
            Command::Reset => {
                // A query still inside the debounce window belongs to the cleared search box.
                if let Some(stale) = self.debouncer.flush() {
                    log::debug!("line {}: dropping pending query '{stale}'", step.line);
                }
                presenter.reset_filters();
            }
            Command::Next => presenter.spotlight_shift(Direction::Next),
            Command::Prev => presenter.spotlight_shift(Direction::Previous),
            Command::ShuffleSpotlight => presenter.spotlight_refresh(),
            Command::Focus(id) => {
                if !presenter.spotlight_focus(*id) {
                    log::warn!("line {}: no game with id {id}", step.line);
                }
            }
            Command::Open(id) => {
                if !presenter.open(*id) {
                    log::warn!("line {}: no game with id {id}", step.line);
                }
            }
            Command::Embed => {
                if presenter.embed().is_none() {
                    log::info!("line {}: nothing to embed", step.line);
                }
            }
            Command::Close => {
                presenter.close();
            }
            Command::Surprise => {
                if presenter.surprise_me().is_none() {
                    log::info!("line {}: catalog is empty", step.line);
                }
            }
            Command::Tick => {
                presenter.refresh_ticker();
                self.last_tick = self.now;
                self.stats.ticker_refreshes += 1;
            }
        }
    }
}
