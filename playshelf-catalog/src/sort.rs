//! Sort modes and the sort engine.
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::UnknownSortMode;
use crate::record::GameRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortMode {
    /// Featured first, then title ascending.
    #[default]
    Curated,
    AlphabeticalAscending,
    AlphabeticalDescending,
    ByCategory,
    Random,
}

impl SortMode {
    pub const ALL: [Self; 5] = [
        Self::Curated,
        Self::AlphabeticalAscending,
        Self::AlphabeticalDescending,
        Self::ByCategory,
        Self::Random,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Curated => "curated",
            Self::AlphabeticalAscending => "alphabetical-ascending",
            Self::AlphabeticalDescending => "alphabetical-descending",
            Self::ByCategory => "by-category",
            Self::Random => "random",
        }
    }

    #[must_use]
    pub const fn is_deterministic(self) -> bool {
        !matches!(self, Self::Random)
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SortMode {
    type Err = UnknownSortMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "curated" | "default" => Ok(Self::Curated),
            "alphabetical-ascending" | "az" | "a-z" => Ok(Self::AlphabeticalAscending),
            "alphabetical-descending" | "za" | "z-a" => Ok(Self::AlphabeticalDescending),
            "by-category" | "category" => Ok(Self::ByCategory),
            "random" | "shuffle" => Ok(Self::Random),
            other => Err(UnknownSortMode(other.to_string())),
        }
    }
}

/// Case-folded comparison with a raw-text tie-break, so distinct strings
/// never compare equal.
#[must_use]
pub fn collate(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| a.cmp(b))
}

fn by_title(a: &GameRecord, b: &GameRecord) -> Ordering {
    collate(&a.title, &b.title).then_with(|| a.id.cmp(&b.id))
}

/// Total order used by every mode except `Random`.
#[must_use]
pub fn compare(mode: SortMode, a: &GameRecord, b: &GameRecord) -> Ordering {
    match mode {
        SortMode::Curated | SortMode::Random => {
            b.featured.cmp(&a.featured).then_with(|| by_title(a, b))
        }
        SortMode::AlphabeticalAscending => by_title(a, b),
        SortMode::AlphabeticalDescending => {
            collate(&b.title, &a.title).then_with(|| a.id.cmp(&b.id))
        }
        SortMode::ByCategory => collate(&a.category, &b.category).then_with(|| by_title(a, b)),
    }
}

/// Return a newly ordered copy of `subset`. `Random` draws a fresh
/// Fisher-Yates shuffle from `rng`; other modes never touch it.
#[must_use]
pub fn sort<'a, R>(subset: &[&'a GameRecord], mode: SortMode, rng: &mut R) -> Vec<&'a GameRecord>
where
    R: Rng + ?Sized,
{
    let mut ordered = subset.to_vec();
    if mode == SortMode::Random {
        ordered.shuffle(rng);
    } else {
        ordered.sort_by(|a, b| compare(mode, a, b));
    }
    ordered
}
