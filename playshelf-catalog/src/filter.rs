//! Filter criteria and the filter engine.
use serde::{Deserialize, Serialize};

use crate::constants::ALL_CATEGORIES;
use crate::record::GameRecord;

/// Category restriction: everything, or one named category.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryFilter {
    #[default]
    All,
    Named(String),
}

impl CategoryFilter {
    /// Interpret a selector value; blank or the "all" sentinel mean no
    /// restriction.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let label = label.trim();
        if label.is_empty() || label.eq_ignore_ascii_case(ALL_CATEGORIES) {
            Self::All
        } else {
            Self::Named(label.to_string())
        }
    }

    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::All => ALL_CATEGORIES,
            Self::Named(name) => name,
        }
    }

    #[must_use]
    pub fn matches(&self, category: &str) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => name == category,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    query: String,
    pub category: CategoryFilter,
    /// Single-select tag chip. The chip also matches a record whose category
    /// equals the label.
    pub tag: Option<String>,
    pub featured_only: bool,
}

impl FilterCriteria {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the query trimmed and lower-cased.
    pub fn set_query(&mut self, query: &str) {
        self.query = query.trim().to_lowercase();
    }

    #[must_use]
    pub fn with_query(mut self, query: &str) -> Self {
        self.set_query(query);
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: CategoryFilter) -> Self {
        self.category = category;
        self
    }

    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    #[must_use]
    pub const fn with_featured_only(mut self, featured_only: bool) -> Self {
        self.featured_only = featured_only;
        self
    }

    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        *self == Self::default()
    }

    #[must_use]
    pub fn matches(&self, record: &GameRecord) -> bool {
        matches_query(record, &self.query)
            && self.category.matches(&record.category)
            && matches_featured(record, self.featured_only)
            && matches_tag(record, self.tag.as_deref())
    }
}

/// Case-insensitive substring match over title, description, category, and
/// tags. `needle` must already be lower-cased; empty matches everything.
#[must_use]
pub fn matches_query(record: &GameRecord, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    let hit = |text: &str| text.to_lowercase().contains(needle);
    hit(record.title.as_str())
        || hit(record.description.as_str())
        || hit(record.category.as_str())
        || record.tags.iter().any(|tag| hit(tag.as_str()))
}

#[must_use]
pub const fn matches_featured(record: &GameRecord, featured_only: bool) -> bool {
    !featured_only || record.featured
}

#[must_use]
pub fn matches_tag(record: &GameRecord, tag: Option<&str>) -> bool {
    tag.is_none_or(|tag| record.has_tag(tag) || record.category == tag)
}

/// Records matching `criteria`, in catalog order.
#[must_use]
pub fn filter<'a, I>(records: I, criteria: &FilterCriteria) -> Vec<&'a GameRecord>
where
    I: IntoIterator<Item = &'a GameRecord>,
{
    records
        .into_iter()
        .filter(|record| criteria.matches(record))
        .collect()
}
