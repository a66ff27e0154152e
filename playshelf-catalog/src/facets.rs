//! Facet derivation: category list, popular tags, and catalog stats.
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

use crate::constants::{DEFAULT_TAG_CHIPS, TAG_FACET_LIMIT};
use crate::record::{Catalog, GameRecord};

/// A tag together with how many records carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CatalogStats {
    pub total: usize,
    pub categories: usize,
    pub featured: usize,
}

impl CatalogStats {
    /// Counts over any record subset, such as the current filtered results.
    #[must_use]
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a GameRecord>,
    {
        let mut total = 0;
        let mut featured = 0;
        let mut categories = BTreeSet::new();
        for record in records {
            total += 1;
            featured += usize::from(record.featured);
            categories.insert(record.category.as_str());
        }
        Self {
            total,
            categories: categories.len(),
            featured,
        }
    }
}

/// Facets derived once per catalog load.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Facets {
    /// Distinct categories in lexicographic order. Does not include the
    /// "all" sentinel; consumers prepend it.
    pub categories: Vec<String>,
    pub tags: Vec<TagCount>,
    pub stats: CatalogStats,
}

impl Facets {
    #[must_use]
    pub fn build(catalog: &Catalog) -> Self {
        Self::build_with_limit(catalog, TAG_FACET_LIMIT)
    }

    #[must_use]
    pub fn build_with_limit(catalog: &Catalog, tag_limit: usize) -> Self {
        Self {
            stats: CatalogStats::from_records(catalog.iter()),
            categories: categories(catalog),
            tags: popular_tags(catalog, tag_limit),
        }
    }
}

#[must_use]
pub fn categories(catalog: &Catalog) -> Vec<String> {
    catalog
        .iter()
        .map(|record| record.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Tags seen on more than one record, most frequent first, ties in
/// first-occurrence order, truncated to `limit`.
#[must_use]
pub fn popular_tags(catalog: &Catalog, limit: usize) -> Vec<TagCount> {
    let mut first_seen: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for tag in catalog.iter().flat_map(|record| record.tags.iter()) {
        let count = counts.entry(tag.as_str()).or_insert(0);
        if *count == 0 {
            first_seen.push(tag.as_str());
        }
        *count += 1;
    }

    let mut ranked: Vec<TagCount> = first_seen
        .into_iter()
        .filter_map(|tag| {
            let count = counts.get(tag).copied().unwrap_or(0);
            (count > 1).then(|| TagCount {
                tag: tag.to_string(),
                count,
            })
        })
        .collect();
    // Stable sort keeps first-occurrence order among equal counts.
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(limit);
    ranked
}

/// Tag chips a renderer should display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagChips {
    pub labels: Vec<String>,
    /// True when `labels` is the fixed presentation fallback rather than
    /// facet output.
    pub fallback: bool,
}

/// Chip labels for the tag bar. Falls back to [`DEFAULT_TAG_CHIPS`] when the
/// catalog has no repeated tags; that list is presentation-only and never
/// part of [`Facets`].
#[must_use]
pub fn tag_chips(facets: &Facets) -> TagChips {
    if facets.tags.is_empty() {
        TagChips {
            labels: DEFAULT_TAG_CHIPS.iter().map(ToString::to_string).collect(),
            fallback: true,
        }
    } else {
        TagChips {
            labels: facets.tags.iter().map(|t| t.tag.clone()).collect(),
            fallback: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog(values: serde_json::Value) -> Catalog {
        Catalog::from_raw(values.as_array().unwrap())
    }

    #[test]
    fn categories_are_distinct_and_sorted() {
        let cat = catalog(json!([
            { "category": "Puzzle" },
            { "category": "Arcade" },
            {},
            { "category": "Strategy" },
            { "category": "Puzzle" }
        ]));
        assert_eq!(categories(&cat), vec!["Arcade", "Puzzle", "Strategy"]);
    }

    #[test]
    fn singleton_tags_are_excluded() {
        let cat = catalog(json!([
            { "tags": ["retro"] },
            { "tags": ["logic"] },
            { "tags": ["retro", "fast"] },
            { "tags": [] },
            { "tags": ["logic"] }
        ]));
        let tags = popular_tags(&cat, TAG_FACET_LIMIT);
        let labels: Vec<_> = tags.iter().map(|t| t.tag.as_str()).collect();
        assert_eq!(labels, vec!["retro", "logic"]);
        assert!(tags.iter().all(|t| t.count == 2));
    }

    #[test]
    fn higher_counts_rank_first_and_limit_applies() {
        let cat = catalog(json!([
            { "tags": ["a", "b"] },
            { "tags": ["b", "c"] },
            { "tags": ["b", "c", "a"] },
            { "tags": ["c"] }
        ]));
        let tags = popular_tags(&cat, 2);
        let labels: Vec<_> = tags.iter().map(|t| t.tag.as_str()).collect();
        assert_eq!(labels, vec!["b", "c"]);
    }

    #[test]
    fn chips_fall_back_when_no_repeated_tags() {
        let cat = catalog(json!([{ "tags": ["solo"] }]));
        let facets = Facets::build(&cat);
        assert!(facets.tags.is_empty());
        let chips = tag_chips(&facets);
        assert!(chips.fallback);
        assert_eq!(chips.labels.len(), DEFAULT_TAG_CHIPS.len());
    }

    #[test]
    fn stats_count_featured_records() {
        let cat = catalog(json!([
            { "featured": true, "category": "Arcade" },
            { "featured": false, "category": "Puzzle" },
            { "featured": 1 }
        ]));
        let facets = Facets::build(&cat);
        assert_eq!(
            facets.stats,
            CatalogStats {
                total: 3,
                categories: 2,
                featured: 2
            }
        );
    }
}
