//! Record normalization and the loaded catalog.
//!
//! Raw catalog entries are untyped JSON. Normalization is total: every missing
//! or malformed field resolves to a default, so a record never fails to load.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use smallvec::SmallVec;

use crate::constants::{
    DEFAULT_CATEGORY, DEFAULT_DESCRIPTION, DEFAULT_TITLE, PLACEHOLDER_IMAGE_PREFIX,
};
use crate::error::CatalogLoadError;

pub type TagList = SmallVec<[String; 4]>;

const PLAY_URL_KEYS: [&str; 3] = ["playUrl", "play_url", "url"];
const IMAGE_KEYS: [&str; 3] = ["imageRef", "image", "game_image_icon"];

/// A canonical catalog entry. Immutable once normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameRecord {
    pub id: usize,
    pub title: String,
    pub description: String,
    pub category: String,
    pub tags: TagList,
    pub image_ref: String,
    pub play_url: String,
    pub featured: bool,
}

impl GameRecord {
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    #[must_use]
    pub fn lead_tag(&self) -> Option<&str> {
        self.tags.first().map(String::as_str)
    }

    #[must_use]
    pub fn is_playable(&self) -> bool {
        !self.play_url.is_empty()
    }
}

/// Normalize one raw entry found at `position` in the source list.
#[must_use]
pub fn normalize_record(raw: &Value, position: usize) -> GameRecord {
    let empty = Map::new();
    let fields = raw.as_object().unwrap_or(&empty);

    GameRecord {
        id: position,
        title: text_field(fields, &["title"]).unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        description: text_field(fields, &["description"])
            .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        category: text_field(fields, &["category"])
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
        tags: normalize_tags(fields.get("tags")),
        image_ref: text_field(fields, &IMAGE_KEYS)
            .unwrap_or_else(|| format!("{PLACEHOLDER_IMAGE_PREFIX}{position}")),
        play_url: text_field(fields, &PLAY_URL_KEYS).unwrap_or_default(),
        featured: fields.get("featured").is_some_and(is_truthy),
    }
}

/// Normalize a whole source list, assigning dense zero-based ids.
#[must_use]
pub fn normalize_all(raw: &[Value]) -> Vec<GameRecord> {
    raw.iter()
        .enumerate()
        .map(|(position, value)| normalize_record(value, position))
        .collect()
}

fn text_field(fields: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| fields.get(*key).and_then(Value::as_str))
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(str::to_string)
}

fn normalize_tags(raw: Option<&Value>) -> TagList {
    let mut tags = TagList::new();
    let Some(Value::Array(entries)) = raw else {
        return tags;
    };
    for entry in entries {
        let Some(tag) = entry.as_str().map(str::trim) else {
            continue;
        };
        if !tag.is_empty() && !tags.iter().any(|existing| existing == tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// One generation of normalized records.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Catalog {
    generation: u64,
    records: Vec<GameRecord>,
}

impl Catalog {
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            generation: 0,
            records: Vec::new(),
        }
    }

    #[must_use]
    pub fn from_raw(raw: &[Value]) -> Self {
        Self {
            generation: 0,
            records: normalize_all(raw),
        }
    }

    /// Parse catalog JSON; the top level must be an array of records.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not JSON or is not an array.
    pub fn from_json(json: &str) -> Result<Self, CatalogLoadError> {
        match serde_json::from_str::<Value>(json)? {
            Value::Array(entries) => Ok(Self::from_raw(&entries)),
            other => Err(CatalogLoadError::Shape(format!(
                "expected an array of records, found {}",
                json_kind(&other)
            ))),
        }
    }

    #[must_use]
    pub fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn records(&self) -> &[GameRecord] {
        &self.records
    }

    #[must_use]
    pub fn get(&self, id: usize) -> Option<&GameRecord> {
        self.records.get(id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GameRecord> {
        self.records.iter()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a GameRecord;
    type IntoIter = std::slice::Iter<'a, GameRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
