//! One-shot catalog loading.
use serde::{Deserialize, Serialize};
use std::future::Future;

use crate::error::CatalogLoadError;
use crate::record::Catalog;

/// Abstraction over where catalog JSON comes from.
/// Platform-specific collaborators provide this (file, HTTP, embedded asset).
pub trait CatalogSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Fetch the raw catalog text.
    ///
    /// # Errors
    ///
    /// Returns an error if the source cannot be read.
    fn fetch(&self) -> impl Future<Output = Result<String, Self::Error>>;
}

/// Catalog text already in memory, e.g. an embedded asset.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    json: String,
}

impl StaticSource {
    #[must_use]
    pub fn new(json: impl Into<String>) -> Self {
        Self { json: json.into() }
    }
}

impl CatalogSource for StaticSource {
    type Error = std::convert::Infallible;

    async fn fetch(&self) -> Result<String, Self::Error> {
        Ok(self.json.clone())
    }
}

/// Fetch, parse, and normalize a catalog.
///
/// # Errors
///
/// Returns an error if the source fails or the text is not a JSON array.
pub async fn load_catalog<S: CatalogSource>(source: &S) -> Result<Catalog, CatalogLoadError> {
    let text = source
        .fetch()
        .await
        .map_err(|err| CatalogLoadError::Source(err.to_string()))?;
    Catalog::from_json(&text)
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LoadStatus {
    /// No load attempted yet.
    #[default]
    Idle,
    Loading,
    Ready,
    /// Last load failed; the catalog is the safe empty state.
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeKind {
    Info,
    Error,
}

/// Transient, user-visible message for the rendering collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
}

impl Notice {
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            message: message.into(),
        }
    }
}
