//! Error types for the catalog engine.
use thiserror::Error;

/// Failure while fetching or parsing the catalog source.
#[derive(Debug, Error)]
pub enum CatalogLoadError {
    #[error("Source error: {0}")]
    Source(String),
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Catalog shape error: {0}")]
    Shape(String),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("A catalog load is already in flight")]
    LoadInFlight,
    #[error(transparent)]
    Load(#[from] CatalogLoadError),
}

/// A sort mode name that matches none of the known labels.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown sort mode '{0}'")]
pub struct UnknownSortMode(pub String);
