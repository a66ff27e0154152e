use chrono::Utc;
use playshelf_catalog::CatalogSource;
use std::path::PathBuf;

/// Catalog read from disk on each fetch.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl CatalogSource for FileSource {
    type Error = std::io::Error;

    async fn fetch(&self) -> Result<String, Self::Error> {
        tokio::fs::read_to_string(&self.path).await
    }
}

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Parse comma-separated seeds. Accepts decimal and `0x` hex.
pub fn parse_seeds(s: &str) -> anyhow::Result<Vec<u64>> {
    split_csv(s)
        .iter()
        .map(|token| {
            let parsed = token.strip_prefix("0x").map_or_else(
                || token.parse::<u64>(),
                |hex| u64::from_str_radix(hex, 16),
            );
            parsed.map_err(|err| anyhow::anyhow!("invalid seed '{token}': {err}"))
        })
        .collect()
}

pub fn run_stamp() -> String {
    Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string()
}
