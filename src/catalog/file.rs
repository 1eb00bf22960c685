use crate::catalog::traits::CatalogSource;
use crate::error::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::debug;

/// Catalog stored as a JSON file on local disk
pub struct FileCatalogSource {
    path: PathBuf,
}

impl FileCatalogSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogSource for FileCatalogSource {
    async fn fetch(&self) -> Result<String> {
        debug!("Reading catalog from {}", self.path.display());
        let body = tokio::fs::read_to_string(&self.path).await?;
        Ok(body)
    }

    fn source_name(&self) -> &'static str {
        "file"
    }
}
