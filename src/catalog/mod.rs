pub mod document;
pub mod file;
pub mod http;
pub mod traits;

pub use document::{parse_catalog, Catalog};
pub use file::FileCatalogSource;
pub use http::HttpCatalogSource;
pub use traits::CatalogSource;

use crate::error::Result;
use std::time::Duration;
use tracing::{error, info, warn};

/// Pick a source from a location string: `http(s)://` URLs go over the network,
/// anything else is treated as a local path.
pub fn source_for(location: &str, timeout: Duration) -> Result<Box<dyn CatalogSource>> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Ok(Box::new(HttpCatalogSource::new(location, timeout)?))
    } else {
        Ok(Box::new(FileCatalogSource::new(location)))
    }
}

/// Fetches and validates the catalog once per session
pub struct CatalogLoader {
    source: Box<dyn CatalogSource>,
}

impl CatalogLoader {
    pub fn new(source: Box<dyn CatalogSource>) -> Self {
        Self { source }
    }

    /// Fetch and parse, propagating any load error
    pub async fn try_load(&self) -> Result<Catalog> {
        let body = self.source.fetch().await?;
        parse_catalog(&body)
    }

    /// Load the catalog. Failures are logged and surface as an empty catalog.
    pub async fn load(&self) -> Catalog {
        info!("Loading catalog from {} source...", self.source.source_name());

        match self.try_load().await {
            Ok(catalog) => {
                if catalog.quarantined() > 0 {
                    warn!(
                        "Skipped {} malformed catalog entries",
                        catalog.quarantined()
                    );
                }
                info!("📋 Loaded {} properties", catalog.len());
                catalog
            }
            Err(e) => {
                error!("❌ Failed to load catalog: {}", e);
                Catalog::default()
            }
        }
    }
}
