use crate::error::Result;
use async_trait::async_trait;

/// Where the catalog document comes from.
/// Implementations only fetch the raw body; parsing and validation happen in the loader.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch the raw catalog document
    async fn fetch(&self) -> Result<String>;

    /// Get the name of the catalog source
    fn source_name(&self) -> &'static str;
}
