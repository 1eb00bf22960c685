use crate::catalog::traits::CatalogSource;
use crate::error::{Result, ShortlistError};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

/// Catalog served over HTTP(S) as a JSON document
pub struct HttpCatalogSource {
    client: Client,
    url: String,
}

impl HttpCatalogSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("housing-shortlist/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    async fn fetch(&self) -> Result<String> {
        debug!("Fetching catalog from {}", self.url);

        let response = self.client.get(&self.url).send().await?;

        if !response.status().is_success() {
            warn!("Catalog server returned status: {}", response.status());
            return Err(ShortlistError::catalog(format!(
                "{} returned status {}",
                self.url,
                response.status()
            )));
        }

        let body = response.text().await?;
        debug!("Downloaded {} bytes of catalog JSON", body.len());
        Ok(body)
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}
