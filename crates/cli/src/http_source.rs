use std::time::Duration;

use async_trait::async_trait;
use basket_core::config::{CatalogConfig, CatalogSourceKind};
use basket_core::{parse_catalog, CatalogSource, LoadError, Product, StaticCatalogSource};
use reqwest::Client;
use tracing::debug;

/// Fetches the catalog document with a single GET. No retries.
#[derive(Clone, Debug)]
pub struct HttpCatalogSource {
    client: Client,
    url: String,
}

impl HttpCatalogSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, LoadError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| LoadError::Fetch(format!("http client setup failed: {error}")))?;
        Ok(Self { client, url: url.into() })
    }
}

#[async_trait]
impl CatalogSource for HttpCatalogSource {
    fn describe(&self) -> String {
        format!("remote:{}", self.url)
    }

    async fn fetch(&self) -> Result<Vec<Product>, LoadError> {
        let response = self
            .client
            .get(&self.url)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|error| LoadError::Fetch(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoadError::Fetch(format!("unexpected response status {status}")));
        }

        let body = response.text().await.map_err(|error| LoadError::Fetch(error.to_string()))?;
        debug!(
            event_name = "catalog.fetch.body_received",
            url = %self.url,
            bytes = body.len(),
            "catalog document received"
        );
        parse_catalog(&body)
    }
}

/// Picks the catalog source named by the configuration.
pub fn source_for(config: &CatalogConfig) -> Result<Box<dyn CatalogSource>, LoadError> {
    match (config.source, config.url.as_deref()) {
        (CatalogSourceKind::Remote, Some(url)) => Ok(Box::new(HttpCatalogSource::new(
            url,
            Duration::from_secs(config.timeout_secs),
        )?)),
        (CatalogSourceKind::Remote, None) => {
            Err(LoadError::Fetch("remote catalog source has no url".to_string()))
        }
        (CatalogSourceKind::Static, _) => Ok(Box::new(StaticCatalogSource::new())),
    }
}
