use tracing::{info, warn};

use crate::catalog::source::CatalogSource;
use crate::catalog::Catalog;
use crate::errors::LoadError;

/// `Idle -> Loading -> {Ready | Failed}`. Both resolved states are terminal.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum LoadState {
    #[default]
    Idle,
    Loading,
    Ready(Catalog),
    Failed(LoadError),
}

impl LoadState {
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Ready(_) | Self::Failed(_))
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        match self {
            Self::Ready(catalog) => Some(catalog),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&LoadError> {
        match self {
            Self::Failed(error) => Some(error),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Loading => "loading",
            Self::Ready(_) => "ready",
            Self::Failed(_) => "error",
        }
    }
}

/// Populates the catalog from a single fetch.
#[derive(Debug, Default)]
pub struct CatalogLoader {
    state: LoadState,
    attempts: u32,
}

impl CatalogLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Fetches from `source` if nothing has been attempted yet. Once resolved,
    /// later calls return the existing state without touching the source.
    pub async fn load<S>(&mut self, source: &S) -> &LoadState
    where
        S: CatalogSource + ?Sized,
    {
        if self.state != LoadState::Idle {
            info!(
                event_name = "catalog.load.skipped",
                state = self.state.label(),
                "catalog already requested this session"
            );
            return &self.state;
        }

        let origin = source.describe();
        self.state = LoadState::Loading;
        self.attempts += 1;
        info!(event_name = "catalog.load.start", source = %origin, "loading product catalog");

        self.state = match source.fetch().await {
            Ok(products) => {
                info!(
                    event_name = "catalog.load.ready",
                    source = %origin,
                    product_count = products.len(),
                    "product catalog ready"
                );
                LoadState::Ready(Catalog::new(products))
            }
            Err(error) => {
                warn!(
                    event_name = "catalog.load.failed",
                    source = %origin,
                    error = %error,
                    "product catalog failed to load"
                );
                LoadState::Failed(error)
            }
        };

        &self.state
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use async_trait::async_trait;
    use rust_decimal::Decimal;

    use crate::catalog::source::CatalogSource;
    use crate::domain::product::{Category, Product};
    use crate::errors::LoadError;

    use super::{CatalogLoader, LoadState};

    struct CountingSource {
        result: Result<Vec<Product>, LoadError>,
        calls: AtomicU32,
    }

    impl CountingSource {
        fn new(result: Result<Vec<Product>, LoadError>) -> Self {
            Self { result, calls: AtomicU32::new(0) }
        }
    }

    #[async_trait]
    impl CatalogSource for CountingSource {
        fn describe(&self) -> String {
            "test:counting".to_string()
        }

        async fn fetch(&self) -> Result<Vec<Product>, LoadError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    #[tokio::test]
    async fn successful_fetch_enters_ready() {
        let source = CountingSource::new(Ok(vec![Product::new(
            1,
            Category::Fruits,
            "Apple",
            Decimal::new(150, 2),
        )]));
        let mut loader = CatalogLoader::new();
        assert_eq!(loader.state(), &LoadState::Idle);

        let state = loader.load(&source).await;
        assert_eq!(state.label(), "ready");
        assert_eq!(state.catalog().map(|catalog| catalog.len()), Some(1));
    }

    #[tokio::test]
    async fn failed_fetch_enters_error_with_no_catalog() {
        let source = CountingSource::new(Err(LoadError::Fetch("HTTP 500".to_string())));
        let mut loader = CatalogLoader::new();

        let state = loader.load(&source).await;
        assert_eq!(state.error(), Some(&LoadError::Fetch("HTTP 500".to_string())));
        assert!(state.catalog().is_none());
    }

    #[tokio::test]
    async fn resolved_loader_never_fetches_again() {
        let source = CountingSource::new(Err(LoadError::Parse("bad body".to_string())));
        let mut loader = CatalogLoader::new();

        loader.load(&source).await;
        let state = loader.load(&source).await.clone();

        assert!(state.is_resolved());
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert_eq!(loader.attempts(), 1);
    }
}
