use std::collections::HashSet;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::product::Product;
use crate::errors::LoadError;

const BUNDLED_INVENTORY: &str = include_str!("inventory.json");

/// Supplies the product records for a session. Called at most once.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    fn describe(&self) -> String;

    async fn fetch(&self) -> Result<Vec<Product>, LoadError>;
}

/// Inventory bundled with the crate; needs no network.
#[derive(Clone, Debug)]
pub struct StaticCatalogSource {
    document: &'static str,
}

impl StaticCatalogSource {
    pub fn new() -> Self {
        Self { document: BUNDLED_INVENTORY }
    }

    pub fn from_document(document: &'static str) -> Self {
        Self { document }
    }
}

impl Default for StaticCatalogSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogSource for StaticCatalogSource {
    fn describe(&self) -> String {
        "static:bundled".to_string()
    }

    async fn fetch(&self) -> Result<Vec<Product>, LoadError> {
        parse_catalog(self.document)
    }
}

/// Parses a JSON array of product records.
///
/// Rejects the whole document when any record is malformed, carries a
/// negative price, or repeats a `pid`; a partially valid document never
/// yields a partial catalog.
pub fn parse_catalog(document: &str) -> Result<Vec<Product>, LoadError> {
    let products: Vec<Product> =
        serde_json::from_str(document).map_err(|error| LoadError::Parse(error.to_string()))?;

    let mut seen = HashSet::with_capacity(products.len());
    for product in &products {
        if product.price() < Decimal::ZERO {
            return Err(LoadError::Parse(format!(
                "product {} has a negative price {}",
                product.pid,
                product.price()
            )));
        }
        if !seen.insert(product.pid) {
            return Err(LoadError::Parse(format!("duplicate product id {}", product.pid)));
        }
    }

    Ok(products)
}
