use std::sync::Arc;

use rust_decimal::Decimal;

use crate::domain::product::{Product, ProductId};

/// The user's selection, in insertion order.
///
/// A `Basket` is a value: every operation returns a new basket and leaves the
/// receiver untouched, so a snapshot taken earlier never observes later edits.
/// Entries are shared behind an `Arc`, so snapshots are cheap to clone.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Basket {
    entries: Arc<Vec<Product>>,
}

impl Basket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `product`. Duplicates are kept; the same product may appear
    /// any number of times.
    #[must_use]
    pub fn add(&self, product: Product) -> Self {
        let mut entries = self.entries.to_vec();
        entries.push(product);
        Self { entries: Arc::new(entries) }
    }

    /// Drops the first entry whose identifier is `pid`. Later duplicates stay.
    /// A missing identifier returns an identical basket.
    #[must_use]
    pub fn remove(&self, pid: &ProductId) -> Self {
        match self.position(pid) {
            Some(index) => {
                let mut entries = self.entries.to_vec();
                entries.remove(index);
                Self { entries: Arc::new(entries) }
            }
            None => self.clone(),
        }
    }

    #[must_use]
    pub fn clear(&self) -> Self {
        Self::default()
    }

    pub fn position(&self, pid: &ProductId) -> Option<usize> {
        self.entries.iter().position(|entry| &entry.pid == pid)
    }

    /// Sum of every entry's price, computed on each call.
    pub fn total(&self) -> Decimal {
        self.entries.iter().map(Product::price).sum()
    }

    /// Number of entries, counting duplicates.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Product] {
        &self.entries
    }
}
