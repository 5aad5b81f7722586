pub mod loader;
pub mod sort;
pub mod source;

use crate::domain::product::{Category, Product, ProductId};

pub use loader::{CatalogLoader, LoadState};
pub use sort::{compare_name_asc, compare_price_asc, sorted, SortOrder};
pub use source::{parse_catalog, CatalogSource, StaticCatalogSource};

/// Products available for the session. Built once at load and never edited.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    pub fn find(&self, product_id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|product| &product.pid == product_id)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn filter(&self, category: Option<Category>) -> Vec<&Product> {
        filter_by_category(&self.products, category)
    }

    pub fn count_in(&self, category: Category) -> usize {
        self.products.iter().filter(|product| product.category == category).count()
    }
}

/// Products whose category equals `category`, in source order. `None` keeps
/// every product.
pub fn filter_by_category(products: &[Product], category: Option<Category>) -> Vec<&Product> {
    match category {
        Some(category) => {
            products.iter().filter(|product| product.category == category).collect()
        }
        None => products.iter().collect(),
    }
}
