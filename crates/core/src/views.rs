//! Render-ready projections of session state.
//!
//! The product list shows the chosen category ordered by name; the basket
//! shows its entries ordered by price. Both orderings are applied to copies,
//! never to the underlying catalog or basket.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::catalog::{sorted, Catalog, SortOrder};
use crate::domain::basket::Basket;
use crate::domain::product::{format_price, Category, Product, ProductId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProductLine {
    pub pid: ProductId,
    pub category: Category,
    pub name: String,
    pub price: Decimal,
    pub price_label: String,
}

impl From<&Product> for ProductLine {
    fn from(product: &Product) -> Self {
        Self {
            pid: product.pid,
            category: product.category,
            name: product.name().to_string(),
            price: product.price(),
            price_label: format_price(product.price()),
        }
    }
}

impl ProductLine {
    pub fn render(&self) -> String {
        format!("[{}] {}, {}", self.pid, self.name, self.price_label)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StorefrontHeader {
    pub products_for_sale: usize,
}

impl StorefrontHeader {
    pub fn for_catalog(catalog: &Catalog) -> Self {
        Self { products_for_sale: catalog.len() }
    }

    pub fn render(&self) -> String {
        format!("We have {} items for sale, right now!", self.products_for_sale)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CatalogView {
    pub category: Option<Category>,
    pub count: usize,
    pub order: SortOrder,
    pub products: Vec<ProductLine>,
}

impl CatalogView {
    pub fn build(catalog: &Catalog, category: Option<Category>, order: SortOrder) -> Self {
        let products: Vec<ProductLine> =
            sorted(catalog.filter(category), order).into_iter().map(ProductLine::from).collect();
        Self { category, count: products.len(), order, products }
    }

    pub fn render(&self) -> String {
        let heading = match self.category {
            Some(category) => format!("Our {category} products ({} items)", self.count),
            None => format!("All products ({} items)", self.count),
        };
        let mut lines = vec![heading];
        lines.extend(self.products.iter().map(ProductLine::render));
        lines.join("\n")
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct BasketView {
    pub count: usize,
    pub total: Decimal,
    pub total_label: String,
    pub entries: Vec<ProductLine>,
    pub can_empty: bool,
}

impl BasketView {
    pub fn build(basket: &Basket) -> Self {
        let total = basket.total();
        Self {
            count: basket.count(),
            total,
            total_label: format_price(total),
            entries: sorted(basket.entries(), SortOrder::Price)
                .into_iter()
                .map(ProductLine::from)
                .collect(),
            can_empty: !basket.is_empty(),
        }
    }

    pub fn render(&self) -> String {
        if self.count == 0 {
            return "Your basket is empty".to_string();
        }
        let mut lines = vec![
            "Your shopping basket".to_string(),
            format!("Your basket has {} items", self.count),
            format!("Total cost: {}", self.total_label),
        ];
        lines.extend(self.entries.iter().map(ProductLine::render));
        lines.join("\n")
    }
}
