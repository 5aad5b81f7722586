use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::domain::product::Product;
use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Name,
    Price,
}

impl SortOrder {
    pub fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            Self::Name => compare_name_asc(a, b),
            Self::Price => compare_price_asc(a, b),
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "price" => Ok(Self::Price),
            other => Err(DomainError::UnknownSortOrder(other.to_string())),
        }
    }
}

pub fn compare_price_asc(a: &Product, b: &Product) -> Ordering {
    a.price().cmp(&b.price())
}

/// Lexicographic order of the lowercased display names.
pub fn compare_name_asc(a: &Product, b: &Product) -> Ordering {
    a.name().to_lowercase().cmp(&b.name().to_lowercase())
}

/// Returns a new ordered view; the input is never reordered. The sort is
/// stable, so ties keep their relative input order across renders.
pub fn sorted<'a, I>(products: I, order: SortOrder) -> Vec<&'a Product>
where
    I: IntoIterator<Item = &'a Product>,
{
    let mut view: Vec<&Product> = products.into_iter().collect();
    view.sort_by(|a, b| order.compare(a, b));
    view
}
