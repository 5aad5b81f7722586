use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for ProductId {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        value
            .trim()
            .parse::<u64>()
            .map(Self)
            .map_err(|_| DomainError::InvalidProductId(value.to_string()))
    }
}

/// Fixed product groupings. Adding a grouping means adding a variant here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Vegetables,
    Flowers,
    Fruits,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Vegetables, Category::Flowers, Category::Fruits];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vegetables => "Vegetables",
            Self::Flowers => "Flowers",
            Self::Fruits => "Fruits",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = DomainError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "vegetables" => Ok(Self::Vegetables),
            "flowers" => Ok(Self::Flowers),
            "fruits" => Ok(Self::Fruits),
            other => Err(DomainError::UnknownCategory(other.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plant {
    pub name: String,
    pub price: Decimal,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub pid: ProductId,
    #[serde(rename = "type")]
    pub category: Category,
    pub plant: Plant,
}

impl Product {
    pub fn new(pid: u64, category: Category, name: impl Into<String>, price: Decimal) -> Self {
        Self { pid: ProductId(pid), category, plant: Plant { name: name.into(), price } }
    }

    pub fn name(&self) -> &str {
        &self.plant.name
    }

    pub fn price(&self) -> Decimal {
        self.plant.price
    }
}

/// Renders an amount the way the storefront shows prices, e.g. `€1.50`.
pub fn format_price(amount: Decimal) -> String {
    format!("€{:.2}", amount.round_dp(2))
}
