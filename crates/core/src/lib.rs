pub mod catalog;
pub mod config;
pub mod domain;
pub mod errors;
pub mod selection;
pub mod session;
pub mod views;

pub use catalog::{
    filter_by_category, parse_catalog, sorted, Catalog, CatalogLoader, CatalogSource, LoadState,
    SortOrder, StaticCatalogSource,
};
pub use domain::basket::Basket;
pub use domain::product::{format_price, Category, Plant, Product, ProductId};
pub use errors::{ApplicationError, DomainError, LoadError, SessionError};
pub use selection::{SelectionEvent, SelectionState, SelectionTransition};
pub use session::ShopSession;
pub use views::{BasketView, CatalogView, ProductLine, StorefrontHeader};
