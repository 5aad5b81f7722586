pub mod basket;
pub mod product;
