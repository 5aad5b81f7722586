use thiserror::Error;

use crate::domain::product::ProductId;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("invalid product identifier `{0}`")]
    InvalidProductId(String),
    #[error("unknown category `{0}` (expected vegetables|flowers|fruits)")]
    UnknownCategory(String),
    #[error("unsupported sort order `{0}` (expected name|price)")]
    UnknownSortOrder(String),
}

/// Failures while populating the catalog. Both variants are fatal to the
/// session's catalog and share one user-facing message.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum LoadError {
    #[error("catalog fetch failed: {0}")]
    Fetch(String),
    #[error("catalog parse failed: {0}")]
    Parse(String),
}

impl LoadError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Fetch(_) | Self::Parse(_) => {
                "The product catalog could not be loaded. Please try again later."
            }
        }
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("catalog is not ready")]
    CatalogNotReady,
    #[error("product {0} is not in the catalog")]
    UnknownProduct(ProductId),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("configuration failure: {0}")]
    Configuration(String),
}

impl ApplicationError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Load(error) => error.user_message(),
            Self::Domain(_) | Self::Session(_) => {
                "The request could not be processed. Check inputs and try again."
            }
            Self::Configuration(_) => "An unexpected internal error occurred.",
        }
    }
}
