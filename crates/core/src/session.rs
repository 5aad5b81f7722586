//! Session controller.
//!
//! `ShopSession` owns everything a shopper's session holds: the catalog load
//! state, the active category and the basket. Each user action maps to one
//! command handler; none of them depend on a rendering layer.

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::catalog::{sorted, Catalog, CatalogLoader, CatalogSource, LoadState, SortOrder};
use crate::domain::basket::Basket;
use crate::domain::product::{Category, Product, ProductId};
use crate::errors::SessionError;
use crate::selection::{SelectionEvent, SelectionState, SelectionTransition};
use crate::views::{BasketView, CatalogView, StorefrontHeader};

#[derive(Debug, Default)]
pub struct ShopSession {
    loader: CatalogLoader,
    selection: SelectionState,
    basket: Basket,
}

impl ShopSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load_catalog<S>(&mut self, source: &S) -> &LoadState
    where
        S: CatalogSource + ?Sized,
    {
        self.loader.load(source).await
    }

    pub fn load_state(&self) -> &LoadState {
        self.loader.state()
    }

    pub fn catalog(&self) -> Option<&Catalog> {
        self.loader.state().catalog()
    }

    pub fn catalog_size(&self) -> usize {
        self.catalog().map(Catalog::len).unwrap_or(0)
    }

    pub fn selection(&self) -> SelectionState {
        self.selection
    }

    pub fn select_category(&mut self, category: Category) -> SelectionTransition {
        self.apply_selection(SelectionEvent::Choose(category))
    }

    pub fn reset_selection(&mut self) -> SelectionTransition {
        self.apply_selection(SelectionEvent::Reset)
    }

    fn apply_selection(&mut self, event: SelectionEvent) -> SelectionTransition {
        let transition = self.selection.apply(event);
        self.selection = transition.to;
        if transition.changed() {
            info!(
                event_name = "selection.changed",
                from = ?transition.from,
                to = ?transition.to,
                "category selection changed"
            );
        }
        transition
    }

    /// Adds the catalog product identified by `pid`.
    pub fn add_to_basket(&mut self, pid: &ProductId) -> Result<&Basket, SessionError> {
        let catalog = self.catalog().ok_or(SessionError::CatalogNotReady)?;
        let product = catalog.find(pid).cloned().ok_or(SessionError::UnknownProduct(*pid))?;

        self.basket = self.basket.add(product);
        info!(
            event_name = "basket.item_added",
            pid = %pid,
            basket_count = self.basket.count(),
            "item added to basket"
        );
        Ok(&self.basket)
    }

    /// Removes one occurrence of `pid`; an absent identifier changes nothing.
    pub fn remove_from_basket(&mut self, pid: &ProductId) -> &Basket {
        let next = self.basket.remove(pid);
        if next.count() == self.basket.count() {
            debug!(event_name = "basket.remove_miss", pid = %pid, "no basket entry to remove");
        } else {
            info!(
                event_name = "basket.item_removed",
                pid = %pid,
                basket_count = next.count(),
                "item removed from basket"
            );
        }
        self.basket = next;
        &self.basket
    }

    pub fn clear_basket(&mut self) -> &Basket {
        let dropped = self.basket.count();
        self.basket = self.basket.clear();
        info!(event_name = "basket.cleared", dropped_entries = dropped, "basket emptied");
        &self.basket
    }

    /// A snapshot that later commands will not alter.
    pub fn basket(&self) -> Basket {
        self.basket.clone()
    }

    pub fn basket_total(&self) -> Decimal {
        self.basket.total()
    }

    pub fn basket_count(&self) -> usize {
        self.basket.count()
    }

    /// Products for the active category, or the whole catalog when no
    /// category is chosen. Empty while the catalog is not ready.
    pub fn visible_products(&self, order: SortOrder) -> Vec<&Product> {
        match self.catalog() {
            Some(catalog) => sorted(catalog.filter(self.selection.category()), order),
            None => Vec::new(),
        }
    }

    pub fn storefront(&self) -> Option<StorefrontHeader> {
        self.catalog().map(StorefrontHeader::for_catalog)
    }

    /// The product list is only shown once a category has been chosen.
    pub fn catalog_view(&self) -> Option<CatalogView> {
        let category = self.selection.category()?;
        let catalog = self.catalog()?;
        Some(CatalogView::build(catalog, Some(category), SortOrder::Name))
    }

    pub fn basket_view(&self) -> BasketView {
        BasketView::build(&self.basket)
    }
}
