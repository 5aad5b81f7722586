use async_trait::async_trait;
use basket_core::{
    sorted, CatalogSource, Category, LoadError, LoadState, Product, ProductId, SessionError,
    ShopSession, SortOrder, StaticCatalogSource,
};
use rust_decimal::Decimal;

const TWO_FRUITS: &str = r#"[
    {"pid": 1, "type": "Fruits", "plant": {"name": "Apple", "price": 1.50}},
    {"pid": 2, "type": "Fruits", "plant": {"name": "Banana", "price": 0.75}}
]"#;

struct UnreachableSource;

#[async_trait]
impl CatalogSource for UnreachableSource {
    fn describe(&self) -> String {
        "test:unreachable".to_string()
    }

    async fn fetch(&self) -> Result<Vec<Product>, LoadError> {
        Err(LoadError::Fetch("connection refused".to_string()))
    }
}

fn names(products: &[&Product]) -> Vec<String> {
    products.iter().map(|product| product.name().to_string()).collect()
}

#[tokio::test]
async fn fruit_basket_walkthrough() {
    let mut session = ShopSession::new();
    let state = session.load_catalog(&StaticCatalogSource::from_document(TWO_FRUITS)).await;
    assert_eq!(state.label(), "ready");

    session.select_category(Category::Fruits);
    let filtered = session.visible_products(SortOrder::Name);
    assert_eq!(names(&filtered), vec!["Apple", "Banana"]);

    let by_price = sorted(filtered.iter().copied(), SortOrder::Price);
    assert_eq!(names(&by_price), vec!["Banana", "Apple"]);

    session.add_to_basket(&ProductId(2)).expect("banana is in the catalog");
    session.add_to_basket(&ProductId(1)).expect("apple is in the catalog");
    let basket = session.basket();
    let basket_names: Vec<&str> = basket.entries().iter().map(Product::name).collect();
    assert_eq!(basket_names, vec!["Banana", "Apple"]);
    assert_eq!(session.basket_total(), Decimal::new(225, 2));

    session.remove_from_basket(&ProductId(2));
    let basket = session.basket();
    let basket_names: Vec<&str> = basket.entries().iter().map(Product::name).collect();
    assert_eq!(basket_names, vec!["Apple"]);
    assert_eq!(session.basket_total(), Decimal::new(150, 2));
}

#[tokio::test]
async fn failed_fetch_leaves_catalog_empty() {
    let mut session = ShopSession::new();
    let state = session.load_catalog(&UnreachableSource).await;

    assert!(matches!(state, LoadState::Failed(LoadError::Fetch(_))));
    assert_eq!(session.catalog_size(), 0);
    assert!(session.storefront().is_none());
    assert_eq!(session.add_to_basket(&ProductId(1)), Err(SessionError::CatalogNotReady));

    // The session has had its one attempt; a later good source is ignored.
    let state = session.load_catalog(&StaticCatalogSource::from_document(TWO_FRUITS)).await;
    assert_eq!(state.label(), "error");
}

#[tokio::test]
async fn parse_failure_is_reported_like_fetch_failure() {
    let mut session = ShopSession::new();
    let state = session.load_catalog(&StaticCatalogSource::from_document("{not json")).await;

    let error = state.error().cloned().expect("parse failure");
    assert!(matches!(error, LoadError::Parse(_)));
    assert_eq!(
        error.user_message(),
        LoadError::Fetch("timeout".to_string()).user_message()
    );
}

#[tokio::test]
async fn bundled_inventory_supports_full_session() {
    let mut session = ShopSession::new();
    session.load_catalog(&StaticCatalogSource::new()).await;
    let size = session.catalog_size();
    assert!(size > 0);

    for category in Category::ALL {
        session.select_category(category);
        let view = session.catalog_view().expect("category chosen and catalog ready");
        assert_eq!(view.count, view.products.len());
        assert!(view.products.iter().all(|line| line.category == category));
    }

    let first = session.visible_products(SortOrder::Price)[0].pid;
    session.add_to_basket(&first).expect("first visible product");
    session.add_to_basket(&first).expect("same product again");
    assert_eq!(session.basket_count(), 2);

    session.clear_basket();
    assert_eq!(session.basket_total(), Decimal::ZERO);
    assert!(!session.basket_view().can_empty);
}
