//! End-to-end tests for the SDK aggregator against a live proxy.

use std::net::SocketAddr;
use std::time::Duration;

use catalog_sdk::{Aggregator, FilterState, LoadState, SortOrder};

mod common;

fn categories_json() -> String {
    r#"[{"id": 1, "name": "Laptops"}, {"id": 2, "name": "Phones"}]"#.to_string()
}

fn companies_json() -> String {
    r#"[{"id": 10, "name": "Amazon"}, {"id": 11, "name": "Flipkart"}]"#.to_string()
}

fn products_json() -> String {
    r#"[
        {"id": 1, "productName": "Echo Dot", "price": 49.5, "rating": 4.2},
        {"id": 2, "productName": "Kindle", "price": 120.0, "rating": 4.6}
    ]"#
    .to_string()
}

#[tokio::test]
async fn initial_load_fills_all_three_collections() {
    let upstream_addr: SocketAddr = "127.0.0.1:29301".parse().unwrap();
    let proxy_addr: SocketAddr = "127.0.0.1:29302".parse().unwrap();

    common::start_mock_upstream(
        upstream_addr,
        vec![
            ("/categories", 200, categories_json()),
            ("/companies", 200, companies_json()),
            ("/products", 200, products_json()),
        ],
    )
    .await;
    let shutdown = common::start_proxy(proxy_addr, &format!("http://{}", upstream_addr)).await;

    let aggregator = Aggregator::new(&format!("http://{}", proxy_addr));
    assert_eq!(aggregator.load_state(), LoadState::Loading);

    aggregator.load().await.expect("load failed");

    assert_eq!(aggregator.load_state(), LoadState::Ready);
    assert_eq!(aggregator.categories().len(), 2);
    assert_eq!(aggregator.companies().len(), 2);
    assert_eq!(aggregator.products().len(), 2);
    assert_eq!(aggregator.products()[0].id, "1");

    shutdown.trigger();
}

#[tokio::test]
async fn initial_load_is_all_or_nothing() {
    let upstream_addr: SocketAddr = "127.0.0.1:29303".parse().unwrap();
    let proxy_addr: SocketAddr = "127.0.0.1:29304".parse().unwrap();

    // companies fails, the other two succeed
    common::start_mock_upstream(
        upstream_addr,
        vec![
            ("/categories", 200, categories_json()),
            ("/companies", 500, "{}".to_string()),
            ("/products", 200, products_json()),
        ],
    )
    .await;
    let shutdown = common::start_proxy(proxy_addr, &format!("http://{}", upstream_addr)).await;

    let aggregator = Aggregator::new(&format!("http://{}", proxy_addr));
    let result = aggregator.load().await;

    assert!(result.is_err());
    assert_eq!(aggregator.load_state(), LoadState::Loading);
    assert!(aggregator.categories().is_empty());
    assert!(aggregator.products().is_empty());

    shutdown.trigger();
}

#[tokio::test]
async fn filters_build_nested_paths_and_sort_locally() {
    let upstream_addr: SocketAddr = "127.0.0.1:29305".parse().unwrap();
    let proxy_addr: SocketAddr = "127.0.0.1:29306".parse().unwrap();

    let filtered = r#"[
        {"id": 3, "productName": "ThinkPad", "price": 900.0},
        {"id": 4, "productName": "MacBook", "price": 1000.0},
        {"id": 5, "productName": "Chromebook", "price": 300.0}
    ]"#;

    let seen = common::start_mock_upstream(
        upstream_addr,
        vec![
            ("/categories", 200, categories_json()),
            ("/companies", 200, companies_json()),
            ("/products", 200, products_json()),
            (
                "/companies/Amazon/categories/Laptops/products",
                200,
                filtered.to_string(),
            ),
        ],
    )
    .await;
    let shutdown = common::start_proxy(proxy_addr, &format!("http://{}", upstream_addr)).await;

    let aggregator = Aggregator::new(&format!("http://{}", proxy_addr));
    aggregator.load().await.expect("load failed");

    let filter = FilterState {
        company: Some("10".into()),
        category: Some("1".into()),
        availability: Some("yes".into()),
        sort: Some(SortOrder::PriceDesc),
        ..Default::default()
    };
    let installed = aggregator.apply_filters(&filter).await.expect("apply failed");
    assert!(installed);

    // the proxy translated the aggregator's one combined query
    assert_eq!(
        seen.lock().unwrap().last().unwrap(),
        "/companies/Amazon/categories/Laptops/products?price_gte=0&price_lte=1000&availability=yes"
    );

    // sorting happened client-side
    let prices: Vec<f64> = aggregator.products().iter().map(|p| p.price).collect();
    assert_eq!(prices, vec![1000.0, 900.0, 300.0]);

    shutdown.trigger();
}

#[tokio::test]
async fn no_sort_preserves_upstream_order() {
    let upstream_addr: SocketAddr = "127.0.0.1:29307".parse().unwrap();
    let proxy_addr: SocketAddr = "127.0.0.1:29308".parse().unwrap();

    common::start_mock_upstream(
        upstream_addr,
        vec![
            ("/categories", 200, categories_json()),
            ("/companies", 200, companies_json()),
            ("/products", 200, products_json()),
        ],
    )
    .await;
    let shutdown = common::start_proxy(proxy_addr, &format!("http://{}", upstream_addr)).await;

    let aggregator = Aggregator::new(&format!("http://{}", proxy_addr));
    aggregator.load().await.expect("load failed");

    let installed = aggregator
        .apply_filters(&FilterState::default())
        .await
        .expect("apply failed");
    assert!(installed);

    let ids: Vec<String> = aggregator.products().iter().map(|p| p.id.clone()).collect();
    assert_eq!(ids, ["1", "2"]);

    shutdown.trigger();
}

#[tokio::test]
async fn stale_responses_are_discarded() {
    let upstream_addr: SocketAddr = "127.0.0.1:29309".parse().unwrap();
    let proxy_addr: SocketAddr = "127.0.0.1:29310".parse().unwrap();

    let slow = r#"[{"id": 90, "productName": "Stale", "price": 1.0}]"#;
    let fast = r#"[{"id": 91, "productName": "Fresh", "price": 2.0}]"#;

    common::start_programmable_upstream(upstream_addr, move |target: String| async move {
        if target.starts_with("/categories") {
            (200, categories_json())
        } else if target.starts_with("/companies") {
            (200, companies_json())
        } else if target.contains("price_lte=1000") {
            // the first, slower filter application
            tokio::time::sleep(Duration::from_millis(400)).await;
            (200, slow.to_string())
        } else if target.contains("price_lte=50") {
            (200, fast.to_string())
        } else {
            (200, products_json())
        }
    })
    .await;
    let shutdown = common::start_proxy(proxy_addr, &format!("http://{}", upstream_addr)).await;

    let aggregator = Aggregator::new(&format!("http://{}", proxy_addr));
    aggregator.load().await.expect("load failed");

    let slow_aggregator = aggregator.clone();
    let slow_apply = tokio::spawn(async move {
        slow_aggregator.apply_filters(&FilterState::default()).await
    });

    // let the slow apply reach the upstream before starting the newer one
    tokio::time::sleep(Duration::from_millis(100)).await;

    let newer = FilterState {
        price_range: (0, 50),
        ..Default::default()
    };
    let installed = aggregator.apply_filters(&newer).await.expect("apply failed");
    assert!(installed);

    let slow_installed = slow_apply.await.unwrap().expect("slow apply errored");
    assert!(!slow_installed, "stale response must be discarded");

    let products = aggregator.products();
    assert_eq!(products.len(), 1);
    assert_eq!(products[0].product_name, "Fresh");

    shutdown.trigger();
}
