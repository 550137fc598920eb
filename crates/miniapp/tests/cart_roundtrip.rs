//! Hydration and persistence round trips across real backends.

#![allow(clippy::unwrap_used)]

use rust_decimal::Decimal;

use nexus_gear_core::{Product, ProductId};
use nexus_gear_miniapp::bridge::MemoryCloud;
use nexus_gear_miniapp::cart::{CART_STORAGE_KEY, CartEngine};
use nexus_gear_miniapp::storage::{DualStore, FileStore};

fn product(id: i64, price: i64) -> Product {
    Product::new(ProductId::new(id), Some(format!("P{id}")), Decimal::from(price))
}

/// Let spawned fire-and-forget cloud writes run.
async fn drain_tasks() {
    for _ in 0..8 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn file_store_round_trip_reproduces_the_cart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");

    {
        let mut cart = CartEngine::new(DualStore::new(FileStore::open(&path), MemoryCloud::new()));
        cart.add_product(&product(1, 100));
        cart.add_product(&product(1, 100));
        cart.add_product(&product(2, 50));
        drain_tasks().await;
    }

    // A fresh session hydrates from the local backend alone.
    let mut cart = CartEngine::new(DualStore::new(FileStore::open(&path), MemoryCloud::absent()));
    cart.hydrate_remote().await;

    assert_eq!(cart.total_items(), 3);
    assert_eq!(cart.total_price(), Decimal::from(250));
    let mut pairs: Vec<_> = cart
        .items()
        .iter()
        .map(|i| (i.id.as_i64(), i.price, i.quantity))
        .collect();
    pairs.sort_unstable();
    assert_eq!(
        pairs,
        vec![(1, Decimal::from(100), 2), (2, Decimal::from(50), 1)]
    );
}

#[tokio::test]
async fn cloud_copy_is_adopted_only_without_a_local_cart() {
    let dir = tempfile::tempdir().unwrap();

    // Another device left a cart in the cloud.
    let cloud = MemoryCloud::new();
    cloud.raw_set(
        CART_STORAGE_KEY,
        r#"[{"id":7,"name":"Remote","price":"30","quantity":3}]"#,
    );

    let mut cart = CartEngine::new(DualStore::new(
        FileStore::open(dir.path().join("empty.json")),
        cloud.clone(),
    ));
    cart.hydrate_remote().await;
    assert_eq!(cart.total_items(), 3);
    assert_eq!(cart.total_price(), Decimal::from(90));

    // Mutating now persists the adopted cart to both backends.
    cart.add_product(&product(7, 30));
    drain_tasks().await;
    let stored = cloud.raw_get(CART_STORAGE_KEY).unwrap();
    assert!(stored.contains("\"quantity\":4"));
}

#[tokio::test]
async fn oversized_cart_keeps_the_local_copy_authoritative() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let cloud = MemoryCloud::new();

    {
        let mut cart = CartEngine::new(DualStore::new(FileStore::open(&path), cloud.clone()));
        // One line item whose serialized form exceeds the cloud value cap.
        let bulky = Product::new(
            ProductId::new(1),
            Some("x".repeat(5000)),
            Decimal::from(10),
        );
        cart.add_product(&bulky);
        drain_tasks().await;
    }

    // The cloud write was rejected silently; the local copy still wins.
    assert_eq!(cloud.raw_get(CART_STORAGE_KEY), None);
    let cart = CartEngine::new(DualStore::new(FileStore::open(&path), cloud));
    assert_eq!(cart.total_items(), 1);
}
