mod common;

use axum_delivery_api::{
    db::Store,
    dto::{
        cart::AddCartItemRequest,
        drivers::{InventoryBatchRequest, StockItem, StockOp},
    },
    error::AppError,
    models::Role,
    services::{cart_service, inventory_service},
};
use common::{seed_account, seed_driver, seed_product, test_state};
use uuid::Uuid;

#[tokio::test]
async fn stock_batches_accumulate_and_drain() {
    let state = test_state();
    let (driver, profile_id) = seed_driver(&state, "dave").await;
    let widget = seed_product(&state, "Widget", 10, 100).await;
    let gadget = seed_product(&state, "Gadget", 25, 100).await;

    inventory_service::update_inventory(
        &state,
        &driver,
        InventoryBatchRequest {
            op: StockOp::Add,
            items: vec![
                StockItem { product_id: widget.id, quantity: 4 },
                StockItem { product_id: gadget.id, quantity: 2 },
            ],
        },
    )
    .await
    .unwrap();
    inventory_service::update_inventory(
        &state,
        &driver,
        InventoryBatchRequest {
            op: StockOp::Add,
            items: vec![StockItem { product_id: widget.id, quantity: 1 }],
        },
    )
    .await
    .unwrap();

    let profile = state.store.find_driver(profile_id).await.unwrap().unwrap();
    assert_eq!(profile.inventory.len(), 2);
    assert_eq!(profile.inventory[0].quantity, 5);

    // draining gadget to zero removes its entry
    let view = inventory_service::update_inventory(
        &state,
        &driver,
        InventoryBatchRequest {
            op: StockOp::Remove,
            items: vec![StockItem { product_id: gadget.id, quantity: 2 }],
        },
    )
    .await
    .unwrap()
    .data
    .unwrap();
    assert_eq!(view.items.len(), 1);
    assert_eq!(view.items[0].product_id, widget.id);
}

// An unknown product anywhere in a batch must leave the inventory untouched.
#[tokio::test]
async fn bad_batch_applies_nothing() {
    let state = test_state();
    let (driver, profile_id) = seed_driver(&state, "dave").await;
    let widget = seed_product(&state, "Widget", 10, 100).await;

    let err = inventory_service::update_inventory(
        &state,
        &driver,
        InventoryBatchRequest {
            op: StockOp::Add,
            items: vec![
                StockItem { product_id: widget.id, quantity: 4 },
                StockItem { product_id: Uuid::new_v4(), quantity: 1 },
            ],
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::UnknownProduct(_)));

    let profile = state.store.find_driver(profile_id).await.unwrap().unwrap();
    assert!(profile.inventory.is_empty());

    // same for a removal that overdraws partway through
    inventory_service::update_inventory(
        &state,
        &driver,
        InventoryBatchRequest {
            op: StockOp::Add,
            items: vec![StockItem { product_id: widget.id, quantity: 4 }],
        },
    )
    .await
    .unwrap();
    let err = inventory_service::update_inventory(
        &state,
        &driver,
        InventoryBatchRequest {
            op: StockOp::Remove,
            items: vec![
                StockItem { product_id: widget.id, quantity: 2 },
                StockItem { product_id: widget.id, quantity: 3 },
            ],
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::InsufficientStock { .. }));

    let profile = state.store.find_driver(profile_id).await.unwrap().unwrap();
    assert_eq!(profile.inventory[0].quantity, 4);
}

#[tokio::test]
async fn inventory_requires_driver_role() {
    let state = test_state();
    let customer = seed_account(&state, "carol", Role::Customer).await;

    let err = inventory_service::view_inventory(&state, &customer)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotAuthorized));
}

#[tokio::test]
async fn cart_totals_track_catalog_prices() {
    let state = test_state();
    let customer = seed_account(&state, "carol", Role::Customer).await;
    let widget = seed_product(&state, "Widget", 10, 100).await;
    let gadget = seed_product(&state, "Gadget", 25, 100).await;

    let cart = cart_service::add_item(
        &state,
        &customer,
        AddCartItemRequest {
            product_id: widget.id,
            quantity: Some(2),
        },
    )
    .await
    .unwrap()
    .data
    .unwrap();
    assert_eq!(cart.total, 20);

    let cart = cart_service::add_item(
        &state,
        &customer,
        AddCartItemRequest {
            product_id: gadget.id,
            quantity: None,
        },
    )
    .await
    .unwrap()
    .data
    .unwrap();
    assert_eq!(cart.total, 45);

    let cart = cart_service::remove_item(&state, &customer, widget.id, None)
        .await
        .unwrap()
        .data
        .unwrap();
    assert_eq!(cart.total, 35);

    // removing more than held deletes the line
    let cart = cart_service::remove_item(&state, &customer, widget.id, Some(10))
        .await
        .unwrap()
        .data
        .unwrap();
    assert_eq!(cart.items.len(), 1);
    assert_eq!(cart.total, 25);

    let err = cart_service::remove_item(&state, &customer, widget.id, None)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::ItemNotInCart(_)));
}

#[tokio::test]
async fn cart_rejects_unknown_products() {
    let state = test_state();
    let customer = seed_account(&state, "carol", Role::Customer).await;

    let err = cart_service::add_item(
        &state,
        &customer,
        AddCartItemRequest {
            product_id: Uuid::new_v4(),
            quantity: Some(1),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::UnknownProduct(_)));
}
