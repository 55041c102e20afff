mod common;

use axum_delivery_api::{
    db::Store,
    dto::{
        cart::AddCartItemRequest,
        drivers::{InventoryBatchRequest, StockItem, StockOp},
        orders::{CreateOrderRequest, UpdateNotesRequest},
    },
    error::AppError,
    models::{OrderStatus, Role},
    services::{cart_service, inventory_service, order_service},
};
use common::{seed_account, seed_driver, seed_product, test_state};

// Full lifecycle: cart -> order -> accept -> advance x3 -> completed.
#[tokio::test]
async fn order_lifecycle_happy_path() {
    let state = test_state();
    let customer = seed_account(&state, "carol", Role::Customer).await;
    let (driver, driver_profile_id) = seed_driver(&state, "dave").await;
    let product = seed_product(&state, "Widget", 10, 100).await;

    // three units at price 10 -> cart total 30
    let cart = cart_service::add_item(
        &state,
        &customer,
        AddCartItemRequest {
            product_id: product.id,
            quantity: Some(3),
        },
    )
    .await
    .unwrap()
    .data
    .unwrap();
    assert_eq!(cart.total, 30);

    let order = order_service::create_order(&state, &customer, CreateOrderRequest::default())
        .await
        .unwrap()
        .data
        .unwrap();
    assert_eq!(order.total, 30);
    assert_eq!(order.status, OrderStatus::Sent);
    assert!(order.active);
    assert!(order.driver.is_none());

    // the cart was cleared, not deleted
    let cart = state.store.find_cart(customer.account_id).await.unwrap().unwrap();
    assert!(cart.items.is_empty());
    assert_eq!(cart.total, 0);

    // driver stocks five units, accepts, and is left with two
    inventory_service::update_inventory(
        &state,
        &driver,
        InventoryBatchRequest {
            op: StockOp::Add,
            items: vec![StockItem {
                product_id: product.id,
                quantity: 5,
            }],
        },
    )
    .await
    .unwrap();

    let accepted = order_service::accept_order(&state, &driver, order.id)
        .await
        .unwrap()
        .data
        .unwrap();
    assert_eq!(accepted.status, OrderStatus::Received);
    assert_eq!(accepted.driver, Some(driver_profile_id));

    let profile = state.store.find_driver(driver_profile_id).await.unwrap().unwrap();
    assert_eq!(profile.inventory[0].quantity, 2);
    assert_eq!(profile.active_orders, vec![order.id]);

    // received -> en_route -> arrived
    let advanced = order_service::advance_order(&state, &driver, order.id)
        .await
        .unwrap()
        .data
        .unwrap();
    assert_eq!(advanced.status, OrderStatus::EnRoute);
    let advanced = order_service::advance_order(&state, &driver, order.id)
        .await
        .unwrap()
        .data
        .unwrap();
    assert_eq!(advanced.status, OrderStatus::Arrived);

    // arrived -> completed: order goes inactive and moves to the past set
    let completed = order_service::advance_order(&state, &driver, order.id)
        .await
        .unwrap()
        .data
        .unwrap();
    assert_eq!(completed.status, OrderStatus::Completed);
    assert!(!completed.active);

    let profile = state.store.find_driver(driver_profile_id).await.unwrap().unwrap();
    assert!(profile.active_orders.is_empty());
    assert_eq!(profile.completed_orders, vec![order.id]);

    // a completed order cannot advance further
    let err = order_service::advance_order(&state, &driver, order.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidTransition { .. }));
}

#[tokio::test]
async fn accept_with_insufficient_stock_changes_nothing() {
    let state = test_state();
    let customer = seed_account(&state, "carol", Role::Customer).await;
    let (driver, driver_profile_id) = seed_driver(&state, "dave").await;
    let product = seed_product(&state, "Widget", 10, 100).await;

    cart_service::add_item(
        &state,
        &customer,
        AddCartItemRequest {
            product_id: product.id,
            quantity: Some(3),
        },
    )
    .await
    .unwrap();
    let order = order_service::create_order(&state, &customer, CreateOrderRequest::default())
        .await
        .unwrap()
        .data
        .unwrap();

    // only two on hand, three requested
    inventory_service::update_inventory(
        &state,
        &driver,
        InventoryBatchRequest {
            op: StockOp::Add,
            items: vec![StockItem {
                product_id: product.id,
                quantity: 2,
            }],
        },
    )
    .await
    .unwrap();

    let err = order_service::accept_order(&state, &driver, order.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::InsufficientStock {
            requested: 3,
            available: 2,
            ..
        }
    ));

    let profile = state.store.find_driver(driver_profile_id).await.unwrap().unwrap();
    assert_eq!(profile.inventory[0].quantity, 2);
    assert!(profile.active_orders.is_empty());

    let order = state.store.find_order(order.id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Sent);
    assert!(order.driver.is_none());
}

#[tokio::test]
async fn cancel_after_accept_restores_inventory() {
    let state = test_state();
    let customer = seed_account(&state, "carol", Role::Customer).await;
    let (driver, driver_profile_id) = seed_driver(&state, "dave").await;
    let product = seed_product(&state, "Widget", 10, 100).await;

    cart_service::add_item(
        &state,
        &customer,
        AddCartItemRequest {
            product_id: product.id,
            quantity: Some(3),
        },
    )
    .await
    .unwrap();
    let order = order_service::create_order(&state, &customer, CreateOrderRequest::default())
        .await
        .unwrap()
        .data
        .unwrap();

    inventory_service::update_inventory(
        &state,
        &driver,
        InventoryBatchRequest {
            op: StockOp::Add,
            items: vec![StockItem {
                product_id: product.id,
                quantity: 5,
            }],
        },
    )
    .await
    .unwrap();
    order_service::accept_order(&state, &driver, order.id)
        .await
        .unwrap();

    order_service::cancel_order(&state, &customer, order.id)
        .await
        .unwrap();

    // accept-then-cancel round-trips the inventory exactly
    let profile = state.store.find_driver(driver_profile_id).await.unwrap().unwrap();
    assert_eq!(profile.inventory[0].quantity, 5);
    assert!(profile.active_orders.is_empty());
    assert!(profile.completed_orders.is_empty());

    let order = state.store.find_order(order.id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Cancelled);
    assert!(!order.active);
    assert!(order.driver.is_none());

    // the customer is free to order again
    cart_service::add_item(
        &state,
        &customer,
        AddCartItemRequest {
            product_id: product.id,
            quantity: None,
        },
    )
    .await
    .unwrap();
    order_service::create_order(&state, &customer, CreateOrderRequest::default())
        .await
        .unwrap();
}

#[tokio::test]
async fn one_active_order_per_customer() {
    let state = test_state();
    let customer = seed_account(&state, "carol", Role::Customer).await;
    let product = seed_product(&state, "Widget", 10, 100).await;

    cart_service::add_item(
        &state,
        &customer,
        AddCartItemRequest {
            product_id: product.id,
            quantity: Some(1),
        },
    )
    .await
    .unwrap();
    order_service::create_order(&state, &customer, CreateOrderRequest::default())
        .await
        .unwrap();

    cart_service::add_item(
        &state,
        &customer,
        AddCartItemRequest {
            product_id: product.id,
            quantity: Some(1),
        },
    )
    .await
    .unwrap();
    let err = order_service::create_order(&state, &customer, CreateOrderRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AlreadyHasActiveOrder));
}

#[tokio::test]
async fn create_order_rejects_empty_cart() {
    let state = test_state();
    let customer = seed_account(&state, "carol", Role::Customer).await;

    let err = order_service::create_order(&state, &customer, CreateOrderRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));
}

#[tokio::test]
async fn only_assigned_driver_advances() {
    let state = test_state();
    let customer = seed_account(&state, "carol", Role::Customer).await;
    let (driver, _) = seed_driver(&state, "dave").await;
    let (other_driver, _) = seed_driver(&state, "erin").await;
    let product = seed_product(&state, "Widget", 10, 100).await;

    cart_service::add_item(
        &state,
        &customer,
        AddCartItemRequest {
            product_id: product.id,
            quantity: Some(1),
        },
    )
    .await
    .unwrap();
    let order = order_service::create_order(&state, &customer, CreateOrderRequest::default())
        .await
        .unwrap()
        .data
        .unwrap();

    inventory_service::update_inventory(
        &state,
        &driver,
        InventoryBatchRequest {
            op: StockOp::Add,
            items: vec![StockItem {
                product_id: product.id,
                quantity: 1,
            }],
        },
    )
    .await
    .unwrap();
    order_service::accept_order(&state, &driver, order.id)
        .await
        .unwrap();

    let err = order_service::advance_order(&state, &other_driver, order.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotAuthorized));

    let order = state.store.find_order(order.id).await.unwrap().unwrap();
    assert_eq!(order.status, OrderStatus::Received);
}

#[tokio::test]
async fn accept_is_first_come_first_served() {
    let state = test_state();
    let customer = seed_account(&state, "carol", Role::Customer).await;
    let (driver, _) = seed_driver(&state, "dave").await;
    let (other_driver, other_profile_id) = seed_driver(&state, "erin").await;
    let product = seed_product(&state, "Widget", 10, 100).await;

    cart_service::add_item(
        &state,
        &customer,
        AddCartItemRequest {
            product_id: product.id,
            quantity: Some(1),
        },
    )
    .await
    .unwrap();
    let order = order_service::create_order(&state, &customer, CreateOrderRequest::default())
        .await
        .unwrap()
        .data
        .unwrap();

    for caller in [&driver, &other_driver] {
        inventory_service::update_inventory(
            &state,
            caller,
            InventoryBatchRequest {
                op: StockOp::Add,
                items: vec![StockItem {
                    product_id: product.id,
                    quantity: 1,
                }],
            },
        )
        .await
        .unwrap();
    }

    order_service::accept_order(&state, &driver, order.id)
        .await
        .unwrap();
    let err = order_service::accept_order(&state, &other_driver, order.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AlreadyAssigned));

    // the loser's inventory is untouched
    let other_profile = state.store.find_driver(other_profile_id).await.unwrap().unwrap();
    assert_eq!(other_profile.inventory[0].quantity, 1);
    assert!(other_profile.active_orders.is_empty());
}

#[tokio::test]
async fn cancel_is_owner_only_and_early_only() {
    let state = test_state();
    let customer = seed_account(&state, "carol", Role::Customer).await;
    let stranger = seed_account(&state, "mallory", Role::Customer).await;
    let (driver, _) = seed_driver(&state, "dave").await;
    let product = seed_product(&state, "Widget", 10, 100).await;

    cart_service::add_item(
        &state,
        &customer,
        AddCartItemRequest {
            product_id: product.id,
            quantity: Some(1),
        },
    )
    .await
    .unwrap();
    let order = order_service::create_order(&state, &customer, CreateOrderRequest::default())
        .await
        .unwrap()
        .data
        .unwrap();

    let err = order_service::cancel_order(&state, &stranger, order.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotAuthorized));

    inventory_service::update_inventory(
        &state,
        &driver,
        InventoryBatchRequest {
            op: StockOp::Add,
            items: vec![StockItem {
                product_id: product.id,
                quantity: 1,
            }],
        },
    )
    .await
    .unwrap();
    order_service::accept_order(&state, &driver, order.id)
        .await
        .unwrap();
    order_service::advance_order(&state, &driver, order.id)
        .await
        .unwrap();

    // en_route is past the point of no return
    let err = order_service::cancel_order(&state, &customer, order.id)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::InvalidTransition {
            from: OrderStatus::EnRoute,
            to: OrderStatus::Cancelled,
        }
    ));
}

#[tokio::test]
async fn notes_editable_only_while_sent() {
    let state = test_state();
    let customer = seed_account(&state, "carol", Role::Customer).await;
    let (driver, _) = seed_driver(&state, "dave").await;
    let product = seed_product(&state, "Widget", 10, 100).await;

    cart_service::add_item(
        &state,
        &customer,
        AddCartItemRequest {
            product_id: product.id,
            quantity: Some(1),
        },
    )
    .await
    .unwrap();
    let order = order_service::create_order(
        &state,
        &customer,
        CreateOrderRequest {
            notes: Some("ring the bell".into()),
        },
    )
    .await
    .unwrap()
    .data
    .unwrap();
    assert_eq!(order.notes, "ring the bell");

    let updated = order_service::update_notes(
        &state,
        &customer,
        UpdateNotesRequest {
            notes: "leave at the door".into(),
        },
    )
    .await
    .unwrap()
    .data
    .unwrap();
    assert_eq!(updated.notes, "leave at the door");

    inventory_service::update_inventory(
        &state,
        &driver,
        InventoryBatchRequest {
            op: StockOp::Add,
            items: vec![StockItem {
                product_id: product.id,
                quantity: 1,
            }],
        },
    )
    .await
    .unwrap();
    order_service::accept_order(&state, &driver, order.id)
        .await
        .unwrap();

    let err = order_service::update_notes(
        &state,
        &customer,
        UpdateNotesRequest {
            notes: "too late".into(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::InvalidInput(_)));
}

#[tokio::test]
async fn order_snapshot_survives_price_changes() {
    let state = test_state();
    let customer = seed_account(&state, "carol", Role::Customer).await;
    let product = seed_product(&state, "Widget", 10, 100).await;

    cart_service::add_item(
        &state,
        &customer,
        AddCartItemRequest {
            product_id: product.id,
            quantity: Some(3),
        },
    )
    .await
    .unwrap();
    let order = order_service::create_order(&state, &customer, CreateOrderRequest::default())
        .await
        .unwrap()
        .data
        .unwrap();

    // reprice the catalog after the fact
    let mut repriced = product.clone();
    repriced.price = 99;
    state.store.update_product(repriced).await.unwrap();

    let order = state.store.find_order(order.id).await.unwrap().unwrap();
    assert_eq!(order.total, 30);
    assert_eq!(order.items[0].unit_price, 10);
}
