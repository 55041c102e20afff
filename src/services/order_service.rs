//! Order lifecycle coordination. Accept and cancel touch two documents
//! (the order and the driver profile) with no transaction between them;
//! every path here writes the inventory side first and compensates it by
//! hand when the order write cannot follow.

use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    db::OrderFilter,
    dto::orders::{CreateOrderRequest, OrderList, UpdateNotesRequest},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_customer, ensure_driver},
    models::{DriverProfile, Order, OrderStatus},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

pub async fn create_order(
    state: &AppState,
    user: &AuthUser,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_customer(user)?;

    // Best-effort guard: the store offers no compare-and-swap, so two
    // concurrent creates can both pass this check. The window is a single
    // read-to-insert gap.
    if state
        .store
        .find_active_order(user.account_id)
        .await?
        .is_some()
    {
        return Err(AppError::AlreadyHasActiveOrder);
    }

    let mut cart = state
        .store
        .find_cart(user.account_id)
        .await?
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::InvalidInput("cart is empty".into()))?;

    // Every line must still resolve to a catalog product; its price at
    // this moment is what the order keeps.
    let mut prices = HashMap::new();
    for line in &cart.items {
        let product = state
            .store
            .find_product(line.product_id)
            .await?
            .ok_or(AppError::UnknownProduct(line.product_id))?;
        prices.insert(product.id, product.price);
    }

    let (items, total) = cart.snapshot(&prices);
    let order = Order::new(
        user.account_id,
        items,
        total,
        payload.notes.unwrap_or_default(),
    );
    state.store.insert_order(order.clone()).await?;

    cart.clear();
    if let Err(err) = state.store.upsert_cart(cart).await {
        // the order landed but the cart did not clear; take the order back
        // out so the lines cannot be spent twice
        if let Err(err) = state.store.remove_order(order.id).await {
            tracing::error!(order_id = %order.id, error = %err, "order removal failed after cart clear failure");
        }
        return Err(err.into());
    }

    tracing::info!(order_id = %order.id, customer = %user.account_id, total = order.total, "order created");
    Ok(ApiResponse::success(
        "Order created",
        order,
        Some(Meta::empty()),
    ))
}

pub async fn accept_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Order>> {
    ensure_driver(user)?;
    let profile = state
        .store
        .find_driver_by_account(user.account_id)
        .await?
        .ok_or(AppError::UnknownDriver(user.account_id))?;
    let order = state
        .store
        .find_order(id)
        .await?
        .ok_or(AppError::UnknownOrder(id))?;

    if order.status != OrderStatus::Sent {
        return Err(AppError::InvalidTransition {
            from: order.status,
            to: OrderStatus::Received,
        });
    }
    if order.driver.is_some() {
        return Err(AppError::AlreadyAssigned);
    }

    // The whole decrement happens on a working copy and lands in one
    // profile write, so acceptance is all-or-nothing across line items.
    let mut updated = profile;
    updated.take_stock(&order.items)?;
    updated.active_orders.push(order.id);
    state.store.update_driver(updated.clone()).await?;

    // Stock is now spoken for. Re-check the driver-is-null guard against
    // the store before committing the order side: a concurrent accept may
    // have won the race since the first read.
    let current = state
        .store
        .find_order(id)
        .await?
        .ok_or(AppError::UnknownOrder(id))?;
    if current.driver.is_some() {
        unwind_accept(state, updated, &order).await;
        return Err(AppError::AlreadyAssigned);
    }
    if current.status != OrderStatus::Sent {
        // a concurrent cancel got in between the two reads
        unwind_accept(state, updated, &order).await;
        return Err(AppError::InvalidTransition {
            from: current.status,
            to: OrderStatus::Received,
        });
    }

    let mut accepted = current;
    accepted.driver = Some(updated.id);
    accepted.status = OrderStatus::Received;
    if let Err(err) = state.store.update_order(accepted.clone()).await {
        unwind_accept(state, updated, &order).await;
        return Err(err.into());
    }

    tracing::info!(order_id = %id, driver = %updated.id, "order accepted");
    Ok(ApiResponse::success(
        "Order accepted",
        accepted,
        Some(Meta::empty()),
    ))
}

/// Give the stock back and drop the order from the active set after an
/// accept that could not commit its order write.
async fn unwind_accept(state: &AppState, mut profile: DriverProfile, order: &Order) {
    profile.restore_stock(&order.items);
    profile.active_orders.retain(|oid| *oid != order.id);
    if let Err(err) = state.store.update_driver(profile).await {
        tracing::error!(order_id = %order.id, error = %err, "inventory rollback failed after lost accept");
    }
}

pub async fn advance_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Order>> {
    ensure_driver(user)?;
    let profile = state
        .store
        .find_driver_by_account(user.account_id)
        .await?
        .ok_or(AppError::UnknownDriver(user.account_id))?;
    let order = state
        .store
        .find_order(id)
        .await?
        .ok_or(AppError::UnknownOrder(id))?;

    if order.driver != Some(profile.id) {
        return Err(AppError::NotAuthorized);
    }
    let next = order.status.next().ok_or(AppError::InvalidTransition {
        from: order.status,
        to: order.status,
    })?;

    let mut advanced = order.clone();
    advanced.status = next;
    if next == OrderStatus::Completed {
        advanced.active = false;
    }
    state.store.update_order(advanced.clone()).await?;

    if next == OrderStatus::Completed {
        let mut updated = profile;
        updated.active_orders.retain(|oid| *oid != order.id);
        updated.completed_orders.push(order.id);
        if let Err(err) = state.store.update_driver(updated).await {
            // keep the order and the driver sets agreeing: back out the
            // completion
            if let Err(err) = state.store.update_order(order).await {
                tracing::error!(order_id = %id, error = %err, "completion rollback failed");
            }
            return Err(err.into());
        }
    }

    tracing::info!(order_id = %id, status = %next, "order advanced");
    Ok(ApiResponse::success(
        "Order advanced",
        advanced,
        Some(Meta::empty()),
    ))
}

pub async fn cancel_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_customer(user)?;
    let order = state
        .store
        .find_order(id)
        .await?
        .ok_or(AppError::UnknownOrder(id))?;

    if order.customer != user.account_id {
        return Err(AppError::NotAuthorized);
    }
    if !order.status.can_cancel() {
        return Err(AppError::InvalidTransition {
            from: order.status,
            to: OrderStatus::Cancelled,
        });
    }

    // A received order already consumed driver stock; give it back before
    // clearing the assignment.
    if let Some(driver_id) = order.driver {
        let profile = state
            .store
            .find_driver(driver_id)
            .await?
            .ok_or(AppError::UnknownDriver(driver_id))?;
        let mut updated = profile;
        updated.restore_stock(&order.items);
        updated.active_orders.retain(|oid| *oid != order.id);
        state.store.update_driver(updated).await?;
    }

    let mut cancelled = order.clone();
    cancelled.driver = None;
    cancelled.status = OrderStatus::Cancelled;
    cancelled.active = false;
    if let Err(err) = state.store.update_order(cancelled).await {
        // the stock was already restored; take it back so a retried cancel
        // starts from a consistent pair
        if let Some(driver_id) = order.driver {
            retake_after_failed_cancel(state, driver_id, &order).await;
        }
        return Err(err.into());
    }

    tracing::info!(order_id = %id, "order cancelled");
    Ok(ApiResponse::success(
        "Order cancelled",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

async fn retake_after_failed_cancel(state: &AppState, driver_id: Uuid, order: &Order) {
    let profile = match state.store.find_driver(driver_id).await {
        Ok(Some(profile)) => profile,
        Ok(None) => return,
        Err(err) => {
            tracing::error!(order_id = %order.id, error = %err, "stock re-take failed after failed cancel");
            return;
        }
    };
    let mut updated = profile;
    if updated.take_stock(&order.items).is_err() {
        tracing::error!(order_id = %order.id, "stock re-take failed after failed cancel");
        return;
    }
    updated.active_orders.push(order.id);
    if let Err(err) = state.store.update_driver(updated).await {
        tracing::error!(order_id = %order.id, error = %err, "stock re-take failed after failed cancel");
    }
}

pub async fn update_notes(
    state: &AppState,
    user: &AuthUser,
    payload: UpdateNotesRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_customer(user)?;
    let order = state
        .store
        .find_active_order(user.account_id)
        .await?
        .ok_or(AppError::NotFound)?;

    // the snapshot is immutable once placed; only the notes stay editable,
    // and only until a driver picks the order up
    if order.status != OrderStatus::Sent {
        return Err(AppError::InvalidInput(
            "order can no longer be edited".into(),
        ));
    }

    let mut updated = order;
    updated.notes = payload.notes;
    state.store.update_order(updated.clone()).await?;

    Ok(ApiResponse::success("Notes updated", updated, None))
}

pub async fn list_all_orders(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_driver(user)?;
    paginate_orders(state, OrderFilter::default(), pagination).await
}

pub async fn list_active_orders(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_driver(user)?;
    let items = state
        .store
        .list_orders(OrderFilter {
            active: Some(true),
            ..OrderFilter::default()
        })
        .await?;
    Ok(ApiResponse::success("Ok", OrderList { items }, None))
}

pub async fn my_orders(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_customer(user)?;
    paginate_orders(
        state,
        OrderFilter {
            customer: Some(user.account_id),
            ..OrderFilter::default()
        },
        pagination,
    )
    .await
}

pub async fn my_active_order(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<Order>> {
    ensure_customer(user)?;
    let order = state
        .store
        .find_active_order(user.account_id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Ok", order, None))
}

pub async fn get_order(state: &AppState, user: &AuthUser, id: Uuid) -> AppResult<ApiResponse<Order>> {
    ensure_driver(user)?;
    let order = state
        .store
        .find_order(id)
        .await?
        .ok_or(AppError::UnknownOrder(id))?;
    Ok(ApiResponse::success("Ok", order, None))
}

async fn paginate_orders(
    state: &AppState,
    filter: OrderFilter,
    pagination: Pagination,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = pagination.normalize();
    let all = state.store.list_orders(filter).await?;
    let total = all.len() as i64;
    let items = all
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect();
    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Ok", OrderList { items }, Some(meta)))
}
