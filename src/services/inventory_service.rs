use crate::{
    dto::drivers::{InventoryBatchRequest, InventoryView, StockOp},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_driver},
    response::{ApiResponse, Meta},
    state::AppState,
};

pub async fn view_inventory(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<InventoryView>> {
    ensure_driver(user)?;
    let profile = state
        .store
        .find_driver_by_account(user.account_id)
        .await?
        .ok_or(AppError::UnknownDriver(user.account_id))?;

    Ok(ApiResponse::success(
        "OK",
        InventoryView {
            items: profile.inventory,
        },
        Some(Meta::empty()),
    ))
}

/// Apply a stock batch to the caller's inventory. The whole batch is
/// validated up front and lands in a single profile write, so it either
/// fully applies or leaves the inventory untouched.
pub async fn update_inventory(
    state: &AppState,
    user: &AuthUser,
    payload: InventoryBatchRequest,
) -> AppResult<ApiResponse<InventoryView>> {
    ensure_driver(user)?;
    if payload.items.is_empty() {
        return Err(AppError::InvalidInput("no items in batch".into()));
    }
    if payload.items.iter().any(|i| i.quantity <= 0) {
        return Err(AppError::InvalidInput(
            "quantity must be greater than 0".into(),
        ));
    }

    let profile = state
        .store
        .find_driver_by_account(user.account_id)
        .await?
        .ok_or(AppError::UnknownDriver(user.account_id))?;

    let mut updated = profile.clone();
    match payload.op {
        StockOp::Add => {
            // an unknown product anywhere rejects the whole batch
            for item in &payload.items {
                state
                    .store
                    .find_product(item.product_id)
                    .await?
                    .ok_or(AppError::UnknownProduct(item.product_id))?;
            }
            for item in &payload.items {
                updated.add_stock(item.product_id, item.quantity)?;
            }
        }
        StockOp::Remove => {
            for item in &payload.items {
                updated.remove_stock(item.product_id, item.quantity)?;
            }
        }
    }
    state.store.update_driver(updated.clone()).await?;

    tracing::debug!(
        driver = %updated.id,
        items = payload.items.len(),
        "inventory batch applied"
    );
    Ok(ApiResponse::success(
        "Inventory updated",
        InventoryView {
            items: updated.inventory,
        },
        Some(Meta::empty()),
    ))
}
