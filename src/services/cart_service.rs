use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    db::Store,
    dto::cart::{AddCartItemRequest, CartLineView, CartView},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_customer},
    models::Cart,
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Prices of the products still present in the catalog for the given cart.
/// Lines whose product has since been deleted price at zero.
async fn price_table(store: &dyn Store, cart: &Cart) -> AppResult<HashMap<Uuid, i64>> {
    let mut prices = HashMap::new();
    for line in &cart.items {
        if let Some(product) = store.find_product(line.product_id).await? {
            prices.insert(product.id, product.price);
        }
    }
    Ok(prices)
}

pub async fn view_cart(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<CartView>> {
    ensure_customer(user)?;
    let cart = state
        .store
        .find_cart(user.account_id)
        .await?
        .unwrap_or_else(|| Cart::new(user.account_id));

    let mut items = Vec::with_capacity(cart.items.len());
    for line in &cart.items {
        match state.store.find_product(line.product_id).await? {
            Some(product) => items.push(CartLineView {
                product,
                quantity: line.quantity,
            }),
            None => {
                tracing::warn!(product_id = %line.product_id, "cart line references a deleted product");
            }
        }
    }

    let view = CartView {
        items,
        total: cart.total,
    };
    Ok(ApiResponse::success("OK", view, Some(Meta::empty())))
}

pub async fn add_item(
    state: &AppState,
    user: &AuthUser,
    payload: AddCartItemRequest,
) -> AppResult<ApiResponse<Cart>> {
    ensure_customer(user)?;
    let quantity = payload.quantity.unwrap_or(1);

    // validate the product before touching the cart
    state
        .store
        .find_product(payload.product_id)
        .await?
        .ok_or(AppError::UnknownProduct(payload.product_id))?;

    // carts are created lazily on first add
    let mut cart = state
        .store
        .find_cart(user.account_id)
        .await?
        .unwrap_or_else(|| Cart::new(user.account_id));

    cart.add_line(payload.product_id, quantity)?;
    let prices = price_table(state.store.as_ref(), &cart).await?;
    cart.recompute_total(&prices);
    state.store.upsert_cart(cart.clone()).await?;

    Ok(ApiResponse::success("OK", cart, None))
}

pub async fn remove_item(
    state: &AppState,
    user: &AuthUser,
    product_id: Uuid,
    quantity: Option<i32>,
) -> AppResult<ApiResponse<Cart>> {
    ensure_customer(user)?;
    let quantity = quantity.unwrap_or(1);

    let mut cart = state
        .store
        .find_cart(user.account_id)
        .await?
        .ok_or(AppError::ItemNotInCart(product_id))?;

    cart.remove_line(product_id, quantity)?;
    let prices = price_table(state.store.as_ref(), &cart).await?;
    cart.recompute_total(&prices);
    state.store.upsert_cart(cart.clone()).await?;

    Ok(ApiResponse::success("Removed from cart", cart, None))
}
