use uuid::Uuid;

use crate::{
    dto::products::{CreateProductRequest, ProductList, UpdateProductRequest},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_driver},
    models::Product,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

pub async fn list_products(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<ProductList>> {
    let (page, limit, offset) = pagination.normalize();
    let all = state.store.list_products().await?;
    let total = all.len() as i64;
    let items = all
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Products",
        ProductList { items },
        Some(meta),
    ))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let product = state
        .store
        .find_product(id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Product", product, None))
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_driver(user)?;
    if payload.name.trim().is_empty() {
        return Err(AppError::InvalidInput("name must not be empty".into()));
    }
    if payload.price < 0 || payload.stock < 0 {
        return Err(AppError::InvalidInput(
            "price and stock must not be negative".into(),
        ));
    }

    let product = Product {
        id: Uuid::new_v4(),
        name: payload.name,
        description: payload.description,
        price: payload.price,
        image_urls: payload.image_urls,
        stock: payload.stock,
        created_at: chrono::Utc::now(),
    };
    state.store.insert_product(product.clone()).await?;

    Ok(ApiResponse::success(
        "Product created",
        product,
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_driver(user)?;
    let existing = state
        .store
        .find_product(id)
        .await?
        .ok_or(AppError::NotFound)?;

    let product = Product {
        id,
        name: payload.name.unwrap_or(existing.name),
        description: payload.description.or(existing.description),
        price: payload.price.unwrap_or(existing.price),
        image_urls: payload.image_urls.unwrap_or(existing.image_urls),
        stock: payload.stock.unwrap_or(existing.stock),
        created_at: existing.created_at,
    };
    if product.price < 0 || product.stock < 0 {
        return Err(AppError::InvalidInput(
            "price and stock must not be negative".into(),
        ));
    }
    state.store.update_product(product.clone()).await?;

    Ok(ApiResponse::success("Updated", product, Some(Meta::empty())))
}

pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_driver(user)?;
    if !state.store.remove_product(id).await? {
        return Err(AppError::NotFound);
    }
    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
