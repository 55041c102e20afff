use std::sync::Arc;

use axum_delivery_api::{
    auth::StaticTokenAuth,
    db::Store,
    db::memory::MemoryStore,
    dto::drivers::RegisterDriverRequest,
    middleware::auth::AuthUser,
    models::{Account, Product, Role},
    services::driver_service,
    state::AppState,
};
use chrono::Utc;
use uuid::Uuid;

pub fn test_state() -> AppState {
    AppState {
        store: Arc::new(MemoryStore::new()),
        auth: Arc::new(StaticTokenAuth::new()),
    }
}

pub async fn seed_account(state: &AppState, name: &str, role: Role) -> AuthUser {
    let account = Account {
        id: Uuid::new_v4(),
        name: name.into(),
        email: format!("{name}@example.com"),
        role,
        address: Some("1 Main St".into()),
        phone: Some("555-0100".into()),
        age: Some(30),
        created_at: Utc::now(),
    };
    state.store.insert_account(account.clone()).await.unwrap();
    AuthUser {
        account_id: account.id,
        role,
    }
}

pub async fn seed_product(state: &AppState, name: &str, price: i64, stock: i32) -> Product {
    let product = Product {
        id: Uuid::new_v4(),
        name: name.into(),
        description: Some(format!("{name} for testing")),
        price,
        image_urls: Vec::new(),
        stock,
        created_at: Utc::now(),
    };
    state
        .store
        .insert_product(product.clone())
        .await
        .unwrap();
    product
}

/// Seed an account, promote it to driver, and return the caller plus the
/// profile id.
pub async fn seed_driver(state: &AppState, name: &str) -> (AuthUser, Uuid) {
    let caller = seed_account(state, name, Role::Customer).await;
    let resp = driver_service::register_driver(state, &caller, RegisterDriverRequest::default())
        .await
        .unwrap();
    let profile = resp.data.unwrap();
    (
        AuthUser {
            account_id: caller.account_id,
            role: Role::Driver,
        },
        profile.id,
    )
}
