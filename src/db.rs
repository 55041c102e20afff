//! Document-store collaborator. The core only ever talks to the store
//! through this trait: find/list/insert/update/remove over five
//! collections, per-document write ordering, no cross-document atomicity.
//! Multi-document consistency is the coordinator's problem (see
//! `services::order_service`).

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Account, Cart, DriverProfile, Order, Product};

pub mod memory;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Filter for order listings; unset fields match everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct OrderFilter {
    pub customer: Option<Uuid>,
    pub driver: Option<Uuid>,
    pub active: Option<bool>,
}

impl OrderFilter {
    pub fn matches(&self, order: &Order) -> bool {
        self.customer.is_none_or(|c| order.customer == c)
            && self.driver.is_none_or(|d| order.driver == Some(d))
            && self.active.is_none_or(|a| order.active == a)
    }
}

/// Updates replace the stored document wholesale; the store does not merge.
#[async_trait]
pub trait Store: Send + Sync {
    // accounts
    async fn find_account(&self, id: Uuid) -> StoreResult<Option<Account>>;
    async fn insert_account(&self, account: Account) -> StoreResult<()>;
    async fn update_account(&self, account: Account) -> StoreResult<()>;

    // products
    async fn find_product(&self, id: Uuid) -> StoreResult<Option<Product>>;
    async fn list_products(&self) -> StoreResult<Vec<Product>>;
    async fn insert_product(&self, product: Product) -> StoreResult<()>;
    async fn update_product(&self, product: Product) -> StoreResult<()>;
    async fn remove_product(&self, id: Uuid) -> StoreResult<bool>;

    // carts, keyed by the owning account
    async fn find_cart(&self, account_id: Uuid) -> StoreResult<Option<Cart>>;
    async fn upsert_cart(&self, cart: Cart) -> StoreResult<()>;

    // orders
    async fn find_order(&self, id: Uuid) -> StoreResult<Option<Order>>;
    async fn find_active_order(&self, customer: Uuid) -> StoreResult<Option<Order>>;
    async fn list_orders(&self, filter: OrderFilter) -> StoreResult<Vec<Order>>;
    async fn insert_order(&self, order: Order) -> StoreResult<()>;
    async fn update_order(&self, order: Order) -> StoreResult<()>;
    async fn remove_order(&self, id: Uuid) -> StoreResult<bool>;

    // driver profiles
    async fn find_driver(&self, id: Uuid) -> StoreResult<Option<DriverProfile>>;
    async fn find_driver_by_account(&self, account_id: Uuid) -> StoreResult<Option<DriverProfile>>;
    async fn list_drivers(&self) -> StoreResult<Vec<DriverProfile>>;
    async fn insert_driver(&self, profile: DriverProfile) -> StoreResult<()>;
    async fn update_driver(&self, profile: DriverProfile) -> StoreResult<()>;
}
