//! In-memory `Store` used by the binary and the integration tests. One
//! `RwLock` per collection gives the per-document ordering the trait
//! promises and nothing more.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Account, Cart, DriverProfile, Order, Product};

use super::{OrderFilter, Store, StoreError, StoreResult};

#[derive(Default)]
pub struct MemoryStore {
    accounts: RwLock<HashMap<Uuid, Account>>,
    products: RwLock<HashMap<Uuid, Product>>,
    carts: RwLock<HashMap<Uuid, Cart>>,
    orders: RwLock<HashMap<Uuid, Order>>,
    drivers: RwLock<HashMap<Uuid, DriverProfile>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn find_account(&self, id: Uuid) -> StoreResult<Option<Account>> {
        Ok(self.accounts.read().await.get(&id).cloned())
    }

    async fn insert_account(&self, account: Account) -> StoreResult<()> {
        self.accounts.write().await.insert(account.id, account);
        Ok(())
    }

    async fn update_account(&self, account: Account) -> StoreResult<()> {
        self.accounts.write().await.insert(account.id, account);
        Ok(())
    }

    async fn find_product(&self, id: Uuid) -> StoreResult<Option<Product>> {
        Ok(self.products.read().await.get(&id).cloned())
    }

    async fn list_products(&self) -> StoreResult<Vec<Product>> {
        let mut items: Vec<Product> = self.products.read().await.values().cloned().collect();
        items.sort_by_key(|p| p.created_at);
        Ok(items)
    }

    async fn insert_product(&self, product: Product) -> StoreResult<()> {
        self.products.write().await.insert(product.id, product);
        Ok(())
    }

    async fn update_product(&self, product: Product) -> StoreResult<()> {
        self.products.write().await.insert(product.id, product);
        Ok(())
    }

    async fn remove_product(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.products.write().await.remove(&id).is_some())
    }

    async fn find_cart(&self, account_id: Uuid) -> StoreResult<Option<Cart>> {
        Ok(self.carts.read().await.get(&account_id).cloned())
    }

    async fn upsert_cart(&self, cart: Cart) -> StoreResult<()> {
        self.carts.write().await.insert(cart.account_id, cart);
        Ok(())
    }

    async fn find_order(&self, id: Uuid) -> StoreResult<Option<Order>> {
        Ok(self.orders.read().await.get(&id).cloned())
    }

    async fn find_active_order(&self, customer: Uuid) -> StoreResult<Option<Order>> {
        Ok(self
            .orders
            .read()
            .await
            .values()
            .find(|o| o.customer == customer && o.active)
            .cloned())
    }

    async fn list_orders(&self, filter: OrderFilter) -> StoreResult<Vec<Order>> {
        let mut items: Vec<Order> = self
            .orders
            .read()
            .await
            .values()
            .filter(|o| filter.matches(o))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(items)
    }

    async fn insert_order(&self, order: Order) -> StoreResult<()> {
        self.orders.write().await.insert(order.id, order);
        Ok(())
    }

    async fn update_order(&self, order: Order) -> StoreResult<()> {
        self.orders.write().await.insert(order.id, order);
        Ok(())
    }

    async fn remove_order(&self, id: Uuid) -> StoreResult<bool> {
        Ok(self.orders.write().await.remove(&id).is_some())
    }

    async fn find_driver(&self, id: Uuid) -> StoreResult<Option<DriverProfile>> {
        Ok(self.drivers.read().await.get(&id).cloned())
    }

    async fn find_driver_by_account(&self, account_id: Uuid) -> StoreResult<Option<DriverProfile>> {
        Ok(self
            .drivers
            .read()
            .await
            .values()
            .find(|d| d.account_id == account_id)
            .cloned())
    }

    async fn list_drivers(&self) -> StoreResult<Vec<DriverProfile>> {
        let mut items: Vec<DriverProfile> = self.drivers.read().await.values().cloned().collect();
        items.sort_by_key(|d| d.created_at);
        Ok(items)
    }

    async fn insert_driver(&self, profile: DriverProfile) -> StoreResult<()> {
        self.drivers.write().await.insert(profile.id, profile);
        Ok(())
    }

    async fn update_driver(&self, profile: DriverProfile) -> StoreResult<()> {
        self.drivers.write().await.insert(profile.id, profile);
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SeedData {
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub drivers: Vec<DriverProfile>,
}

/// Load demo documents from a JSON file into the store at startup.
pub async fn seed_from_file(store: &MemoryStore, path: &Path) -> StoreResult<()> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| StoreError::Unavailable(format!("seed file {}: {e}", path.display())))?;
    let seed: SeedData = serde_json::from_str(&raw)
        .map_err(|e| StoreError::Unavailable(format!("seed file {}: {e}", path.display())))?;

    for account in seed.accounts {
        store.insert_account(account).await?;
    }
    for product in seed.products {
        store.insert_product(product).await?;
    }
    for driver in seed.drivers {
        store.insert_driver(driver).await?;
    }
    Ok(())
}
