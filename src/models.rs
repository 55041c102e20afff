use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Driver,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub age: Option<i32>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub image_urls: Vec<String>,
    pub stock: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CartLine {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// One cart per account. `total` is derived from the lines and the catalog
/// prices at mutation time; it is never set directly.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Cart {
    pub id: Uuid,
    pub account_id: Uuid,
    pub items: Vec<CartLine>,
    pub total: i64,
    pub created_at: DateTime<Utc>,
}

impl Cart {
    pub fn new(account_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            items: Vec::new(),
            total: 0,
            created_at: Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn add_line(&mut self, product_id: Uuid, quantity: i32) -> Result<(), AppError> {
        if quantity <= 0 {
            return Err(AppError::InvalidInput(
                "quantity must be greater than 0".into(),
            ));
        }
        match self.items.iter_mut().find(|l| l.product_id == product_id) {
            Some(line) => line.quantity += quantity,
            None => self.items.push(CartLine {
                product_id,
                quantity,
            }),
        }
        Ok(())
    }

    /// Removing at least the current quantity deletes the line; a line never
    /// stays in the cart with quantity <= 0.
    pub fn remove_line(&mut self, product_id: Uuid, quantity: i32) -> Result<(), AppError> {
        if quantity <= 0 {
            return Err(AppError::InvalidInput(
                "quantity must be greater than 0".into(),
            ));
        }
        let index = self
            .items
            .iter()
            .position(|l| l.product_id == product_id)
            .ok_or(AppError::ItemNotInCart(product_id))?;
        if quantity >= self.items[index].quantity {
            self.items.remove(index);
        } else {
            self.items[index].quantity -= quantity;
        }
        Ok(())
    }

    pub fn recompute_total(&mut self, prices: &HashMap<Uuid, i64>) {
        self.total = self
            .items
            .iter()
            .map(|l| prices.get(&l.product_id).copied().unwrap_or(0) * l.quantity as i64)
            .sum();
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.total = 0;
    }

    /// Read-only copy of the lines with unit prices frozen in, plus the
    /// total over those prices. Does not mutate the cart; clearing is a
    /// separate step.
    pub fn snapshot(&self, prices: &HashMap<Uuid, i64>) -> (Vec<LineItem>, i64) {
        let items: Vec<LineItem> = self
            .items
            .iter()
            .map(|l| LineItem {
                product_id: l.product_id,
                quantity: l.quantity,
                unit_price: prices.get(&l.product_id).copied().unwrap_or(0),
            })
            .collect();
        let total = items
            .iter()
            .map(|l| l.unit_price * l.quantity as i64)
            .sum();
        (items, total)
    }
}

/// Order line frozen at creation time. Later catalog price edits never
/// change a placed order.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LineItem {
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Sent,
    Received,
    EnRoute,
    Arrived,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Sent => "sent",
            OrderStatus::Received => "received",
            OrderStatus::EnRoute => "en_route",
            OrderStatus::Arrived => "arrived",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Next state in the delivery progression, if there is one.
    pub fn next(self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Sent => Some(OrderStatus::Received),
            OrderStatus::Received => Some(OrderStatus::EnRoute),
            OrderStatus::EnRoute => Some(OrderStatus::Arrived),
            OrderStatus::Arrived => Some(OrderStatus::Completed),
            OrderStatus::Completed | OrderStatus::Cancelled => None,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Cancellation is only legal before the driver starts moving.
    pub fn can_cancel(self) -> bool {
        matches!(self, OrderStatus::Sent | OrderStatus::Received)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub customer: Uuid,
    pub items: Vec<LineItem>,
    pub total: i64,
    /// Driver profile id once accepted, null while `sent`.
    pub driver: Option<Uuid>,
    pub notes: String,
    pub status: OrderStatus,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl Order {
    pub fn new(customer: Uuid, items: Vec<LineItem>, total: i64, notes: String) -> Self {
        Self {
            id: Uuid::new_v4(),
            customer,
            items,
            total,
            driver: None,
            notes,
            status: OrderStatus::Sent,
            active: true,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StockEntry {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DriverProfile {
    pub id: Uuid,
    pub account_id: Uuid,
    pub driver_status: String,
    pub phone: Option<String>,
    /// Deliverable stock on hand, independent of catalog `stock`.
    pub inventory: Vec<StockEntry>,
    pub active_orders: Vec<Uuid>,
    pub completed_orders: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl DriverProfile {
    pub fn new(account_id: Uuid, phone: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            account_id,
            driver_status: "available".into(),
            phone,
            inventory: Vec::new(),
            active_orders: Vec::new(),
            completed_orders: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn on_hand(&self, product_id: Uuid) -> i32 {
        self.inventory
            .iter()
            .find(|e| e.product_id == product_id)
            .map(|e| e.quantity)
            .unwrap_or(0)
    }

    /// Pure query, never mutates.
    pub fn has_sufficient_stock(&self, product_id: Uuid, quantity: i32) -> bool {
        self.on_hand(product_id) >= quantity
    }

    pub fn add_stock(&mut self, product_id: Uuid, quantity: i32) -> Result<(), AppError> {
        if quantity <= 0 {
            return Err(AppError::InvalidInput(
                "quantity must be greater than 0".into(),
            ));
        }
        self.credit(product_id, quantity);
        Ok(())
    }

    fn credit(&mut self, product_id: Uuid, quantity: i32) {
        match self.inventory.iter_mut().find(|e| e.product_id == product_id) {
            Some(entry) => entry.quantity += quantity,
            None => self.inventory.push(StockEntry {
                product_id,
                quantity,
            }),
        }
    }

    /// Does not clamp: callers pre-check `has_sufficient_stock`. An entry
    /// drained to exactly zero is removed, not stored.
    pub fn remove_stock(&mut self, product_id: Uuid, quantity: i32) -> Result<(), AppError> {
        if quantity <= 0 {
            return Err(AppError::InvalidInput(
                "quantity must be greater than 0".into(),
            ));
        }
        let index = self
            .inventory
            .iter()
            .position(|e| e.product_id == product_id)
            .ok_or(AppError::UnknownProduct(product_id))?;
        let on_hand = self.inventory[index].quantity;
        if quantity > on_hand {
            return Err(AppError::InsufficientStock {
                product_id,
                requested: quantity,
                available: on_hand,
            });
        }
        if quantity == on_hand {
            self.inventory.remove(index);
        } else {
            self.inventory[index].quantity -= quantity;
        }
        Ok(())
    }

    /// Batch decrement for an accepted order. Every line is checked before
    /// anything is touched, so the profile is unchanged on error.
    pub fn take_stock(&mut self, items: &[LineItem]) -> Result<(), AppError> {
        for line in items {
            if !self.has_sufficient_stock(line.product_id, line.quantity) {
                return Err(AppError::InsufficientStock {
                    product_id: line.product_id,
                    requested: line.quantity,
                    available: self.on_hand(line.product_id),
                });
            }
        }
        for line in items {
            self.remove_stock(line.product_id, line.quantity)?;
        }
        Ok(())
    }

    /// Reverse of `take_stock`, used on cancellation and rollback. Line
    /// quantities are always positive, so this cannot fail.
    pub fn restore_stock(&mut self, items: &[LineItem]) {
        for line in items.iter().filter(|l| l.quantity > 0) {
            self.credit(line.product_id, line.quantity);
        }
    }
}
