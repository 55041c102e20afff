use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{DriverProfile, StockEntry};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct RegisterDriverRequest {
    pub phone: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DriverList {
    pub items: Vec<DriverProfile>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StockOp {
    Add,
    Remove,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct StockItem {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// A batch applies in full or not at all.
#[derive(Debug, Deserialize, ToSchema)]
pub struct InventoryBatchRequest {
    pub op: StockOp,
    pub items: Vec<StockItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InventoryView {
    pub items: Vec<StockEntry>,
}
