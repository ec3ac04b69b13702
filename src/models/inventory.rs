use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Stock status of an inventory record. Closed set: producers must use one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InventoryStatus {
    #[serde(rename = "In Stock")]
    InStock,
    #[serde(rename = "Low Stock")]
    LowStock,
    #[serde(rename = "Out of Stock")]
    OutOfStock,
    #[serde(rename = "Overstock")]
    Overstock,
}

pub const LOW_STOCK_THRESHOLD: u32 = 20;
pub const OVERSTOCK_THRESHOLD: u32 = 400;

impl InventoryStatus {
    /// Status a producer assigns for a given on-hand quantity.
    ///
    /// This is a convention, not an invariant: `InventoryRecord` accepts any
    /// combination of quantity and status.
    pub fn for_quantity(quantity: u32) -> Self {
        if quantity == 0 {
            Self::OutOfStock
        } else if quantity < LOW_STOCK_THRESHOLD {
            Self::LowStock
        } else if quantity > OVERSTOCK_THRESHOLD {
            Self::Overstock
        } else {
            Self::InStock
        }
    }

    pub fn is_critical(self) -> bool {
        matches!(self, Self::LowStock | Self::OutOfStock)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::InStock => "In Stock",
            Self::LowStock => "Low Stock",
            Self::OutOfStock => "Out of Stock",
            Self::Overstock => "Overstock",
        }
    }
}

impl std::fmt::Display for InventoryStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryRecord {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub quantity: u32,
    pub category: String,
    pub last_updated: NaiveDate,
    pub status: InventoryStatus,
    /// Monetary value of the on-hand stock.
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub turnover_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<NaiveDate>,
}
