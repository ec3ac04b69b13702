use std::time::Duration;

use chrono::{NaiveDate, Utc};

use super::{InventorySource, SourceError};
use crate::models::{InventoryRecord, InventoryStatus, ReportRequest, ReportType};

pub const CATEGORIES: [&str; 5] = [
    "Electronics",
    "Spare Parts",
    "Tools",
    "Raw Materials",
    "Packaging",
];

const MAX_QUANTITY: u32 = 500;
const MAX_UNIT_PRICE: u32 = 1000;
const FIRST_ITEM_NUMBER: usize = 1000;
const SKU_LEN: usize = 6;

/// Random inventory generator standing in for a real warehouse backend.
#[derive(Debug, Clone)]
pub struct MockInventorySource {
    item_count: usize,
    latency: Duration,
    seed: Option<u64>,
}

impl MockInventorySource {
    pub fn new(item_count: usize) -> Self {
        Self {
            item_count,
            latency: Duration::ZERO,
            seed: None,
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Fixes the generator seed so every fetch yields the same records.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    fn generate(&self, request: &ReportRequest, today: NaiveDate) -> Vec<InventoryRecord> {
        let mut rng = match self.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };

        let category_filter = request
            .filters
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty());

        (0..self.item_count)
            .map(|i| {
                let quantity = rng.u32(0..MAX_QUANTITY);
                let category = category_filter
                    .unwrap_or(CATEGORIES[rng.usize(..CATEGORIES.len())])
                    .to_string();
                let sku: String = (0..SKU_LEN)
                    .map(|_| rng.alphanumeric().to_ascii_uppercase())
                    .collect();

                let mut record = InventoryRecord {
                    id: format!("ITEM-{}", FIRST_ITEM_NUMBER + i),
                    name: format!("Item {} ({category})", i + 1),
                    sku: format!("SKU-{sku}"),
                    quantity,
                    category,
                    last_updated: today,
                    status: InventoryStatus::for_quantity(quantity),
                    value: f64::from(rng.u32(0..MAX_UNIT_PRICE)) * f64::from(quantity),
                    turnover_rate: None,
                    expiration_date: None,
                };

                match request.report_type {
                    ReportType::ExpiryRisk => {
                        if rng.f64() > 0.7 {
                            record.status = InventoryStatus::LowStock;
                        }
                        record.expiration_date =
                            Some(today + chrono::Duration::days(rng.i64(-10..90)));
                    }
                    ReportType::DemandForecast | ReportType::MovementHistory => {
                        let rate = rng.f64() * 12.0;
                        record.turnover_rate = Some((rate * 100.0).round() / 100.0);
                    }
                    ReportType::InventoryBalance | ReportType::AbcAnalysis => {}
                }

                record
            })
            .collect()
    }
}

impl Default for MockInventorySource {
    fn default() -> Self {
        Self::new(25)
    }
}

#[async_trait::async_trait]
impl InventorySource for MockInventorySource {
    async fn fetch_snapshot(
        &self,
        request: &ReportRequest,
    ) -> Result<Vec<InventoryRecord>, SourceError> {
        if request.report_type.is_reserved() {
            return Err(SourceError::InvalidRequest(format!(
                "no generator for report type {}",
                request.report_type
            )));
        }

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        if let Some(warehouse) = request.filters.warehouse.as_deref() {
            tracing::debug!(warehouse = %warehouse, "warehouse filter ignored by mock source");
        }

        Ok(self.generate(request, Utc::now().date_naive()))
    }

    fn name(&self) -> &str {
        "mock"
    }
}
