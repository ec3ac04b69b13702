use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::analysis::{AnalysisResult, AnalysisSource};
use super::inventory::{InventoryRecord, InventoryStatus};
use crate::pipeline::aggregate::{aggregate, breakdown};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportType {
    InventoryBalance,
    MovementHistory,
    ExpiryRisk,
    DemandForecast,
    /// Reserved. Accepted on the wire but no generator is wired to it.
    AbcAnalysis,
}

impl ReportType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InventoryBalance => "INVENTORY_BALANCE",
            Self::MovementHistory => "MOVEMENT_HISTORY",
            Self::ExpiryRisk => "EXPIRY_RISK",
            Self::DemandForecast => "DEMAND_FORECAST",
            Self::AbcAnalysis => "ABC_ANALYSIS",
        }
    }

    pub fn is_reserved(self) -> bool {
        matches!(self, Self::AbcAnalysis)
    }

    pub fn descriptor(self) -> Option<&'static ReportDescriptor> {
        REPORT_CATALOG.iter().find(|d| d.id == self)
    }
}

impl std::fmt::Display for ReportType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportDescriptor {
    pub id: ReportType,
    pub title: &'static str,
    pub description: &'static str,
}

/// Report types offered for selection. `AbcAnalysis` is intentionally absent.
pub static REPORT_CATALOG: [ReportDescriptor; 4] = [
    ReportDescriptor {
        id: ReportType::InventoryBalance,
        title: "Inventory balance",
        description: "Current quantity and value of stock across all categories.",
    },
    ReportDescriptor {
        id: ReportType::MovementHistory,
        title: "Movement history",
        description: "Receipts and shipments over the selected period.",
    },
    ReportDescriptor {
        id: ReportType::ExpiryRisk,
        title: "Expiry risk",
        description: "Items approaching their expiration date or already expired.",
    },
    ReportDescriptor {
        id: ReportType::DemandForecast,
        title: "Demand forecast",
        description: "AI forecast of item demand for the next month.",
    },
];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFilters {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warehouse: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportRequest {
    pub report_type: ReportType,
    #[serde(flatten)]
    pub filters: ReportFilters,
}

impl ReportRequest {
    pub fn new(report_type: ReportType) -> Self {
        Self {
            report_type,
            filters: ReportFilters::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_items: usize,
    pub total_value: f64,
    pub critical_items_count: usize,
}

/// Point-in-time inventory records for one generation.
///
/// The summary is computed on construction and cannot be changed afterwards,
/// so it always agrees with the records it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSnapshot {
    generated_at: DateTime<Utc>,
    items: Vec<InventoryRecord>,
    summary: Summary,
}

impl ReportSnapshot {
    pub fn new(generated_at: DateTime<Utc>, items: Vec<InventoryRecord>) -> Self {
        let summary = aggregate(&items);
        Self {
            generated_at,
            items,
            summary,
        }
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn items(&self) -> &[InventoryRecord] {
        &self.items
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryValue {
    pub category: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: InventoryStatus,
    pub count: usize,
}

/// Chart-ready groupings of a snapshot, in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportBreakdown {
    pub value_by_category: Vec<CategoryValue>,
    pub status_distribution: Vec<StatusCount>,
}

impl From<&ReportSnapshot> for ReportBreakdown {
    fn from(snapshot: &ReportSnapshot) -> Self {
        breakdown(snapshot.items())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedReport {
    pub id: Uuid,
    pub request: ReportRequest,
    pub snapshot: ReportSnapshot,
    pub breakdown: ReportBreakdown,
    pub analysis: AnalysisResult,
    pub analysis_source: AnalysisSource,
    pub generation_duration_ms: u64,
}

impl GeneratedReport {
    pub fn new(
        request: ReportRequest,
        snapshot: ReportSnapshot,
        analysis: AnalysisResult,
        analysis_source: AnalysisSource,
        duration: Duration,
    ) -> Self {
        let breakdown = ReportBreakdown::from(&snapshot);
        Self {
            id: Uuid::new_v4(),
            request,
            snapshot,
            breakdown,
            analysis,
            analysis_source,
            generation_duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
        }
    }

    pub fn summary(&self) -> &Summary {
        self.snapshot.summary()
    }
}
