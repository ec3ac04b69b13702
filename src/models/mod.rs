pub mod analysis;
pub mod inventory;
pub mod report;

pub use analysis::{AnalysisResult, AnalysisSource, RiskLevel};
pub use inventory::{InventoryRecord, InventoryStatus};
pub use report::{
    GeneratedReport, REPORT_CATALOG, ReportBreakdown, ReportDescriptor, ReportFilters, ReportRequest,
    ReportSnapshot, ReportType, Summary,
};
