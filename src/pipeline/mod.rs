pub mod aggregate;
pub mod analyze;
pub mod orchestrator;

pub use analyze::{AnalysisClient, AnalysisFailure, AnalysisOutcome};
pub use orchestrator::{GenerateOutcome, ReportOrchestrator, ReportPhase, ReportView};
