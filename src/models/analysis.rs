use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

pub const FALLBACK_SUMMARY: &str =
    "Unable to obtain an AI analysis. Check the connection or the API key.";

pub const FALLBACK_RECOMMENDATIONS: [&str; 2] = [
    "Review the data manually",
    "Contact your system administrator",
];

/// Narrative analysis attached to a generated report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub summary: String,
    pub recommendations: Vec<String>,
    pub risk_assessment: RiskLevel,
}

impl AnalysisResult {
    /// The fixed result shown whenever the analysis service cannot be used.
    pub fn fallback() -> Self {
        Self {
            summary: FALLBACK_SUMMARY.to_string(),
            recommendations: FALLBACK_RECOMMENDATIONS
                .iter()
                .map(|r| r.to_string())
                .collect(),
            risk_assessment: RiskLevel::Medium,
        }
    }
}

/// Where the analysis attached to a report came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisSource {
    Model,
    Fallback,
}
