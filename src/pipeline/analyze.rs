use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Config;
use crate::llm::{GenerateRequest, LlmClient};
use crate::models::{
    AnalysisResult, AnalysisSource, InventoryStatus, ReportSnapshot, ReportType, RiskLevel,
    Summary,
};

/// Records included in the payload sent to the model. The rest of the
/// snapshot is represented only by `totalItemsCount`.
pub const SAMPLE_LIMIT: usize = 10;

const SYSTEM_INSTRUCTION: &str = "You are an expert analyst in warehouse logistics and \
    inventory management. Analyze the report data you are given and produce a short, \
    professional summary. Focus on identifying risks, inefficiencies and optimization \
    opportunities. Answer in JSON.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisFailure {
    #[error("analysis service call failed: {0}")]
    Transport(String),

    #[error("analysis service returned an empty response")]
    EmptyResponse,

    #[error("analysis response is malformed: {0}")]
    Malformed(String),

    #[error("analysis service did not answer in time")]
    TimedOut,
}

impl AnalysisFailure {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::EmptyResponse => "empty_response",
            Self::Malformed(_) => "malformed",
            Self::TimedOut => "timeout",
        }
    }
}

/// Either the parsed model analysis or the reason the fixed fallback applies.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Analyzed(AnalysisResult),
    Fallback(AnalysisFailure),
}

impl AnalysisOutcome {
    pub fn source(&self) -> AnalysisSource {
        match self {
            Self::Analyzed(_) => AnalysisSource::Model,
            Self::Fallback(_) => AnalysisSource::Fallback,
        }
    }

    pub fn into_result(self) -> AnalysisResult {
        match self {
            Self::Analyzed(result) => result,
            Self::Fallback(_) => AnalysisResult::fallback(),
        }
    }
}

impl From<Result<AnalysisResult, AnalysisFailure>> for AnalysisOutcome {
    fn from(result: Result<AnalysisResult, AnalysisFailure>) -> Self {
        match result {
            Ok(analysis) => Self::Analyzed(analysis),
            Err(failure) => Self::Fallback(failure),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleItem<'a> {
    pub name: &'a str,
    pub qty: u32,
    pub status: InventoryStatus,
    pub value: f64,
}

/// Condensed view of a snapshot sent to the model.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisPayload<'a> {
    pub report_type: ReportType,
    pub summary_metrics: &'a Summary,
    pub top_items: Vec<SampleItem<'a>>,
    pub total_items_count: usize,
}

impl<'a> AnalysisPayload<'a> {
    pub fn new(report_type: ReportType, snapshot: &'a ReportSnapshot) -> Self {
        let top_items = snapshot
            .items()
            .iter()
            .take(SAMPLE_LIMIT)
            .map(|item| SampleItem {
                name: &item.name,
                qty: item.quantity,
                status: item.status,
                value: item.value,
            })
            .collect();

        Self {
            report_type,
            summary_metrics: snapshot.summary(),
            top_items,
            total_items_count: snapshot.items().len(),
        }
    }
}

pub fn build_prompt(report_type: ReportType, payload_json: &str) -> String {
    format!(
        "Analyze the following warehouse report data of type \"{report_type}\".\n\
        Data: {payload_json}\n\n\
        Return JSON with exactly these fields:\n\
        1. \"summary\": a short narrative summary of the situation (2-3 sentences).\n\
        2. \"recommendations\": an array of strings (3-5 concrete actions for the warehouse manager).\n\
        3. \"riskAssessment\": one of [\"Low\", \"Medium\", \"High\"] depending on critical problems \
        (shortages, overstock, expiring goods)."
    )
}

/// Requests a narrative analysis of a snapshot from the configured LLM.
///
/// `analyze` never fails: transport errors, empty bodies and malformed
/// answers all produce [`AnalysisResult::fallback`].
pub struct AnalysisClient {
    llm: Arc<LlmClient>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl AnalysisClient {
    pub fn new(llm: Arc<LlmClient>, model: impl Into<String>) -> Self {
        Self {
            llm,
            model: model.into(),
            temperature: 0.3,
            max_tokens: 1024,
        }
    }

    pub fn from_config(llm: Arc<LlmClient>, config: &Config) -> Self {
        Self {
            llm,
            model: config.llm_model.clone(),
            temperature: config.analysis_temperature,
            max_tokens: config.analysis_max_tokens,
        }
    }

    pub async fn analyze(&self, report_type: ReportType, snapshot: &ReportSnapshot) -> AnalysisResult {
        self.analyze_outcome(report_type, snapshot)
            .await
            .into_result()
    }

    #[tracing::instrument(
        name = "pipeline_stage analyze",
        skip(self, snapshot),
        fields(
            pipeline.stage = "analyze",
            report.type = %report_type,
            analysis.sample_size,
            analysis.outcome,
            analysis.risk,
        )
    )]
    pub async fn analyze_outcome(
        &self,
        report_type: ReportType,
        snapshot: &ReportSnapshot,
    ) -> AnalysisOutcome {
        let span = tracing::Span::current();
        let payload = AnalysisPayload::new(report_type, snapshot);
        span.record("analysis.sample_size", payload.top_items.len());

        let outcome = AnalysisOutcome::from(self.request_analysis(report_type, &payload).await);

        match &outcome {
            AnalysisOutcome::Analyzed(result) => {
                span.record("analysis.outcome", "model");
                span.record("analysis.risk", result.risk_assessment.as_str());
            }
            AnalysisOutcome::Fallback(failure) => {
                span.record("analysis.outcome", "fallback");
                tracing::warn!(
                    failure = failure.kind(),
                    error = %failure,
                    "AI analysis unavailable, using fallback"
                );
            }
        }

        outcome
    }

    async fn request_analysis(
        &self,
        report_type: ReportType,
        payload: &AnalysisPayload<'_>,
    ) -> Result<AnalysisResult, AnalysisFailure> {
        let payload_json = serde_json::to_string(payload)
            .map_err(|e| AnalysisFailure::Malformed(format!("payload encoding: {e}")))?;

        let resp = self
            .llm
            .generate(&GenerateRequest {
                model: self.model.clone(),
                system: SYSTEM_INSTRUCTION.to_string(),
                prompt: build_prompt(report_type, &payload_json),
                temperature: self.temperature,
                max_tokens: self.max_tokens,
                json_mode: true,
                stage: "analyze".to_string(),
            })
            .await
            .map_err(|e| AnalysisFailure::Transport(e.to_string()))?;

        parse_analysis_response(&resp.content)
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAnalysis {
    summary: String,
    recommendations: Vec<String>,
    risk_assessment: RiskLevel,
}

pub(crate) fn parse_analysis_response(content: &str) -> Result<AnalysisResult, AnalysisFailure> {
    if content.trim().is_empty() {
        return Err(AnalysisFailure::EmptyResponse);
    }

    let json_str = extract_json(content);
    let raw: RawAnalysis = serde_json::from_str(&json_str)
        .map_err(|e| AnalysisFailure::Malformed(e.to_string()))?;

    let summary = raw.summary.trim().to_string();
    if summary.is_empty() {
        return Err(AnalysisFailure::Malformed("summary is empty".to_string()));
    }

    let recommendations: Vec<String> = raw
        .recommendations
        .into_iter()
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .collect();
    if recommendations.is_empty() {
        return Err(AnalysisFailure::Malformed(
            "recommendations are empty".to_string(),
        ));
    }

    Ok(AnalysisResult {
        summary,
        recommendations,
        risk_assessment: raw.risk_assessment,
    })
}

/// Pulls a JSON object out of a model reply that may wrap it in a code fence
/// or surrounding prose.
pub(crate) fn extract_json(content: &str) -> String {
    if let Some(start) = content.find("```json")
        && let Some(end) = content[start + 7..].find("```")
    {
        return content[start + 7..start + 7 + end].trim().to_string();
    }
    if let Some(start) = content.find("```")
        && let Some(end) = content[start + 3..].find("```")
    {
        let inner = content[start + 3..start + 3 + end].trim();
        if inner.starts_with('{') {
            return inner.to_string();
        }
    }
    if let Some(start) = content.find('{')
        && let Some(end) = content.rfind('}')
        && start < end
    {
        return content[start..=end].to_string();
    }
    content.trim().to_string()
}
