use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::AppState;

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "warehouse-report-generator",
        "version": env!("CARGO_PKG_VERSION"),
        "llmProvider": state.config.llm_provider,
        "reportPhase": state.orchestrator.phase(),
    }))
}
