pub mod health;
pub mod report;
pub mod report_types;

use axum::Router;
use axum::routing::{get, post, put};

use crate::AppState;

pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health::health))
        .route("/api/report-types", get(report_types::list_report_types))
        .route(
            "/api/report",
            get(report::get_report).delete(report::reset_report),
        )
        .route("/api/report/selection", put(report::select_report))
        .route("/api/report/generate", post(report::generate_report))
        .route("/api/report/export.csv", get(report::export_csv))
}
