use axum::Json;

use crate::models::{REPORT_CATALOG, ReportDescriptor};

pub async fn list_report_types() -> Json<&'static [ReportDescriptor]> {
    Json(&REPORT_CATALOG)
}
