use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::IntoResponse,
};

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{GeneratedReport, InventoryRecord, ReportRequest};
use crate::pipeline::{GenerateOutcome, ReportView};

const CSV_HEADER: [&str; 10] = [
    "id",
    "name",
    "sku",
    "category",
    "quantity",
    "status",
    "value",
    "lastUpdated",
    "turnoverRate",
    "expirationDate",
];

pub async fn get_report(State(state): State<AppState>) -> Json<ReportView> {
    Json(state.orchestrator.view())
}

pub async fn select_report(
    State(state): State<AppState>,
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> AppResult<Json<ReportView>> {
    let Json(request) = payload?;
    state.orchestrator.select_report(request)?;
    Ok(Json(state.orchestrator.view()))
}

pub async fn generate_report(State(state): State<AppState>) -> AppResult<Json<GeneratedReport>> {
    match state.orchestrator.generate().await? {
        GenerateOutcome::Completed(report) => Ok(Json(GeneratedReport::clone(&report))),
        GenerateOutcome::AlreadyInFlight => Err(AppError::Conflict(
            "a report is already being generated".to_string(),
        )),
        GenerateOutcome::Discarded => Err(AppError::Conflict(
            "the report session was reset during generation".to_string(),
        )),
    }
}

pub async fn reset_report(State(state): State<AppState>) -> StatusCode {
    state.orchestrator.reset();
    StatusCode::NO_CONTENT
}

pub async fn export_csv(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let report = state
        .orchestrator
        .current_report()
        .ok_or_else(|| AppError::NotFound("no generated report to export".to_string()))?;

    let body = render_csv(report.snapshot.items())?;
    let filename = format!(
        "{}-{}.csv",
        report.request.report_type.as_str().to_lowercase(),
        report.snapshot.generated_at().format("%Y%m%d")
    );

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        body,
    ))
}

fn to_row(record: &InventoryRecord) -> [String; 10] {
    [
        record.id.clone(),
        record.name.clone(),
        record.sku.clone(),
        record.category.clone(),
        record.quantity.to_string(),
        record.status.label().to_string(),
        format!("{:.2}", record.value),
        record.last_updated.to_string(),
        record
            .turnover_rate
            .map(|rate| rate.to_string())
            .unwrap_or_default(),
        record
            .expiration_date
            .map(|date| date.to_string())
            .unwrap_or_default(),
    ]
}

fn render_csv(records: &[InventoryRecord]) -> AppResult<String> {
    let csv_error = |e: csv::Error| AppError::Internal(format!("csv export failed: {e}"));

    let mut wtr = csv::Writer::from_writer(Vec::new());
    wtr.write_record(CSV_HEADER).map_err(csv_error)?;
    for record in records {
        wtr.write_record(&to_row(record)).map_err(csv_error)?;
    }

    let bytes = wtr
        .into_inner()
        .map_err(|e| AppError::Internal(format!("csv export failed: {e}")))?;
    String::from_utf8(bytes).map_err(|e| AppError::Internal(format!("csv export failed: {e}")))
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::models::InventoryStatus;

    #[test]
    fn test_render_csv_quotes_and_blanks() {
        let records = vec![
            InventoryRecord {
                id: "ITEM-1000".to_string(),
                name: "Bolt, M8".to_string(),
                sku: "SKU-A1B2C3".to_string(),
                quantity: 0,
                category: "Spare Parts".to_string(),
                last_updated: NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
                status: InventoryStatus::OutOfStock,
                value: 0.0,
                turnover_rate: None,
                expiration_date: None,
            },
            InventoryRecord {
                id: "ITEM-1001".to_string(),
                name: "Glue".to_string(),
                sku: "SKU-ZZ9900".to_string(),
                quantity: 12,
                category: "Packaging".to_string(),
                last_updated: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
                status: InventoryStatus::LowStock,
                value: 48.5,
                turnover_rate: Some(3.0),
                expiration_date: NaiveDate::from_ymd_opt(2024, 6, 1),
            },
        ];

        let csv = render_csv(&records).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "id,name,sku,category,quantity,status,value,lastUpdated,turnoverRate,expirationDate"
        );
        assert_eq!(
            lines[1],
            "ITEM-1000,\"Bolt, M8\",SKU-A1B2C3,Spare Parts,0,Out of Stock,0.00,2024-05-01,,"
        );
        assert_eq!(
            lines[2],
            "ITEM-1001,Glue,SKU-ZZ9900,Packaging,12,Low Stock,48.50,2024-05-02,3,2024-06-01"
        );
    }

    #[test]
    fn test_render_csv_empty_report_has_header_only() {
        let csv = render_csv(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }
}
