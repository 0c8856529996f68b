use axum::extract::Query;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use contracts::projections::p900_production_schedule::ScheduleReportRequest;
use contracts::projections::p901_plant_service_orders::ServiceReportRequest;
use contracts::shared::report::{ReportDocument, ReportRow};

use crate::projections::p900_production_schedule::repository as p900;
use crate::projections::p901_plant_service_orders::repository as p901;
use crate::shared::report;

const SCHEDULE_COLUMNS: &[&str] = &[
    "Order", "Line", "Dealer", "Style", "Finish", "Status", "Ship date", "Boxes",
];

const SERVICE_COLUMNS: &[&str] = &[
    "Service", "Order", "Dealer", "Reason", "Parts", "Status", "Boxes",
];

/// Printable production schedule, grouped by schedule date.
pub async fn production_schedule(
    Query(req): Query<ScheduleReportRequest>,
) -> Result<Json<ReportDocument>, StatusCode> {
    let document = build_schedule_report(&req)
        .await
        .map_err(super::map_query_error)?;
    Ok(Json(document))
}

/// Spreadsheet export of the same report.
pub async fn production_schedule_export(
    Query(req): Query<ScheduleReportRequest>,
) -> Result<Response, StatusCode> {
    let document = build_schedule_report(&req)
        .await
        .map_err(super::map_query_error)?;
    csv_response(&document, "production_schedule.csv")
}

/// Printable service-order report, grouped by service date.
pub async fn service_orders(
    Query(req): Query<ServiceReportRequest>,
) -> Result<Json<ReportDocument>, StatusCode> {
    let document = build_service_report(&req)
        .await
        .map_err(super::map_query_error)?;
    Ok(Json(document))
}

pub async fn service_orders_export(
    Query(req): Query<ServiceReportRequest>,
) -> Result<Response, StatusCode> {
    let document = build_service_report(&req)
        .await
        .map_err(super::map_query_error)?;
    csv_response(&document, "service_orders.csv")
}

async fn build_schedule_report(req: &ScheduleReportRequest) -> anyhow::Result<ReportDocument> {
    let filters = super::p900_production_schedule::schedule_filters(
        req.date_from.clone(),
        req.date_to.clone(),
        req.dealer.clone(),
        req.status.clone(),
        None,
    );
    let models = p900::list_for_report(&filters).await?;
    let rows: Vec<ReportRow> = models.into_iter().map(schedule_report_row).collect();
    let pages = report::paginate_for_print(&rows, req.items_per_page);

    Ok(ReportDocument {
        title: "Production Schedule".to_string(),
        column_titles: SCHEDULE_COLUMNS.iter().map(|s| s.to_string()).collect(),
        total_rows: rows.len(),
        pages,
    })
}

async fn build_service_report(req: &ServiceReportRequest) -> anyhow::Result<ReportDocument> {
    let filters = super::p901_plant_service_orders::service_filters(
        req.date_from.clone(),
        req.date_to.clone(),
        req.dealer.clone(),
        req.status.clone(),
        None,
    );
    let models = p901::list_for_report(&filters).await?;
    let rows: Vec<ReportRow> = models.into_iter().map(service_report_row).collect();
    let pages = report::paginate_for_print(&rows, req.items_per_page);

    Ok(ReportDocument {
        title: "Plant Service Orders".to_string(),
        column_titles: SERVICE_COLUMNS.iter().map(|s| s.to_string()).collect(),
        total_rows: rows.len(),
        pages,
    })
}

fn schedule_report_row(model: p900::Model) -> ReportRow {
    ReportRow {
        group_date: model.schedule_date,
        columns: vec![
            model.order_no,
            model.line_id,
            model.dealer,
            model.style,
            model.finish.unwrap_or_default(),
            model.status,
            model.ship_date.unwrap_or_default(),
        ],
        quantity: model.box_count,
    }
}

fn service_report_row(model: p901::Model) -> ReportRow {
    ReportRow {
        group_date: model.service_date,
        columns: vec![
            model.service_no,
            model.order_no,
            model.dealer,
            model.reason,
            model.parts_summary.unwrap_or_default(),
            model.status,
        ],
        quantity: model.box_count,
    }
}

fn csv_response(document: &ReportDocument, filename: &str) -> Result<Response, StatusCode> {
    let csv = report::report_to_csv(document).map_err(super::internal_error)?;

    let disposition = format!("attachment; filename=\"{}\"", filename);
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}
