use axum::extract::Query;
use axum::http::StatusCode;
use axum::Json;
use contracts::projections::p902_backorders::{
    BackorderDto, BackorderListRequest, BackorderListResponse,
};
use contracts::shared::table_query::FilterSpec;

use crate::projections::p902_backorders::repository;

/// Row-paged backorder list.
pub async fn list(
    Query(req): Query<BackorderListRequest>,
) -> Result<Json<BackorderListResponse>, StatusCode> {
    let filters = FilterSpec::new()
        .range("expected_date", req.date_from.clone(), req.date_to.clone())
        .equals_opt("vendor", req.vendor.clone())
        .equals_opt("status", req.status.clone())
        .contains_opt("item_code", req.search.clone());

    let (models, total) = repository::list_with_filters(&filters, req.limit, req.offset)
        .await
        .map_err(super::map_query_error)?;

    let items: Vec<BackorderDto> = models.into_iter().map(model_to_dto).collect();
    let has_more = total > req.offset + items.len() as u64;

    Ok(Json(BackorderListResponse {
        items,
        total_count: total,
        has_more,
    }))
}

fn model_to_dto(model: repository::Model) -> BackorderDto {
    BackorderDto {
        order_no: model.order_no,
        item_code: model.item_code,
        description: model.description,
        qty_ordered: model.qty_ordered,
        qty_received: model.qty_received,
        vendor: model.vendor,
        expected_date: model.expected_date,
        status: model.status,
        loaded_at_utc: model.loaded_at_utc,
    }
}
