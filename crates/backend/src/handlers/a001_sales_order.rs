use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::Json;
use contracts::domain::a001_sales_order::{
    SalesOrder, SalesOrderDto, SalesOrderListRequest, SalesOrderListResponse,
};

use crate::domain::a001_sales_order::{repository, service};

/// List active orders, row-paged.
pub async fn list_all(
    Query(req): Query<SalesOrderListRequest>,
) -> Result<Json<SalesOrderListResponse>, StatusCode> {
    let (models, total) = repository::list_paginated(req.limit, req.offset)
        .await
        .map_err(super::internal_error)?;

    let mut items = Vec::with_capacity(models.len());
    for model in models {
        items.push(repository::model_to_aggregate(model).map_err(super::internal_error)?);
    }

    let has_more = total > req.offset + items.len() as u64;

    Ok(Json(SalesOrderListResponse {
        items,
        total_count: total,
        has_more,
    }))
}

pub async fn get_by_id(Path(id): Path<String>) -> Result<Json<SalesOrder>, StatusCode> {
    let model = repository::get_by_id(&id)
        .await
        .map_err(super::internal_error)?
        .ok_or(StatusCode::NOT_FOUND)?;

    let order = repository::model_to_aggregate(model).map_err(super::internal_error)?;
    Ok(Json(order))
}

/// Create or update an order from its DTO.
pub async fn upsert(Json(dto): Json<SalesOrderDto>) -> Result<Json<SalesOrder>, StatusCode> {
    let mut order = match dto.id.as_deref() {
        Some(id) if !id.is_empty() => {
            let model = repository::get_by_id(id)
                .await
                .map_err(super::internal_error)?
                .ok_or(StatusCode::NOT_FOUND)?;
            repository::model_to_aggregate(model).map_err(super::internal_error)?
        }
        _ => SalesOrder::new_for_insert(
            dto.code.clone().unwrap_or_default(),
            dto.description.clone(),
            dto.dealer.clone(),
            dto.job_name.clone(),
            dto.comment.clone(),
        ),
    };

    order.update(&dto);
    if let Err(reason) = order.validate() {
        tracing::warn!("Sales order rejected: {}", reason);
        return Err(StatusCode::BAD_REQUEST);
    }
    order.before_write();

    repository::upsert(&order)
        .await
        .map_err(super::internal_error)?;

    Ok(Json(order))
}

pub async fn delete(Path(id): Path<String>) -> Result<Json<serde_json::Value>, StatusCode> {
    let deleted = repository::soft_delete(&id)
        .await
        .map_err(super::internal_error)?;
    if !deleted {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(serde_json::json!({ "success": true })))
}

/// Seed demo orders plus matching register rows.
pub async fn insert_test_data() -> Result<Json<serde_json::Value>, StatusCode> {
    let created = service::insert_test_data()
        .await
        .map_err(super::internal_error)?;

    tracing::info!("Seeded {} demo records", created);
    Ok(Json(serde_json::json!({ "created": created })))
}
