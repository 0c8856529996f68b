pub mod a001_sales_order;
pub mod p900_production_schedule;
pub mod p901_plant_service_orders;
pub mod p902_backorders;
pub mod reports;

use axum::http::StatusCode;

use crate::shared::filter::FilterError;

/// Map a data-layer failure onto a status code: a bad filter field is the
/// caller's mistake, everything else is ours.
pub(crate) fn map_query_error(err: anyhow::Error) -> StatusCode {
    if err.downcast_ref::<FilterError>().is_some() {
        tracing::warn!("Rejected filter: {}", err);
        StatusCode::BAD_REQUEST
    } else {
        tracing::error!("Query failed: {}", err);
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

pub(crate) fn internal_error(err: anyhow::Error) -> StatusCode {
    tracing::error!("Request failed: {}", err);
    StatusCode::INTERNAL_SERVER_ERROR
}
