use axum::extract::Query;
use axum::http::StatusCode;
use axum::Json;
use contracts::projections::p901_plant_service_orders::{
    ServiceOrderDto, ServiceOrderListRequest, ServiceOrderListResponse,
};
use contracts::shared::table_query::{FilterSpec, PageWindow, SortDirection, SortSpec};

use crate::projections::p901_plant_service_orders::repository::{self, ServiceOrderQuery};
use crate::shared::paging;

pub(crate) fn service_filters(
    date_from: Option<String>,
    date_to: Option<String>,
    dealer: Option<String>,
    status: Option<String>,
    search: Option<String>,
) -> FilterSpec {
    FilterSpec::new()
        .range("service_date", date_from, date_to)
        .equals_opt("dealer", dealer)
        .equals_opt("status", status)
        .contains_opt("order_no", search)
}

/// Date-bucketed service-order page, bucketed by service date.
pub async fn list(
    Query(req): Query<ServiceOrderListRequest>,
) -> Result<Json<ServiceOrderListResponse>, StatusCode> {
    let filters = service_filters(
        req.date_from.clone(),
        req.date_to.clone(),
        req.dealer.clone(),
        req.status.clone(),
        req.search.clone(),
    );
    let sort = req.sort_field.as_ref().map(|field| SortSpec {
        field: field.clone(),
        direction: req.sort_direction.unwrap_or(SortDirection::Asc),
    });
    let page = PageWindow::new(req.page_index, req.page_size);

    let result = paging::fetch_grouped_page(&ServiceOrderQuery, &filters, sort.as_ref(), page)
        .await
        .map_err(super::map_query_error)?;

    let items: Vec<ServiceOrderDto> = result.rows.into_iter().map(model_to_dto).collect();
    let has_more = page
        .page_index
        .saturating_add(1)
        .saturating_mul(page.page_size)
        < result.total_groups;

    Ok(Json(ServiceOrderListResponse {
        items,
        total_groups: result.total_groups,
        page_index: page.page_index,
        page_size: page.page_size,
        has_more,
    }))
}

fn model_to_dto(model: repository::Model) -> ServiceOrderDto {
    ServiceOrderDto {
        service_no: model.service_no,
        order_no: model.order_no,
        dealer: model.dealer,
        reason: model.reason,
        parts_summary: model.parts_summary,
        box_count: model.box_count,
        service_date: model.service_date,
        status: model.status,
        loaded_at_utc: model.loaded_at_utc,
    }
}
