use axum::extract::Query;
use axum::http::StatusCode;
use axum::Json;
use contracts::projections::p900_production_schedule::{
    ProductionScheduleDto, ProductionScheduleListRequest, ProductionScheduleListResponse,
};
use contracts::shared::table_query::{FilterSpec, PageWindow, SortDirection, SortSpec};

use crate::projections::p900_production_schedule::repository::{self, ProductionScheduleQuery};
use crate::shared::paging;

/// One FilterSpec per request; the same object reaches both phases of the
/// bucketed page query, date-range filter on the bucket column included.
pub(crate) fn schedule_filters(
    date_from: Option<String>,
    date_to: Option<String>,
    dealer: Option<String>,
    status: Option<String>,
    search: Option<String>,
) -> FilterSpec {
    FilterSpec::new()
        .range("schedule_date", date_from, date_to)
        .equals_opt("dealer", dealer)
        .equals_opt("status", status)
        .contains_opt("order_no", search)
}

/// Date-bucketed schedule page: `page_size` distinct schedule dates per
/// page, all lines of a date kept together.
pub async fn list(
    Query(req): Query<ProductionScheduleListRequest>,
) -> Result<Json<ProductionScheduleListResponse>, StatusCode> {
    let filters = schedule_filters(
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

    let result = paging::fetch_grouped_page(&ProductionScheduleQuery, &filters, sort.as_ref(), page)
        .await
        .map_err(super::map_query_error)?;

    let items: Vec<ProductionScheduleDto> = result.rows.into_iter().map(model_to_dto).collect();
    let has_more = page
        .page_index
        .saturating_add(1)
        .saturating_mul(page.page_size)
        < result.total_groups;

    Ok(Json(ProductionScheduleListResponse {
        items,
        total_groups: result.total_groups,
        page_index: page.page_index,
        page_size: page.page_size,
        has_more,
    }))
}

fn model_to_dto(model: repository::Model) -> ProductionScheduleDto {
    ProductionScheduleDto {
        order_no: model.order_no,
        line_id: model.line_id,
        dealer: model.dealer,
        style: model.style,
        finish: model.finish,
        box_count: model.box_count,
        schedule_date: model.schedule_date,
        ship_date: model.ship_date,
        status: model.status,
        sales_order_ref: model.sales_order_ref,
        loaded_at_utc: model.loaded_at_utc,
    }
}
