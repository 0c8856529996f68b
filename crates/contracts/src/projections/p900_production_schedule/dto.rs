use crate::shared::table_query::SortDirection;
use serde::{Deserialize, Serialize};

/// One wrap/assembly schedule line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionScheduleDto {
    pub order_no: String,
    pub line_id: String,
    pub dealer: String,
    pub style: String,
    pub finish: Option<String>,
    /// Raw box count as loaded from the plant system; may be malformed.
    pub box_count: Option<String>,
    /// `YYYY-MM-DD`; absent means not yet scheduled.
    pub schedule_date: Option<String>,
    pub ship_date: Option<String>,
    pub status: String,
    pub sales_order_ref: Option<String>,
    pub loaded_at_utc: String,
}

/// Request for a date-bucketed schedule page: one page covers `page_size`
/// distinct schedule dates, all lines for a date kept together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionScheduleListRequest {
    #[serde(default)]
    pub date_from: Option<String>,
    #[serde(default)]
    pub date_to: Option<String>,
    #[serde(default)]
    pub dealer: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// Substring match on the order number.
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub page_index: u64,
    #[serde(default = "default_page_size")]
    pub page_size: u64,
    #[serde(default)]
    pub sort_field: Option<String>,
    #[serde(default)]
    pub sort_direction: Option<SortDirection>,
}

fn default_page_size() -> u64 {
    5
}

/// Response for a bucketed schedule page. `total_groups` counts distinct
/// schedule dates under the current filters (the unscheduled bucket counts
/// once); page count is `ceil(total_groups / page_size)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionScheduleListResponse {
    pub items: Vec<ProductionScheduleDto>,
    pub total_groups: u64,
    pub page_index: u64,
    pub page_size: u64,
    pub has_more: bool,
}

/// Request for the printable schedule report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleReportRequest {
    #[serde(default)]
    pub date_from: Option<String>,
    #[serde(default)]
    pub date_to: Option<String>,
    #[serde(default)]
    pub dealer: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default = "default_items_per_page")]
    pub items_per_page: usize,
}

fn default_items_per_page() -> usize {
    24
}
