use crate::shared::table_query::SortDirection;
use serde::{Deserialize, Serialize};

/// One plant service order (rework, replacement parts, warranty work).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceOrderDto {
    pub service_no: String,
    pub order_no: String,
    pub dealer: String,
    /// Why the order came back: damage, mis-build, missing part.
    pub reason: String,
    pub parts_summary: Option<String>,
    /// Raw box count as loaded from the plant system; may be malformed.
    pub box_count: Option<String>,
    /// `YYYY-MM-DD`; absent means not yet on the service schedule.
    pub service_date: Option<String>,
    pub status: String,
    pub loaded_at_utc: String,
}

/// Request for a date-bucketed service-order page (one page = `page_size`
/// distinct service dates).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceOrderListRequest {
    #[serde(default)]
    pub date_from: Option<String>,
    #[serde(default)]
    pub date_to: Option<String>,
    #[serde(default)]
    pub dealer: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
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

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceOrderListResponse {
    pub items: Vec<ServiceOrderDto>,
    pub total_groups: u64,
    pub page_index: u64,
    pub page_size: u64,
    pub has_more: bool,
}

/// Request for the printable service-order report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceReportRequest {
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
