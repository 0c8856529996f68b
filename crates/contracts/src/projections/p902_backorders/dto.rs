use serde::{Deserialize, Serialize};

/// One backordered item line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackorderDto {
    pub order_no: String,
    pub item_code: String,
    pub description: String,
    pub qty_ordered: f64,
    pub qty_received: f64,
    pub vendor: String,
    /// Expected receipt date (`YYYY-MM-DD`), if the vendor gave one.
    pub expected_date: Option<String>,
    pub status: String,
    pub loaded_at_utc: String,
}

/// Request for a row-paged backorder list. Backorders paginate by raw row,
/// not by date bucket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackorderListRequest {
    #[serde(default)]
    pub date_from: Option<String>,
    #[serde(default)]
    pub date_to: Option<String>,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    /// Substring match on the item code.
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

fn default_limit() -> u64 {
    50
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackorderListResponse {
    pub items: Vec<BackorderDto>,
    pub total_count: u64,
    pub has_more: bool,
}
