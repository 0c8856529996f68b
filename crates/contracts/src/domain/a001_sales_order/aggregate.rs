use crate::domain::common::{AggregateId, BaseAggregate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// ID Type
// ============================================================================

/// Unique identifier of a sales order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SalesOrderId(pub Uuid);

impl SalesOrderId {
    pub fn new(value: Uuid) -> Self {
        Self(value)
    }

    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn value(&self) -> Uuid {
        self.0
    }
}

impl AggregateId for SalesOrderId {
    fn as_string(&self) -> String {
        self.0.to_string()
    }

    fn from_string(s: &str) -> Result<Self, String> {
        Uuid::parse_str(s)
            .map(SalesOrderId::new)
            .map_err(|e| format!("Invalid UUID: {}", e))
    }
}

// ============================================================================
// Status
// ============================================================================

/// Lifecycle of a cabinet order from intake to close-out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SalesOrderStatus {
    Entered,
    Released,
    InProduction,
    Shipped,
    Closed,
}

impl SalesOrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SalesOrderStatus::Entered => "entered",
            SalesOrderStatus::Released => "released",
            SalesOrderStatus::InProduction => "in_production",
            SalesOrderStatus::Shipped => "shipped",
            SalesOrderStatus::Closed => "closed",
        }
    }
}

impl std::str::FromStr for SalesOrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "entered" => Ok(SalesOrderStatus::Entered),
            "released" => Ok(SalesOrderStatus::Released),
            "in_production" => Ok(SalesOrderStatus::InProduction),
            "shipped" => Ok(SalesOrderStatus::Shipped),
            "closed" => Ok(SalesOrderStatus::Closed),
            other => Err(format!("Unknown sales order status: {}", other)),
        }
    }
}

// ============================================================================
// Aggregate Root
// ============================================================================

/// A dealer's cabinet order: the intake record everything downstream
/// (scheduling, shipping, backorders, service) keys off.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesOrder {
    #[serde(flatten)]
    pub base: BaseAggregate<SalesOrderId>,

    /// Dealer the order was taken for.
    pub dealer: String,

    /// Job or room name as written on the order.
    #[serde(rename = "jobName")]
    pub job_name: String,

    pub status: SalesOrderStatus,

    /// Promised completion date (`YYYY-MM-DD`), unset until scheduling.
    #[serde(rename = "promisedDate")]
    pub promised_date: Option<String>,

    #[serde(rename = "totalAmount")]
    pub total_amount: f64,
}

impl SalesOrder {
    /// Create a new order for insertion.
    pub fn new_for_insert(
        code: String,
        description: String,
        dealer: String,
        job_name: String,
        comment: Option<String>,
    ) -> Self {
        let mut base = BaseAggregate::new(SalesOrderId::new_v4(), code, description);
        base.comment = comment;

        Self {
            base,
            dealer,
            job_name,
            status: SalesOrderStatus::Entered,
            promised_date: None,
            total_amount: 0.0,
        }
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    /// Apply editable fields from a DTO.
    pub fn update(&mut self, dto: &SalesOrderDto) {
        self.base.code = dto.code.clone().unwrap_or_default();
        self.base.description = dto.description.clone();
        self.base.comment = dto.comment.clone();
        self.dealer = dto.dealer.clone();
        self.job_name = dto.job_name.clone();
        self.status = dto.status;
        self.promised_date = dto.promised_date.clone();
        self.total_amount = dto.total_amount;
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base.code.trim().is_empty() {
            return Err("Order number cannot be empty".into());
        }
        if self.base.description.trim().is_empty() {
            return Err("Description cannot be empty".into());
        }
        if self.dealer.trim().is_empty() {
            return Err("Dealer cannot be empty".into());
        }
        if self.total_amount < 0.0 {
            return Err("Order total cannot be negative".into());
        }
        if let Some(date) = &self.promised_date {
            if chrono::NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
                return Err(format!("Promised date is not YYYY-MM-DD: {}", date));
            }
        }
        Ok(())
    }

    /// Hook before persisting.
    pub fn before_write(&mut self) {
        self.base.touch();
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO for creating or updating a sales order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesOrderDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub description: String,
    pub dealer: String,

    #[serde(rename = "jobName")]
    pub job_name: String,

    #[serde(default = "default_status")]
    pub status: SalesOrderStatus,

    #[serde(rename = "promisedDate")]
    pub promised_date: Option<String>,

    #[serde(rename = "totalAmount", default)]
    pub total_amount: f64,

    pub comment: Option<String>,
}

fn default_status() -> SalesOrderStatus {
    SalesOrderStatus::Entered
}

/// Request for the row-paged order list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesOrderListRequest {
    #[serde(default = "default_limit")]
    pub limit: u64,
    #[serde(default)]
    pub offset: u64,
}

fn default_limit() -> u64 {
    50
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesOrderListResponse {
    pub items: Vec<SalesOrder>,
    pub total_count: u64,
    pub has_more: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_rejects_blank_dealer() {
        let order = SalesOrder::new_for_insert(
            "SO-1001".into(),
            "Kitchen, maple shaker".into(),
            "  ".into(),
            "Smith kitchen".into(),
            None,
        );
        assert!(order.validate().is_err());
    }

    #[test]
    fn validate_rejects_malformed_promised_date() {
        let mut order = SalesOrder::new_for_insert(
            "SO-1001".into(),
            "Kitchen, maple shaker".into(),
            "Maple & Co".into(),
            "Smith kitchen".into(),
            None,
        );
        order.promised_date = Some("06/30/2024".into());
        assert!(order.validate().is_err());
        order.promised_date = Some("2024-06-30".into());
        assert!(order.validate().is_ok());
    }

    #[test]
    fn status_round_trips_through_storage_form() {
        for status in [
            SalesOrderStatus::Entered,
            SalesOrderStatus::Released,
            SalesOrderStatus::InProduction,
            SalesOrderStatus::Shipped,
            SalesOrderStatus::Closed,
        ] {
            let parsed: SalesOrderStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }
}
