use anyhow::Result;
use chrono::{NaiveDate, Utc};
use contracts::shared::table_query::FilterSpec;
use sea_orm::entity::prelude::*;
use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set,
};
use serde::{Deserialize, Serialize};

use crate::shared::data::db::get_connection;
use crate::shared::filter::{condition_expr, FilterError};

/// Backorder register row: an item line the plant is still waiting on.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "p902_backorders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub order_no: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub item_code: String,

    pub description: String,
    pub qty_ordered: f64,
    pub qty_received: f64,
    pub vendor: String,
    #[sea_orm(nullable)]
    pub expected_date: Option<String>,
    pub status: String,
    pub loaded_at_utc: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn resolve_column(field: &str) -> Result<Column, FilterError> {
    Ok(match field {
        "order_no" => Column::OrderNo,
        "item_code" => Column::ItemCode,
        "vendor" => Column::Vendor,
        "status" => Column::Status,
        "expected_date" => Column::ExpectedDate,
        other => return Err(FilterError::UnknownField(other.to_string())),
    })
}

fn apply_filters(mut query: Select<Entity>, filters: &FilterSpec) -> Result<Select<Entity>, FilterError> {
    for fc in filters.conditions() {
        let column = resolve_column(&fc.field)?;
        if let Some(expr) = condition_expr(column, &fc.condition) {
            query = query.filter(expr);
        }
    }
    Ok(query)
}

/// Row-paged list with total count. Backorders paginate by raw row; there
/// is no date bucketing on this register.
pub async fn list_with_filters(
    filters: &FilterSpec,
    limit: u64,
    offset: u64,
) -> Result<(Vec<Model>, u64)> {
    let query = apply_filters(Entity::find(), filters)?;

    let total = query.clone().count(conn()).await?;

    let items = query
        .order_by_asc(Column::ExpectedDate)
        .order_by_asc(Column::OrderNo)
        .order_by_asc(Column::ItemCode)
        .limit(limit)
        .offset(offset)
        .all(conn())
        .await?;

    Ok((items, total))
}

/// Data for one register load.
#[derive(Debug, Clone)]
pub struct BackorderEntry {
    pub order_no: String,
    pub item_code: String,
    pub description: String,
    pub qty_ordered: f64,
    pub qty_received: f64,
    pub vendor: String,
    pub expected_date: Option<NaiveDate>,
    pub status: String,
}

/// Upsert a register row by its natural key (order_no, item_code).
pub async fn upsert_row(entry: &BackorderEntry) -> Result<()> {
    let existing = Entity::find()
        .filter(Column::OrderNo.eq(&entry.order_no))
        .filter(Column::ItemCode.eq(&entry.item_code))
        .one(conn())
        .await?;

    let active = ActiveModel {
        order_no: Set(entry.order_no.clone()),
        item_code: Set(entry.item_code.clone()),
        description: Set(entry.description.clone()),
        qty_ordered: Set(entry.qty_ordered),
        qty_received: Set(entry.qty_received),
        vendor: Set(entry.vendor.clone()),
        expected_date: Set(entry
            .expected_date
            .map(|d| d.format("%Y-%m-%d").to_string())),
        status: Set(entry.status.clone()),
        loaded_at_utc: Set(Utc::now().to_rfc3339()),
    };

    if existing.is_some() {
        active.update(conn()).await?;
    } else {
        active.insert(conn()).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, QueryTrait};

    #[test]
    fn vendor_and_range_filters_compose_as_a_conjunction() {
        let filters = FilterSpec::new()
            .equals("vendor", "Blum")
            .range("expected_date", Some("2024-04-01".into()), None);
        let sql = apply_filters(Entity::find(), &filters)
            .unwrap()
            .build(DatabaseBackend::Sqlite)
            .to_string();
        assert!(sql.contains("vendor"), "sql: {}", sql);
        assert!(sql.contains("expected_date"), "sql: {}", sql);
        assert!(sql.contains("AND"), "sql: {}", sql);
    }
}
