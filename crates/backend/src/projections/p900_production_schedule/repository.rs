use anyhow::Result;
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use contracts::shared::table_query::{FilterSpec, GroupKey, SortDirection, SortSpec};
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, Order, QueryFilter, QueryOrder, QuerySelect, Select, Set};
use serde::{Deserialize, Serialize};

use crate::shared::data::db::get_connection;
use crate::shared::filter::{condition_expr, FilterError};
use crate::shared::paging::{GroupedQuery, KeyWindow};

/// Wrap/assembly schedule register row, denormalized from sales orders and
/// plant routing at load time.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "p900_production_schedule")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub order_no: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub line_id: String,

    pub dealer: String,
    pub style: String,
    #[sea_orm(nullable)]
    pub finish: Option<String>,

    // Box count as delivered by the plant system; kept raw because loads
    // occasionally carry "n/a" or blanks.
    #[sea_orm(nullable)]
    pub box_count: Option<String>,

    #[sea_orm(nullable)]
    pub schedule_date: Option<String>,
    #[sea_orm(nullable)]
    pub ship_date: Option<String>,
    pub status: String,

    #[sea_orm(nullable)]
    pub sales_order_ref: Option<String>,
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
        "line_id" => Column::LineId,
        "dealer" => Column::Dealer,
        "style" => Column::Style,
        "status" => Column::Status,
        "schedule_date" => Column::ScheduleDate,
        "ship_date" => Column::ShipDate,
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

/// Restriction to the schedule dates of one page window. SQL `IN` cannot
/// match a NULL member, so the unscheduled bucket is an explicit OR branch.
fn window_condition(window: &KeyWindow) -> sea_orm::Condition {
    let mut condition = sea_orm::Condition::any();
    if !window.dated.is_empty() {
        let dates: Vec<String> = window
            .dated
            .iter()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .collect();
        condition = condition.add(Column::ScheduleDate.is_in(dates));
    }
    if window.include_unscheduled {
        condition = condition.add(Column::ScheduleDate.is_null());
    }
    condition
}

/// Query facade the date-bucketed pagination engine drives.
pub struct ProductionScheduleQuery;

#[async_trait]
impl GroupedQuery for ProductionScheduleQuery {
    type Row = Model;

    async fn fetch_group_keys(&self, filters: &FilterSpec) -> Result<Vec<Option<NaiveDate>>> {
        let raw: Vec<Option<String>> = apply_filters(Entity::find(), filters)?
            .select_only()
            .column(Column::ScheduleDate)
            .into_tuple()
            .all(conn())
            .await?;
        Ok(raw
            .into_iter()
            .map(|value| GroupKey::parse(value.as_deref()).date())
            .collect())
    }

    async fn fetch_rows(
        &self,
        filters: &FilterSpec,
        window: &KeyWindow,
        sort: Option<&SortSpec>,
    ) -> Result<Vec<Model>> {
        if window.is_empty() {
            return Ok(Vec::new());
        }
        let query = apply_filters(Entity::find(), filters)?.filter(window_condition(window));

        match sort {
            Some(spec) => {
                let column = resolve_column(&spec.field)?;
                let order = match spec.direction {
                    SortDirection::Asc => Order::Asc,
                    SortDirection::Desc => Order::Desc,
                };
                Ok(query
                    .order_by(column, order)
                    .order_by_asc(Column::OrderNo)
                    .order_by_asc(Column::LineId)
                    .all(conn())
                    .await?)
            }
            None => {
                // Default order: schedule date ascending, unscheduled last.
                // SQLite sorts NULLs first on ASC, so sort the stable
                // secondary key in SQL and fix the bucket order in memory.
                let mut rows = query
                    .order_by_asc(Column::OrderNo)
                    .order_by_asc(Column::LineId)
                    .all(conn())
                    .await?;
                rows.sort_by_key(|row| GroupKey::parse(row.schedule_date.as_deref()));
                Ok(rows)
            }
        }
    }
}

/// All rows matching `filters`, unpaged, for report composition.
pub async fn list_for_report(filters: &FilterSpec) -> Result<Vec<Model>> {
    let rows = apply_filters(Entity::find(), filters)?
        .order_by_asc(Column::OrderNo)
        .order_by_asc(Column::LineId)
        .all(conn())
        .await?;
    Ok(rows)
}

/// Data for one register load.
#[derive(Debug, Clone)]
pub struct ScheduleEntry {
    pub order_no: String,
    pub line_id: String,
    pub dealer: String,
    pub style: String,
    pub finish: Option<String>,
    pub box_count: Option<String>,
    pub schedule_date: Option<NaiveDate>,
    pub ship_date: Option<NaiveDate>,
    pub status: String,
    pub sales_order_ref: Option<String>,
}

/// Upsert a register row by its natural key (order_no, line_id).
pub async fn upsert_row(entry: &ScheduleEntry) -> Result<()> {
    let existing = Entity::find()
        .filter(Column::OrderNo.eq(&entry.order_no))
        .filter(Column::LineId.eq(&entry.line_id))
        .one(conn())
        .await?;

    let active = ActiveModel {
        order_no: Set(entry.order_no.clone()),
        line_id: Set(entry.line_id.clone()),
        dealer: Set(entry.dealer.clone()),
        style: Set(entry.style.clone()),
        finish: Set(entry.finish.clone()),
        box_count: Set(entry.box_count.clone()),
        schedule_date: Set(entry
            .schedule_date
            .map(|d| d.format("%Y-%m-%d").to_string())),
        ship_date: Set(entry.ship_date.map(|d| d.format("%Y-%m-%d").to_string())),
        status: Set(entry.status.clone()),
        sales_order_ref: Set(entry.sales_order_ref.clone()),
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
    fn row_fetch_expresses_the_unscheduled_bucket_as_an_or_branch() {
        let filters = FilterSpec::new().equals("dealer", "Maple & Co");
        let window = KeyWindow {
            dated: vec![NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()],
            include_unscheduled: true,
        };
        let query = apply_filters(Entity::find(), &filters)
            .unwrap()
            .filter(window_condition(&window));
        let sql = query.build(DatabaseBackend::Sqlite).to_string();

        assert!(sql.contains("IN"), "sql: {}", sql);
        assert!(sql.contains("IS NULL"), "sql: {}", sql);
        assert!(sql.contains("OR"), "sql: {}", sql);
        assert!(sql.contains("dealer"), "sql: {}", sql);
    }

    #[test]
    fn a_dated_only_window_emits_no_null_branch() {
        let window = KeyWindow {
            dated: vec![NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()],
            include_unscheduled: false,
        };
        let sql = Entity::find()
            .filter(window_condition(&window))
            .build(DatabaseBackend::Sqlite)
            .to_string();
        assert!(!sql.contains("IS NULL"), "sql: {}", sql);
    }

    #[test]
    fn unknown_filter_field_is_rejected() {
        let filters = FilterSpec::new().equals("warehouse", "WH-1");
        let err = apply_filters(Entity::find(), &filters).unwrap_err();
        assert!(matches!(err, FilterError::UnknownField(ref f) if f == "warehouse"));
    }
}
