use anyhow::Result;
use contracts::domain::a001_sales_order::{SalesOrder, SalesOrderId, SalesOrderStatus};
use contracts::domain::common::{AggregateId, BaseAggregate, EntityMetadata};
use sea_orm::entity::prelude::*;
use sea_orm::{
    ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use serde::{Deserialize, Serialize};

use crate::shared::data::db::get_connection;

/// Sales order storage model.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_sales_order")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    #[sea_orm(nullable)]
    pub comment: Option<String>,

    pub dealer: String,
    pub job_name: String,
    pub status: String,
    #[sea_orm(nullable)]
    pub promised_date: Option<String>,
    pub total_amount: f64,

    pub is_deleted: i32,
    #[sea_orm(nullable)]
    pub created_at: Option<String>,
    #[sea_orm(nullable)]
    pub updated_at: Option<String>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

fn conn() -> &'static DatabaseConnection {
    get_connection()
}

fn to_active(order: &SalesOrder) -> ActiveModel {
    ActiveModel {
        id: Set(order.to_string_id()),
        code: Set(order.base.code.clone()),
        description: Set(order.base.description.clone()),
        comment: Set(order.base.comment.clone()),
        dealer: Set(order.dealer.clone()),
        job_name: Set(order.job_name.clone()),
        status: Set(order.status.as_str().to_string()),
        promised_date: Set(order.promised_date.clone()),
        total_amount: Set(order.total_amount),
        is_deleted: Set(order.base.metadata.is_deleted as i32),
        created_at: Set(order.base.metadata.created_at.clone()),
        updated_at: Set(order.base.metadata.updated_at.clone()),
        version: Set(order.base.metadata.version),
    }
}

/// Rehydrate the aggregate from its storage model.
pub fn model_to_aggregate(model: Model) -> Result<SalesOrder> {
    let id = SalesOrderId::from_string(&model.id)
        .map_err(|e| anyhow::anyhow!("corrupt sales order id: {}", e))?;
    let status: SalesOrderStatus = model
        .status
        .parse()
        .map_err(|e: String| anyhow::anyhow!(e))?;

    Ok(SalesOrder {
        base: BaseAggregate {
            id,
            code: model.code,
            description: model.description,
            comment: model.comment,
            metadata: EntityMetadata {
                created_at: model.created_at,
                updated_at: model.updated_at,
                version: model.version,
                is_deleted: model.is_deleted != 0,
            },
        },
        dealer: model.dealer,
        job_name: model.job_name,
        status,
        promised_date: model.promised_date,
        total_amount: model.total_amount,
    })
}

/// Insert or update by id.
pub async fn upsert(order: &SalesOrder) -> Result<()> {
    let existing = Entity::find_by_id(order.to_string_id()).one(conn()).await?;
    let active = to_active(order);

    if existing.is_some() {
        active.update(conn()).await?;
    } else {
        active.insert(conn()).await?;
    }
    Ok(())
}

pub async fn get_by_id(id: &str) -> Result<Option<Model>> {
    let item = Entity::find_by_id(id.to_string()).one(conn()).await?;
    Ok(item)
}

/// Active (non-deleted) orders, newest code last, with total count.
pub async fn list_paginated(limit: u64, offset: u64) -> Result<(Vec<Model>, u64)> {
    let query = Entity::find().filter(Column::IsDeleted.eq(0));

    let total = query.clone().count(conn()).await?;

    let items = query
        .order_by_asc(Column::Code)
        .limit(limit)
        .offset(offset)
        .all(conn())
        .await?;

    Ok((items, total))
}

/// Soft-delete; returns false when the order does not exist.
pub async fn soft_delete(id: &str) -> Result<bool> {
    let Some(model) = Entity::find_by_id(id.to_string()).one(conn()).await? else {
        return Ok(false);
    };
    let mut active: ActiveModel = model.into();
    active.is_deleted = Set(1);
    active.updated_at = Set(Some(chrono::Utc::now().to_rfc3339()));
    active.update(conn()).await?;
    Ok(true)
}
