//! Spending limits per category.
//!
//! Only the limit is persisted; spending figures are computed on read, see
//! [`BudgetProgress`].

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{EngineError, Period, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Budget {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Uuid,
    /// Limit in base minor units.
    pub amount_minor: i64,
    pub period: Period,
    pub created_at: DateTime<Utc>,
}

/// A budget with its spending over a date range.
#[derive(Clone, Debug, PartialEq)]
pub struct BudgetProgress {
    pub budget: Budget,
    pub category_name: String,
    pub spent_minor: i64,
    pub remaining_minor: i64,
    /// `spent / amount × 100`, 0 when the limit is 0.
    pub percentage: f64,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub category_id: String,
    pub amount_minor: i64,
    pub period: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Category,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Budget {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "budget")?,
            user_id: parse_uuid(&model.user_id, "user")?,
            category_id: parse_uuid(&model.category_id, "category")?,
            amount_minor: model.amount_minor,
            period: Period::try_from(model.period.as_str())?,
            created_at: model.created_at,
        })
    }
}

impl From<&Budget> for ActiveModel {
    fn from(value: &Budget) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            user_id: ActiveValue::Set(value.user_id.to_string()),
            category_id: ActiveValue::Set(value.category_id.to_string()),
            amount_minor: ActiveValue::Set(value.amount_minor),
            period: ActiveValue::Set(value.period.as_str().to_string()),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}
