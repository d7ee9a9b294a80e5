//! Savings goals.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    #[default]
    Active,
    Completed,
}

impl GoalStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }

    pub(crate) fn for_amounts(current_minor: i64, target_minor: i64) -> Self {
        if current_minor >= target_minor {
            Self::Completed
        } else {
            Self::Active
        }
    }
}

impl TryFrom<&str> for GoalStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "active" => Ok(Self::Active),
            "completed" => Ok(Self::Completed),
            other => Err(EngineError::InvalidInput(format!("invalid goal status: {other}"))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Goal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub target_amount_minor: i64,
    pub current_amount_minor: i64,
    pub deadline: Option<NaiveDate>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub status: GoalStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "goals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub target_amount_minor: i64,
    pub current_amount_minor: i64,
    pub deadline: Option<Date>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub status: String,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::goal_contributions::Entity")]
    Contributions,
}

impl Related<super::goal_contributions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Contributions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Goal {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "goal")?,
            user_id: parse_uuid(&model.user_id, "user")?,
            status: GoalStatus::try_from(model.status.as_str())?,
            name: model.name,
            target_amount_minor: model.target_amount_minor,
            current_amount_minor: model.current_amount_minor,
            deadline: model.deadline,
            icon: model.icon,
            color: model.color,
            created_at: model.created_at,
        })
    }
}

impl From<&Goal> for ActiveModel {
    fn from(value: &Goal) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            user_id: ActiveValue::Set(value.user_id.to_string()),
            name: ActiveValue::Set(value.name.clone()),
            target_amount_minor: ActiveValue::Set(value.target_amount_minor),
            current_amount_minor: ActiveValue::Set(value.current_amount_minor),
            deadline: ActiveValue::Set(value.deadline),
            icon: ActiveValue::Set(value.icon.clone()),
            color: ActiveValue::Set(value.color.clone()),
            status: ActiveValue::Set(value.status.as_str().to_string()),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}
