//! Money put aside towards a goal.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GoalContribution {
    pub id: Uuid,
    pub goal_id: Uuid,
    pub user_id: Uuid,
    pub amount_minor: i64,
    pub note: Option<String>,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "goal_contributions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub goal_id: String,
    pub user_id: String,
    pub amount_minor: i64,
    pub note: Option<String>,
    pub date: Date,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::goals::Entity",
        from = "Column::GoalId",
        to = "super::goals::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Goal,
}

impl Related<super::goals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Goal.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for GoalContribution {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "contribution")?,
            goal_id: parse_uuid(&model.goal_id, "goal")?,
            user_id: parse_uuid(&model.user_id, "user")?,
            amount_minor: model.amount_minor,
            note: model.note,
            date: model.date,
            created_at: model.created_at,
        })
    }
}

impl From<&GoalContribution> for ActiveModel {
    fn from(value: &GoalContribution) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            goal_id: ActiveValue::Set(value.goal_id.to_string()),
            user_id: ActiveValue::Set(value.user_id.to_string()),
            amount_minor: ActiveValue::Set(value.amount_minor),
            note: ActiveValue::Set(value.note.clone()),
            date: ActiveValue::Set(value.date),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}
