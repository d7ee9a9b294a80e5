//! Money owed to or by the user.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtKind {
    /// The user owes someone.
    Payable,
    /// Someone owes the user.
    Receivable,
}

impl DebtKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Payable => "payable",
            Self::Receivable => "receivable",
        }
    }
}

impl TryFrom<&str> for DebtKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "payable" => Ok(Self::Payable),
            "receivable" => Ok(Self::Receivable),
            other => Err(EngineError::InvalidInput(format!("invalid debt kind: {other}"))),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtStatus {
    #[default]
    Unpaid,
    Paid,
}

impl DebtStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unpaid => "unpaid",
            Self::Paid => "paid",
        }
    }
}

impl TryFrom<&str> for DebtStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "unpaid" => Ok(Self::Unpaid),
            "paid" => Ok(Self::Paid),
            other => Err(EngineError::InvalidInput(format!("invalid debt status: {other}"))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Debt {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: DebtKind,
    pub person_name: String,
    pub amount_minor: i64,
    pub description: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub status: DebtStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "debts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub kind: String,
    pub person_name: String,
    pub amount_minor: i64,
    pub description: Option<String>,
    pub due_date: Option<Date>,
    pub status: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Debt {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "debt")?,
            user_id: parse_uuid(&model.user_id, "user")?,
            kind: DebtKind::try_from(model.kind.as_str())?,
            status: DebtStatus::try_from(model.status.as_str())?,
            person_name: model.person_name,
            amount_minor: model.amount_minor,
            description: model.description,
            due_date: model.due_date,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<&Debt> for ActiveModel {
    fn from(value: &Debt) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            user_id: ActiveValue::Set(value.user_id.to_string()),
            kind: ActiveValue::Set(value.kind.as_str().to_string()),
            person_name: ActiveValue::Set(value.person_name.clone()),
            amount_minor: ActiveValue::Set(value.amount_minor),
            description: ActiveValue::Set(value.description.clone()),
            due_date: ActiveValue::Set(value.due_date),
            status: ActiveValue::Set(value.status.as_str().to_string()),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.updated_at),
        }
    }
}
