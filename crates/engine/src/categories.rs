//! Categories classify transactions as income or expense.
//!
//! A category flagged `is_transfer` marks money moved between a user's own
//! wallets; transactions in it are left out of every income/expense aggregate.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{EngineError, TransactionKind, util::parse_uuid};

/// Categories every new user starts with: `(name, kind, is_essential)`.
pub const DEFAULT_CATEGORIES: [(&str, TransactionKind, bool); 9] = [
    ("Salary", TransactionKind::Income, false),
    ("Freelance", TransactionKind::Income, false),
    ("Investment", TransactionKind::Income, false),
    ("Food", TransactionKind::Expense, true),
    ("Transport", TransactionKind::Expense, true),
    ("Shopping", TransactionKind::Expense, false),
    ("Entertainment", TransactionKind::Expense, false),
    ("Bills", TransactionKind::Expense, true),
    ("Health", TransactionKind::Expense, true),
];

/// Display name of the lazily created transfer category.
pub const TRANSFER_CATEGORY_NAME: &str = "Transfer";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub kind: TransactionKind,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub is_essential: bool,
    pub is_default: bool,
    pub is_transfer: bool,
    pub created_at: DateTime<Utc>,
}

impl Category {
    pub fn new(user_id: Uuid, name: String, kind: TransactionKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            kind,
            icon: None,
            color: None,
            is_essential: false,
            is_default: false,
            is_transfer: false,
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub kind: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub is_essential: bool,
    pub is_default: bool,
    pub is_transfer: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Category {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "category")?,
            user_id: parse_uuid(&model.user_id, "user")?,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            name: model.name,
            icon: model.icon,
            color: model.color,
            is_essential: model.is_essential,
            is_default: model.is_default,
            is_transfer: model.is_transfer,
            created_at: model.created_at,
        })
    }
}

impl From<&Category> for ActiveModel {
    fn from(value: &Category) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            user_id: ActiveValue::Set(value.user_id.to_string()),
            name: ActiveValue::Set(value.name.clone()),
            kind: ActiveValue::Set(value.kind.as_str().to_string()),
            icon: ActiveValue::Set(value.icon.clone()),
            color: ActiveValue::Set(value.color.clone()),
            is_essential: ActiveValue::Set(value.is_essential),
            is_default: ActiveValue::Set(value.is_default),
            is_transfer: ActiveValue::Set(value.is_transfer),
            created_at: ActiveValue::Set(value.created_at),
        }
    }
}
