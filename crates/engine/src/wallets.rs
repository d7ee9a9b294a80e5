//! The module contains `Wallet` struct and its implementation.

use chrono::{DateTime, Utc};
use sea_orm::entity::{ActiveValue, prelude::*};
use uuid::Uuid;

use crate::{EngineError, util::parse_uuid};

/// A wallet.
///
/// A wallet is a representation of a real wallet, a bank account or anything
/// else where money is kept. Its `balance` is a running total in base minor
/// units and may go negative.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Wallet {
    /// Stable identifier for this wallet.
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub balance: i64,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

impl Wallet {
    pub fn new(user_id: Uuid, name: String, is_default: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            name,
            icon: None,
            color: None,
            balance: 0,
            is_default,
            created_at: Utc::now(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "wallets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub balance: i64,
    pub is_default: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
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

impl TryFrom<Model> for Wallet {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "wallet")?,
            user_id: parse_uuid(&model.user_id, "user")?,
            name: model.name,
            icon: model.icon,
            color: model.color,
            balance: model.balance,
            is_default: model.is_default,
            created_at: model.created_at,
        })
    }
}

impl From<&Wallet> for ActiveModel {
    fn from(value: &Wallet) -> Self {
        Self {
            id: ActiveValue::Set(value.id.to_string()),
            user_id: ActiveValue::Set(value.user_id.to_string()),
            name: ActiveValue::Set(value.name.clone()),
            icon: ActiveValue::Set(value.icon.clone()),
            color: ActiveValue::Set(value.color.clone()),
            balance: ActiveValue::Set(value.balance),
            is_default: ActiveValue::Set(value.is_default),
            created_at: ActiveValue::Set(value.created_at),
            updated_at: ActiveValue::Set(value.created_at),
        }
    }
}
