//! Transaction primitives.
//!
//! A `Transaction` is a single income or expense recorded against one wallet.
//! Transfers are a pair of transactions (one of each kind) sharing the
//! transfer category.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Currency, EngineError, ResultEngine, util::parse_uuid};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }

    /// Ledger direction this kind applies to its wallet.
    pub fn direction(self) -> Direction {
        match self {
            Self::Income => Direction::Credit,
            Self::Expense => Direction::Debit,
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(EngineError::InvalidInput(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

/// Side of a ledger delta.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Adds the magnitude to the balance.
    Credit,
    /// Subtracts the magnitude from the balance.
    Debit,
}

impl Direction {
    pub fn reverse(self) -> Self {
        match self {
            Self::Credit => Self::Debit,
            Self::Debit => Self::Credit,
        }
    }

    /// Signed balance change for `magnitude`.
    pub fn signed(self, magnitude: i64) -> i64 {
        match self {
            Self::Credit => magnitude,
            Self::Debit => -magnitude,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub category_id: Uuid,
    pub wallet_id: Uuid,
    pub kind: TransactionKind,
    /// Positive magnitude in base minor units.
    pub amount_minor: i64,
    pub original_amount_minor: Option<i64>,
    pub currency: Currency,
    pub exchange_rate: f64,
    pub description: String,
    pub notes: Option<String>,
    pub date: NaiveDate,
    pub proof_ref: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub category_id: String,
    pub wallet_id: String,
    pub kind: String,
    pub amount_minor: i64,
    pub original_amount_minor: Option<i64>,
    pub currency: String,
    pub exchange_rate: f64,
    pub description: String,
    pub notes: Option<String>,
    pub date: Date,
    pub proof_ref: Option<String>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::wallets::Entity",
        from = "Column::WalletId",
        to = "super::wallets::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Wallet,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id",
        on_update = "NoAction",
        on_delete = "NoAction"
    )]
    Category,
}

impl Related<super::wallets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wallet.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: parse_uuid(&model.id, "transaction")?,
            user_id: parse_uuid(&model.user_id, "user")?,
            category_id: parse_uuid(&model.category_id, "category")?,
            wallet_id: parse_uuid(&model.wallet_id, "wallet")?,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            amount_minor: model.amount_minor,
            original_amount_minor: model.original_amount_minor,
            currency: Currency::try_from(model.currency.as_str())?,
            exchange_rate: model.exchange_rate,
            description: model.description,
            notes: model.notes,
            date: model.date,
            proof_ref: model.proof_ref,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            user_id: ActiveValue::Set(tx.user_id.to_string()),
            category_id: ActiveValue::Set(tx.category_id.to_string()),
            wallet_id: ActiveValue::Set(tx.wallet_id.to_string()),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            amount_minor: ActiveValue::Set(tx.amount_minor),
            original_amount_minor: ActiveValue::Set(tx.original_amount_minor),
            currency: ActiveValue::Set(tx.currency.code().to_string()),
            exchange_rate: ActiveValue::Set(tx.exchange_rate),
            description: ActiveValue::Set(tx.description.clone()),
            notes: ActiveValue::Set(tx.notes.clone()),
            date: ActiveValue::Set(tx.date),
            proof_ref: ActiveValue::Set(tx.proof_ref.clone()),
            created_at: ActiveValue::Set(tx.created_at),
            updated_at: ActiveValue::Set(tx.updated_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_maps_to_direction() {
        assert_eq!(TransactionKind::Income.direction(), Direction::Credit);
        assert_eq!(TransactionKind::Expense.direction(), Direction::Debit);
        assert_eq!(Direction::Debit.reverse(), Direction::Credit);
        assert_eq!(Direction::Debit.signed(250), -250);
    }

    #[test]
    fn rejects_unknown_kind() {
        assert_eq!(
            TransactionKind::try_from("transfer").unwrap_err(),
            EngineError::InvalidInput("invalid transaction kind: transfer".to_string())
        );
    }
}
