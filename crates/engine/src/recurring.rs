//! Recurring rules and their schedule arithmetic.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, TransactionKind, util::parse_uuid};

/// Suffix appended to the description of materialized occurrences.
pub const AUTO_SUFFIX: &str = " (auto)";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }

    /// The occurrence following `from`.
    ///
    /// Monthly and yearly rules keep `anchor_day` (the start date's day of
    /// month), clamped to the length of the target month, so a rule started on
    /// the 31st lands on Feb 28 and then back on Mar 31.
    pub fn advance(self, from: NaiveDate, anchor_day: u32) -> ResultEngine<NaiveDate> {
        let next = match self {
            Self::Daily => from.checked_add_days(Days::new(1)),
            Self::Weekly => from.checked_add_days(Days::new(7)),
            Self::Monthly => shift_months(from, 1, anchor_day),
            Self::Yearly => shift_months(from, 12, anchor_day),
        };
        next.ok_or_else(|| EngineError::InvalidInput("recurrence date out of range".to_string()))
    }
}

impl TryFrom<&str> for Frequency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            other => Err(EngineError::InvalidInput(format!("invalid frequency: {other}"))),
        }
    }
}

fn shift_months(date: NaiveDate, months: u32, anchor_day: u32) -> Option<NaiveDate> {
    let first = date.with_day(1)?.checked_add_months(Months::new(months))?;
    let last_day = first.checked_add_months(Months::new(1))?.pred_opt()?.day();
    first.with_day(anchor_day.clamp(1, last_day))
}

/// How many overdue occurrences a single catch-up call materializes per rule.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecurrencePolicy {
    /// One occurrence per rule per call.
    SingleStep,
    /// Every overdue occurrence, until `next_run_date` is in the future.
    #[default]
    CatchUp,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecurringRule {
    pub id: Uuid,
    pub user_id: Uuid,
    pub wallet_id: Uuid,
    pub category_id: Uuid,
    pub kind: TransactionKind,
    pub amount_minor: i64,
    pub description: String,
    pub frequency: Frequency,
    pub start_date: NaiveDate,
    /// Earliest occurrence not yet materialized.
    pub next_run_date: NaiveDate,
    pub last_run_date: Option<NaiveDate>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl RecurringRule {
    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.is_active && self.next_run_date <= today
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "recurring_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub wallet_id: String,
    pub category_id: String,
    pub kind: String,
    pub amount_minor: i64,
    pub description: String,
    pub frequency: String,
    pub start_date: Date,
    pub next_run_date: Date,
    pub last_run_date: Option<Date>,
    pub is_active: bool,
    pub created_at: DateTimeUtc,
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
}

impl Related<super::wallets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Wallet.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl TryFrom<Model> for RecurringRule {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: parse_uuid(&model.id, "recurring")?,
            user_id: parse_uuid(&model.user_id, "user")?,
            wallet_id: parse_uuid(&model.wallet_id, "wallet")?,
            category_id: parse_uuid(&model.category_id, "category")?,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            amount_minor: model.amount_minor,
            frequency: Frequency::try_from(model.frequency.as_str())?,
            description: model.description,
            start_date: model.start_date,
            next_run_date: model.next_run_date,
            last_run_date: model.last_run_date,
            is_active: model.is_active,
            created_at: model.created_at,
        })
    }
}

impl From<&RecurringRule> for ActiveModel {
    fn from(rule: &RecurringRule) -> Self {
        Self {
            id: ActiveValue::Set(rule.id.to_string()),
            user_id: ActiveValue::Set(rule.user_id.to_string()),
            wallet_id: ActiveValue::Set(rule.wallet_id.to_string()),
            category_id: ActiveValue::Set(rule.category_id.to_string()),
            kind: ActiveValue::Set(rule.kind.as_str().to_string()),
            amount_minor: ActiveValue::Set(rule.amount_minor),
            description: ActiveValue::Set(rule.description.clone()),
            frequency: ActiveValue::Set(rule.frequency.as_str().to_string()),
            start_date: ActiveValue::Set(rule.start_date),
            next_run_date: ActiveValue::Set(rule.next_run_date),
            last_run_date: ActiveValue::Set(rule.last_run_date),
            is_active: ActiveValue::Set(rule.is_active),
            created_at: ActiveValue::Set(rule.created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn daily_and_weekly_steps() {
        assert_eq!(
            Frequency::Daily.advance(date(2026, 12, 31), 31).unwrap(),
            date(2027, 1, 1)
        );
        assert_eq!(
            Frequency::Weekly.advance(date(2026, 2, 25), 25).unwrap(),
            date(2026, 3, 4)
        );
    }

    #[test]
    fn monthly_keeps_anchor_day() {
        let feb = Frequency::Monthly.advance(date(2026, 1, 31), 31).unwrap();
        assert_eq!(feb, date(2026, 2, 28));
        let mar = Frequency::Monthly.advance(feb, 31).unwrap();
        assert_eq!(mar, date(2026, 3, 31));
        let apr = Frequency::Monthly.advance(mar, 31).unwrap();
        assert_eq!(apr, date(2026, 4, 30));
    }

    #[test]
    fn yearly_from_leap_day() {
        let next = Frequency::Yearly.advance(date(2024, 2, 29), 29).unwrap();
        assert_eq!(next, date(2025, 2, 28));
        let leap = Frequency::Yearly
            .advance(date(2027, 2, 28), 29)
            .unwrap();
        assert_eq!(leap, date(2028, 2, 29));
    }

    #[test]
    fn parses_frequency() {
        assert_eq!(Frequency::try_from("weekly").unwrap(), Frequency::Weekly);
        assert!(Frequency::try_from("hourly").is_err());
    }
}
