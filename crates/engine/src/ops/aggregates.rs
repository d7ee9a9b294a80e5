//! Read-only income/expense aggregates.
//!
//! Every figure here is computed from [`countable`], so transfers are left out
//! the same way everywhere.

use std::collections::HashMap;

use chrono::NaiveDate;
use sea_orm::{
    DatabaseTransaction, JoinType, QueryFilter, QuerySelect, Select, TransactionTrait, prelude::*,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    DateRange, ResultEngine, TransactionKind, categories, stats::percent_of, transactions,
    util::parse_uuid,
};

use super::{Engine, with_tx};

/// Totals over a window. `balance_minor` is the period delta, not a wallet
/// balance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    pub income_minor: i64,
    pub expense_minor: i64,
    pub transaction_count: u64,
    pub balance_minor: i64,
}

/// Expense total of one category over a window.
#[derive(Clone, Debug, PartialEq)]
pub struct CategorySpending {
    pub category_id: Uuid,
    pub name: String,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub amount_minor: i64,
    /// Share of the window's total expense.
    pub percentage: f64,
}

/// Income and expense of a single day.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DayTotals {
    pub date: NaiveDate,
    pub income_minor: i64,
    pub expense_minor: i64,
}

/// Transactions of `user_id` dated inside `range`, excluding transfer
/// categories.
pub(crate) fn countable(user_id: Uuid, range: DateRange) -> Select<transactions::Entity> {
    transactions::Entity::find()
        .join(JoinType::InnerJoin, transactions::Relation::Category.def())
        .filter(transactions::Column::UserId.eq(user_id.to_string()))
        .filter(transactions::Column::Date.between(range.start, range.end))
        .filter(categories::Column::IsTransfer.eq(false))
}

fn amount_sum() -> sea_orm::sea_query::SimpleExpr {
    Expr::col((transactions::Entity, transactions::Column::AmountMinor)).sum()
}

impl Engine {
    /// Income, expense and count over `range`.
    pub async fn summary(&self, user_id: Uuid, range: DateRange) -> ResultEngine<Summary> {
        with_tx!(self, |db_tx| self.summary_in(&db_tx, user_id, range).await)
    }

    /// Expense per category over `range`, largest first.
    pub async fn category_spending(
        &self,
        user_id: Uuid,
        range: DateRange,
    ) -> ResultEngine<Vec<CategorySpending>> {
        with_tx!(self, |db_tx| {
            self.category_spending_in(&db_tx, user_id, range).await
        })
    }

    /// One entry per day of `range`, zero-filled.
    pub async fn daily_trend(&self, user_id: Uuid, range: DateRange) -> ResultEngine<Vec<DayTotals>> {
        with_tx!(self, |db_tx| self.daily_trend_in(&db_tx, user_id, range).await)
    }

    pub(super) async fn summary_in(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
        range: DateRange,
    ) -> ResultEngine<Summary> {
        let rows: Vec<(String, Option<i64>, i64)> = countable(user_id, range)
            .select_only()
            .column(transactions::Column::Kind)
            .column_as(amount_sum(), "total")
            .column_as(
                Expr::col((transactions::Entity, transactions::Column::Id)).count(),
                "count",
            )
            .group_by(transactions::Column::Kind)
            .into_tuple()
            .all(db)
            .await?;

        let mut summary = Summary::default();
        for (kind, total, count) in rows {
            let total = total.unwrap_or(0);
            match TransactionKind::try_from(kind.as_str())? {
                TransactionKind::Income => summary.income_minor += total,
                TransactionKind::Expense => summary.expense_minor += total,
            }
            summary.transaction_count += u64::try_from(count).unwrap_or(0);
        }
        summary.balance_minor = summary.income_minor - summary.expense_minor;
        Ok(summary)
    }

    pub(super) async fn category_spending_in(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
        range: DateRange,
    ) -> ResultEngine<Vec<CategorySpending>> {
        let rows: Vec<(String, String, Option<String>, Option<String>, Option<i64>)> =
            countable(user_id, range)
                .filter(transactions::Column::Kind.eq(TransactionKind::Expense.as_str()))
                .select_only()
                .column(transactions::Column::CategoryId)
                .column(categories::Column::Name)
                .column(categories::Column::Icon)
                .column(categories::Column::Color)
                .column_as(amount_sum(), "total")
                .group_by(transactions::Column::CategoryId)
                .group_by(categories::Column::Name)
                .group_by(categories::Column::Icon)
                .group_by(categories::Column::Color)
                .into_tuple()
                .all(db)
                .await?;

        let total_expense: i64 = rows.iter().map(|row| row.4.unwrap_or(0)).sum();
        let mut spending = rows
            .into_iter()
            .map(|(category_id, name, icon, color, total)| {
                let amount_minor = total.unwrap_or(0);
                Ok(CategorySpending {
                    category_id: parse_uuid(&category_id, "category")?,
                    name,
                    icon,
                    color,
                    amount_minor,
                    percentage: percent_of(amount_minor, total_expense),
                })
            })
            .collect::<ResultEngine<Vec<_>>>()?;
        spending.sort_by(|a, b| {
            b.amount_minor
                .cmp(&a.amount_minor)
                .then_with(|| a.name.cmp(&b.name))
        });
        Ok(spending)
    }

    /// Expense per category id over `range`.
    pub(super) async fn expense_by_category_in(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
        range: DateRange,
    ) -> ResultEngine<HashMap<String, i64>> {
        let rows: Vec<(String, Option<i64>)> = countable(user_id, range)
            .filter(transactions::Column::Kind.eq(TransactionKind::Expense.as_str()))
            .select_only()
            .column(transactions::Column::CategoryId)
            .column_as(amount_sum(), "total")
            .group_by(transactions::Column::CategoryId)
            .into_tuple()
            .all(db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(category_id, total)| (category_id, total.unwrap_or(0)))
            .collect())
    }

    pub(super) async fn daily_trend_in(
        &self,
        db: &DatabaseTransaction,
        user_id: Uuid,
        range: DateRange,
    ) -> ResultEngine<Vec<DayTotals>> {
        let rows: Vec<(NaiveDate, String, Option<i64>)> = countable(user_id, range)
            .select_only()
            .column(transactions::Column::Date)
            .column(transactions::Column::Kind)
            .column_as(amount_sum(), "total")
            .group_by(transactions::Column::Date)
            .group_by(transactions::Column::Kind)
            .into_tuple()
            .all(db)
            .await?;

        let mut by_day: HashMap<NaiveDate, (i64, i64)> = HashMap::new();
        for (date, kind, total) in rows {
            let entry = by_day.entry(date).or_default();
            match TransactionKind::try_from(kind.as_str())? {
                TransactionKind::Income => entry.0 += total.unwrap_or(0),
                TransactionKind::Expense => entry.1 += total.unwrap_or(0),
            }
        }

        Ok(range
            .days()
            .map(|date| {
                let (income_minor, expense_minor) = by_day.get(&date).copied().unwrap_or_default();
                DayTotals {
                    date,
                    income_minor,
                    expense_minor,
                }
            })
            .collect())
    }
}
