use chrono::{Datelike, NaiveDate};
use sea_orm::TransactionTrait;
use uuid::Uuid;

use crate::{
    BudgetProgress, DateRange, Period, ResultEngine, Transaction,
    stats::{percent_change, percent_of, relative_change},
};

use super::{
    Engine, with_tx,
    aggregates::{CategorySpending, DayTotals, Summary},
    recurring::CatchUpReport,
};

/// How many transactions the dashboard lists.
pub const RECENT_TRANSACTIONS: u64 = 5;

/// Category spending compared with the previous window.
#[derive(Clone, Debug, PartialEq)]
pub struct CategoryChange {
    pub spending: CategorySpending,
    pub previous_minor: i64,
    pub change_pct: f64,
}

#[derive(Clone, Debug, PartialEq)]
pub struct DashboardSummary {
    pub period: Period,
    pub window: DateRange,
    pub previous_window: DateRange,
    pub current: Summary,
    pub previous: Summary,
    pub income_change_pct: f64,
    pub expense_change_pct: f64,
    /// Sum of all wallet balances.
    pub balance_minor: i64,
    /// Income of the calendar month containing today, whatever the period.
    pub monthly_income_minor: i64,
    pub monthly_expense_minor: i64,
    pub categories: Vec<CategoryChange>,
    pub budgets: Vec<BudgetProgress>,
    pub daily_trend: Vec<DayTotals>,
    pub recent_transactions: Vec<Transaction>,
    pub catch_up: CatchUpReport,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MonthlyReport {
    pub year: i32,
    pub month: u32,
    pub window: DateRange,
    pub summary: Summary,
    pub previous: Summary,
    pub net_savings_minor: i64,
    /// Net savings as a share of income.
    pub savings_rate: f64,
    pub income_change_pct: f64,
    pub expense_change_pct: f64,
    /// Change of net savings relative to the previous month's magnitude.
    pub savings_change_pct: f64,
    pub categories: Vec<CategorySpending>,
    /// Days of the month up to `today`.
    pub daily_trend: Vec<DayTotals>,
}

impl Engine {
    /// Dashboard figures for the `period` window containing `today`.
    ///
    /// Due recurring occurrences are materialized first.
    pub async fn dashboard_summary(
        &self,
        user_id: Uuid,
        period: Period,
        today: NaiveDate,
    ) -> ResultEngine<DashboardSummary> {
        let window = period.window(today)?;
        let previous_window = period.previous(window)?;
        let month = Period::Monthly.window(today)?;
        let catch_up = self.catch_up(user_id, today).await?;

        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;
            let current = self.summary_in(&db_tx, user_id, window).await?;
            let previous = self.summary_in(&db_tx, user_id, previous_window).await?;
            let monthly = if month == window {
                current
            } else {
                self.summary_in(&db_tx, user_id, month).await?
            };

            let previous_spending = self
                .expense_by_category_in(&db_tx, user_id, previous_window)
                .await?;
            let categories = self
                .category_spending_in(&db_tx, user_id, window)
                .await?
                .into_iter()
                .map(|spending| {
                    let previous_minor = previous_spending
                        .get(&spending.category_id.to_string())
                        .copied()
                        .unwrap_or(0);
                    CategoryChange {
                        change_pct: percent_change(spending.amount_minor, previous_minor),
                        previous_minor,
                        spending,
                    }
                })
                .collect();

            Ok(DashboardSummary {
                period,
                window,
                previous_window,
                income_change_pct: percent_change(current.income_minor, previous.income_minor),
                expense_change_pct: percent_change(current.expense_minor, previous.expense_minor),
                current,
                previous,
                balance_minor: self.total_balance_in(&db_tx, user_id).await?,
                monthly_income_minor: monthly.income_minor,
                monthly_expense_minor: monthly.expense_minor,
                categories,
                budgets: self.budget_progress_in(&db_tx, user_id, window).await?,
                daily_trend: self.daily_trend_in(&db_tx, user_id, window).await?,
                recent_transactions: self
                    .recent_transactions(&db_tx, user_id, RECENT_TRANSACTIONS)
                    .await?,
                catch_up,
            })
        })
    }

    /// Report for the calendar month `year-month`.
    pub async fn monthly_report(
        &self,
        user_id: Uuid,
        year: i32,
        month: u32,
        today: NaiveDate,
    ) -> ResultEngine<MonthlyReport> {
        let window = DateRange::month(year, month)?;
        let previous_window = Period::Monthly.previous(window)?;
        let trend_window = if window.start > today {
            None
        } else {
            Some(DateRange::new(window.start, window.end.min(today))?)
        };

        with_tx!(self, |db_tx| {
            self.require_user(&db_tx, user_id).await?;
            let summary = self.summary_in(&db_tx, user_id, window).await?;
            let previous = self.summary_in(&db_tx, user_id, previous_window).await?;
            let daily_trend = match trend_window {
                Some(range) => self.daily_trend_in(&db_tx, user_id, range).await?,
                None => Vec::new(),
            };

            let net_savings_minor = summary.balance_minor;
            Ok(MonthlyReport {
                year: window.start.year(),
                month: window.start.month(),
                window,
                net_savings_minor,
                savings_rate: percent_of(net_savings_minor, summary.income_minor),
                income_change_pct: percent_change(summary.income_minor, previous.income_minor),
                expense_change_pct: percent_change(summary.expense_minor, previous.expense_minor),
                savings_change_pct: relative_change(net_savings_minor, previous.balance_minor),
                categories: self.category_spending_in(&db_tx, user_id, window).await?,
                daily_trend,
                summary,
                previous,
            })
        })
    }
}
