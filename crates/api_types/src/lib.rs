use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// ISO currency codes accepted on input. Stored amounts are always `IDR`.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Idr,
    Usd,
    Eur,
    Sgd,
    Myr,
    Jpy,
    Gbp,
    Aud,
    Cny,
    Krw,
}

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

pub mod user {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserNew {
        pub username: String,
        pub display_name: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct UserView {
        pub id: Uuid,
        pub username: String,
        pub display_name: String,
        pub created_at: DateTime<Utc>,
    }
}

pub mod wallet {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletNew {
        pub name: String,
        pub icon: Option<String>,
        pub color: Option<String>,
        #[serde(default)]
        pub is_default: bool,
    }

    /// Partial update. The balance is not writable.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct WalletUpdate {
        pub name: Option<String>,
        pub icon: Option<String>,
        pub color: Option<String>,
        pub is_default: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletView {
        pub id: Uuid,
        pub name: String,
        pub icon: Option<String>,
        pub color: Option<String>,
        pub balance_minor: i64,
        pub is_default: bool,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct WalletListResponse {
        pub wallets: Vec<WalletView>,
        /// Sum of every wallet balance.
        pub total_balance_minor: i64,
    }
}

pub mod category {
    use super::*;
    use crate::transaction::TransactionKind;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
        pub kind: TransactionKind,
        pub icon: Option<String>,
        pub color: Option<String>,
        #[serde(default)]
        pub is_essential: bool,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryUpdate {
        pub name: Option<String>,
        pub icon: Option<String>,
        pub color: Option<String>,
        pub is_essential: Option<bool>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct CategoryList {
        pub kind: Option<TransactionKind>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: Uuid,
        pub name: String,
        pub kind: TransactionKind,
        pub icon: Option<String>,
        pub color: Option<String>,
        pub is_essential: bool,
        pub is_default: bool,
        pub is_transfer: bool,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Income,
        Expense,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub category_id: Uuid,
        /// Defaults to the default wallet.
        pub wallet_id: Option<Uuid>,
        pub kind: TransactionKind,
        /// Must be > 0, in minor units of `currency`.
        pub amount_minor: i64,
        /// Defaults to `IDR`. Other currencies are converted on write.
        pub currency: Option<Currency>,
        pub date: NaiveDate,
        pub description: Option<String>,
        pub notes: Option<String>,
        pub proof_ref: Option<String>,
    }

    /// Partial update. Absent fields keep their stored value.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionUpdate {
        pub category_id: Option<Uuid>,
        pub wallet_id: Option<Uuid>,
        pub kind: Option<TransactionKind>,
        pub amount_minor: Option<i64>,
        pub date: Option<NaiveDate>,
        pub description: Option<String>,
        pub notes: Option<String>,
        pub proof_ref: Option<String>,
    }

    /// Query string of `GET /transactions`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionList {
        pub from: Option<NaiveDate>,
        pub to: Option<NaiveDate>,
        pub category_id: Option<Uuid>,
        pub wallet_id: Option<Uuid>,
        pub kind: Option<TransactionKind>,
        /// Matches description or notes.
        pub q: Option<String>,
        pub limit: Option<u64>,
        pub offset: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub category_id: Uuid,
        pub wallet_id: Uuid,
        pub kind: TransactionKind,
        /// Amount in base currency minor units.
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

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionListResponse {
        pub transactions: Vec<TransactionView>,
        pub total: u64,
        pub limit: u64,
        pub offset: u64,
    }
}

pub mod transfer {
    use super::*;
    use crate::transaction::TransactionView;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferNew {
        pub from_wallet_id: Uuid,
        pub to_wallet_id: Uuid,
        pub amount_minor: i64,
        pub date: NaiveDate,
        pub note: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransferView {
        /// Expense on the source wallet.
        pub debit: TransactionView,
        /// Income on the target wallet.
        pub credit: TransactionView,
    }
}

pub mod recurring {
    use super::*;
    use crate::transaction::TransactionKind;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Frequency {
        Daily,
        Weekly,
        Monthly,
        Yearly,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecurringNew {
        pub wallet_id: Uuid,
        pub category_id: Uuid,
        pub kind: TransactionKind,
        pub amount_minor: i64,
        pub description: Option<String>,
        pub frequency: Frequency,
        pub start_date: NaiveDate,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecurringToggle {
        pub is_active: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RecurringView {
        pub id: Uuid,
        pub wallet_id: Uuid,
        pub category_id: Uuid,
        pub kind: TransactionKind,
        pub amount_minor: i64,
        pub description: String,
        pub frequency: Frequency,
        pub start_date: NaiveDate,
        pub next_run_date: NaiveDate,
        pub last_run_date: Option<NaiveDate>,
        pub is_active: bool,
    }
}

pub mod budget {
    use super::*;

    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Period {
        Daily,
        Weekly,
        #[default]
        Monthly,
        Yearly,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetNew {
        pub category_id: Uuid,
        pub amount_minor: i64,
        #[serde(default)]
        pub period: Period,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct BudgetUpdate {
        pub amount_minor: Option<i64>,
        pub period: Option<Period>,
    }

    /// Query string of `GET /budgets`. Both bounds are inclusive; without
    /// them the current calendar month is used.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct BudgetRange {
        pub start: Option<NaiveDate>,
        pub end: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetView {
        pub id: Uuid,
        pub category_id: Uuid,
        pub amount_minor: i64,
        pub period: Period,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetProgressView {
        pub budget: BudgetView,
        pub category_name: String,
        pub spent_minor: i64,
        pub remaining_minor: i64,
        pub percentage: f64,
    }
}

pub mod dashboard {
    use super::*;
    use crate::{budget::BudgetProgressView, budget::Period, transaction::TransactionView};

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct DashboardQuery {
        pub period: Option<Period>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DateRangeView {
        pub start: NaiveDate,
        pub end: NaiveDate,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SummaryView {
        pub income_minor: i64,
        pub expense_minor: i64,
        pub transaction_count: u64,
        /// Income minus expense over the window.
        pub balance_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategorySpendingView {
        pub category_id: Uuid,
        pub name: String,
        pub icon: Option<String>,
        pub color: Option<String>,
        pub amount_minor: i64,
        pub percentage: f64,
        /// Only set on the dashboard, against the previous window.
        #[serde(skip_serializing_if = "Option::is_none")]
        pub change_pct: Option<f64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DayTotalsView {
        pub date: NaiveDate,
        pub income_minor: i64,
        pub expense_minor: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CatchUpView {
        pub materialized: usize,
        pub failed: Vec<Uuid>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DashboardView {
        pub period: Period,
        pub window: DateRangeView,
        pub previous_window: DateRangeView,
        pub current: SummaryView,
        pub previous: SummaryView,
        pub income_change_pct: f64,
        pub expense_change_pct: f64,
        /// Net worth: sum of all wallet balances.
        pub balance_minor: i64,
        pub monthly_income_minor: i64,
        pub monthly_expense_minor: i64,
        pub categories: Vec<CategorySpendingView>,
        pub budgets: Vec<BudgetProgressView>,
        pub daily_trend: Vec<DayTotalsView>,
        pub recent_transactions: Vec<TransactionView>,
        pub catch_up: CatchUpView,
    }
}

pub mod report {
    use super::*;
    use crate::dashboard::{CategorySpendingView, DateRangeView, DayTotalsView, SummaryView};

    /// Both default to the current month.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlyQuery {
        pub year: Option<i32>,
        pub month: Option<u32>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlyReportView {
        pub year: i32,
        pub month: u32,
        pub window: DateRangeView,
        pub summary: SummaryView,
        pub previous: SummaryView,
        pub net_savings_minor: i64,
        pub savings_rate: f64,
        pub income_change_pct: f64,
        pub expense_change_pct: f64,
        pub savings_change_pct: f64,
        pub categories: Vec<CategorySpendingView>,
        pub daily_trend: Vec<DayTotalsView>,
    }
}

pub mod goal {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum GoalStatus {
        Active,
        Completed,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalNew {
        pub name: String,
        pub target_amount_minor: i64,
        pub deadline: Option<NaiveDate>,
        pub icon: Option<String>,
        pub color: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct GoalUpdate {
        pub name: Option<String>,
        pub target_amount_minor: Option<i64>,
        pub deadline: Option<NaiveDate>,
        pub icon: Option<String>,
        pub color: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalFunds {
        pub amount_minor: i64,
        pub note: Option<String>,
        /// Defaults to today.
        pub date: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct GoalView {
        pub id: Uuid,
        pub name: String,
        pub target_amount_minor: i64,
        pub current_amount_minor: i64,
        pub deadline: Option<NaiveDate>,
        pub icon: Option<String>,
        pub color: Option<String>,
        pub status: GoalStatus,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ContributionView {
        pub id: Uuid,
        pub goal_id: Uuid,
        pub amount_minor: i64,
        pub note: Option<String>,
        pub date: NaiveDate,
    }
}

pub mod debt {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum DebtKind {
        Payable,
        Receivable,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum DebtStatus {
        Unpaid,
        Paid,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DebtNew {
        pub kind: DebtKind,
        pub person_name: String,
        pub amount_minor: i64,
        pub description: Option<String>,
        pub due_date: Option<NaiveDate>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct DebtUpdate {
        pub person_name: Option<String>,
        pub amount_minor: Option<i64>,
        pub description: Option<String>,
        pub due_date: Option<NaiveDate>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct DebtList {
        pub status: Option<DebtStatus>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DebtView {
        pub id: Uuid,
        pub kind: DebtKind,
        pub person_name: String,
        pub amount_minor: i64,
        pub description: Option<String>,
        pub due_date: Option<NaiveDate>,
        pub status: DebtStatus,
    }
}

pub mod currency {
    use std::collections::BTreeMap;

    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum RateOrigin {
        Live,
        Fallback,
    }

    /// Base units (`IDR`) per one unit of each currency.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct RatesResponse {
        pub base: Currency,
        pub origin: RateOrigin,
        pub fetched_at: DateTime<Utc>,
        pub rates: BTreeMap<Currency, f64>,
    }
}
