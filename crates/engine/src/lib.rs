//! Ledger and recurrence engine for personal finances.
//!
//! The [`Engine`] owns the database connection and exposes every operation:
//! wallets, categories, transactions, transfers, recurring rules, budgets,
//! goals, debts and the aggregate reports built on top of them.

pub use budgets::{Budget, BudgetProgress};
pub use categories::{Category, DEFAULT_CATEGORIES, TRANSFER_CATEGORY_NAME};
pub use commands::{
    GoalFundsCmd, NewBudgetCmd, NewCategoryCmd, NewDebtCmd, NewGoalCmd, NewRecurringCmd,
    NewTransactionCmd, NewWalletCmd, TransferCmd, UpdateBudgetCmd, UpdateCategoryCmd,
    UpdateDebtCmd, UpdateGoalCmd, UpdateTransactionCmd, UpdateWalletCmd,
};
pub use currency::Currency;
pub use debts::{Debt, DebtKind, DebtStatus};
pub use error::EngineError;
pub use goal_contributions::GoalContribution;
pub use goals::{Goal, GoalStatus};
pub use ops::{
    CatchUpReport, CategoryChange, CategorySpending, DEFAULT_PAGE_SIZE, DashboardSummary, DayTotals,
    Engine, EngineBuilder, MAX_OCCURRENCES_PER_CALL, MAX_PAGE_SIZE, MonthlyReport, SearchPage,
    Summary, TransactionSearch, TransferPair,
};
pub use period::{DateRange, Period};
pub use recurring::{AUTO_SUFFIX, Frequency, RecurrencePolicy, RecurringRule};
pub use transactions::{Direction, Transaction, TransactionKind};
pub use users::User;
pub use wallets::Wallet;

mod budgets;
mod categories;
mod commands;
mod currency;
mod debts;
mod error;
pub mod events;
pub mod fx;
mod goal_contributions;
mod goals;
mod ops;
mod period;
mod recurring;
pub mod stats;
mod transactions;
mod users;
mod util;
mod wallets;

pub type ResultEngine<T> = Result<T, EngineError>;
