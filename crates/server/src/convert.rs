//! Mapping between engine types and API views.

use api_types::{
    budget::{BudgetProgressView, BudgetView, Period as ApiPeriod},
    category::CategoryView,
    dashboard::{CatchUpView, CategorySpendingView, DateRangeView, DayTotalsView, SummaryView},
    debt::{DebtKind as ApiDebtKind, DebtStatus as ApiDebtStatus, DebtView},
    goal::{ContributionView, GoalStatus as ApiGoalStatus, GoalView},
    recurring::{Frequency as ApiFrequency, RecurringView},
    transaction::{TransactionKind as ApiKind, TransactionView},
    user::UserView,
    wallet::WalletView,
};

pub(crate) fn kind_to_api(kind: engine::TransactionKind) -> ApiKind {
    match kind {
        engine::TransactionKind::Income => ApiKind::Income,
        engine::TransactionKind::Expense => ApiKind::Expense,
    }
}

pub(crate) fn kind_from_api(kind: ApiKind) -> engine::TransactionKind {
    match kind {
        ApiKind::Income => engine::TransactionKind::Income,
        ApiKind::Expense => engine::TransactionKind::Expense,
    }
}

pub(crate) fn currency_to_api(currency: engine::Currency) -> api_types::Currency {
    match currency {
        engine::Currency::Idr => api_types::Currency::Idr,
        engine::Currency::Usd => api_types::Currency::Usd,
        engine::Currency::Eur => api_types::Currency::Eur,
        engine::Currency::Sgd => api_types::Currency::Sgd,
        engine::Currency::Myr => api_types::Currency::Myr,
        engine::Currency::Jpy => api_types::Currency::Jpy,
        engine::Currency::Gbp => api_types::Currency::Gbp,
        engine::Currency::Aud => api_types::Currency::Aud,
        engine::Currency::Cny => api_types::Currency::Cny,
        engine::Currency::Krw => api_types::Currency::Krw,
    }
}

pub(crate) fn currency_from_api(currency: api_types::Currency) -> engine::Currency {
    match currency {
        api_types::Currency::Idr => engine::Currency::Idr,
        api_types::Currency::Usd => engine::Currency::Usd,
        api_types::Currency::Eur => engine::Currency::Eur,
        api_types::Currency::Sgd => engine::Currency::Sgd,
        api_types::Currency::Myr => engine::Currency::Myr,
        api_types::Currency::Jpy => engine::Currency::Jpy,
        api_types::Currency::Gbp => engine::Currency::Gbp,
        api_types::Currency::Aud => engine::Currency::Aud,
        api_types::Currency::Cny => engine::Currency::Cny,
        api_types::Currency::Krw => engine::Currency::Krw,
    }
}

pub(crate) fn period_to_api(period: engine::Period) -> ApiPeriod {
    match period {
        engine::Period::Daily => ApiPeriod::Daily,
        engine::Period::Weekly => ApiPeriod::Weekly,
        engine::Period::Monthly => ApiPeriod::Monthly,
        engine::Period::Yearly => ApiPeriod::Yearly,
    }
}

pub(crate) fn period_from_api(period: ApiPeriod) -> engine::Period {
    match period {
        ApiPeriod::Daily => engine::Period::Daily,
        ApiPeriod::Weekly => engine::Period::Weekly,
        ApiPeriod::Monthly => engine::Period::Monthly,
        ApiPeriod::Yearly => engine::Period::Yearly,
    }
}

pub(crate) fn frequency_from_api(frequency: ApiFrequency) -> engine::Frequency {
    match frequency {
        ApiFrequency::Daily => engine::Frequency::Daily,
        ApiFrequency::Weekly => engine::Frequency::Weekly,
        ApiFrequency::Monthly => engine::Frequency::Monthly,
        ApiFrequency::Yearly => engine::Frequency::Yearly,
    }
}

fn frequency_to_api(frequency: engine::Frequency) -> ApiFrequency {
    match frequency {
        engine::Frequency::Daily => ApiFrequency::Daily,
        engine::Frequency::Weekly => ApiFrequency::Weekly,
        engine::Frequency::Monthly => ApiFrequency::Monthly,
        engine::Frequency::Yearly => ApiFrequency::Yearly,
    }
}

pub(crate) fn debt_kind_from_api(kind: ApiDebtKind) -> engine::DebtKind {
    match kind {
        ApiDebtKind::Payable => engine::DebtKind::Payable,
        ApiDebtKind::Receivable => engine::DebtKind::Receivable,
    }
}

pub(crate) fn debt_status_from_api(status: ApiDebtStatus) -> engine::DebtStatus {
    match status {
        ApiDebtStatus::Unpaid => engine::DebtStatus::Unpaid,
        ApiDebtStatus::Paid => engine::DebtStatus::Paid,
    }
}

pub(crate) fn map_user(user: engine::User) -> UserView {
    UserView {
        id: user.id,
        username: user.username,
        display_name: user.display_name,
        created_at: user.created_at,
    }
}

pub(crate) fn map_wallet(wallet: engine::Wallet) -> WalletView {
    WalletView {
        id: wallet.id,
        name: wallet.name,
        icon: wallet.icon,
        color: wallet.color,
        balance_minor: wallet.balance,
        is_default: wallet.is_default,
        created_at: wallet.created_at,
    }
}

pub(crate) fn map_category(category: engine::Category) -> CategoryView {
    CategoryView {
        id: category.id,
        name: category.name,
        kind: kind_to_api(category.kind),
        icon: category.icon,
        color: category.color,
        is_essential: category.is_essential,
        is_default: category.is_default,
        is_transfer: category.is_transfer,
    }
}

pub(crate) fn map_transaction(tx: engine::Transaction) -> TransactionView {
    TransactionView {
        id: tx.id,
        category_id: tx.category_id,
        wallet_id: tx.wallet_id,
        kind: kind_to_api(tx.kind),
        amount_minor: tx.amount_minor,
        original_amount_minor: tx.original_amount_minor,
        currency: currency_to_api(tx.currency),
        exchange_rate: tx.exchange_rate,
        description: tx.description,
        notes: tx.notes,
        date: tx.date,
        proof_ref: tx.proof_ref,
        created_at: tx.created_at,
        updated_at: tx.updated_at,
    }
}

pub(crate) fn map_recurring(rule: engine::RecurringRule) -> RecurringView {
    RecurringView {
        id: rule.id,
        wallet_id: rule.wallet_id,
        category_id: rule.category_id,
        kind: kind_to_api(rule.kind),
        amount_minor: rule.amount_minor,
        description: rule.description,
        frequency: frequency_to_api(rule.frequency),
        start_date: rule.start_date,
        next_run_date: rule.next_run_date,
        last_run_date: rule.last_run_date,
        is_active: rule.is_active,
    }
}

pub(crate) fn map_budget(budget: engine::Budget) -> BudgetView {
    BudgetView {
        id: budget.id,
        category_id: budget.category_id,
        amount_minor: budget.amount_minor,
        period: period_to_api(budget.period),
    }
}

pub(crate) fn map_budget_progress(progress: engine::BudgetProgress) -> BudgetProgressView {
    BudgetProgressView {
        budget: map_budget(progress.budget),
        category_name: progress.category_name,
        spent_minor: progress.spent_minor,
        remaining_minor: progress.remaining_minor,
        percentage: progress.percentage,
    }
}

pub(crate) fn map_range(range: engine::DateRange) -> DateRangeView {
    DateRangeView {
        start: range.start,
        end: range.end,
    }
}

pub(crate) fn map_summary(summary: engine::Summary) -> SummaryView {
    SummaryView {
        income_minor: summary.income_minor,
        expense_minor: summary.expense_minor,
        transaction_count: summary.transaction_count,
        balance_minor: summary.balance_minor,
    }
}

pub(crate) fn map_spending(
    spending: engine::CategorySpending,
    change_pct: Option<f64>,
) -> CategorySpendingView {
    CategorySpendingView {
        category_id: spending.category_id,
        name: spending.name,
        icon: spending.icon,
        color: spending.color,
        amount_minor: spending.amount_minor,
        percentage: spending.percentage,
        change_pct,
    }
}

pub(crate) fn map_day(day: engine::DayTotals) -> DayTotalsView {
    DayTotalsView {
        date: day.date,
        income_minor: day.income_minor,
        expense_minor: day.expense_minor,
    }
}

pub(crate) fn map_catch_up(report: engine::CatchUpReport) -> CatchUpView {
    CatchUpView {
        materialized: report.materialized,
        failed: report.failed,
    }
}

pub(crate) fn map_goal(goal: engine::Goal) -> GoalView {
    GoalView {
        id: goal.id,
        name: goal.name,
        target_amount_minor: goal.target_amount_minor,
        current_amount_minor: goal.current_amount_minor,
        deadline: goal.deadline,
        icon: goal.icon,
        color: goal.color,
        status: match goal.status {
            engine::GoalStatus::Active => ApiGoalStatus::Active,
            engine::GoalStatus::Completed => ApiGoalStatus::Completed,
        },
    }
}

pub(crate) fn map_contribution(contribution: engine::GoalContribution) -> ContributionView {
    ContributionView {
        id: contribution.id,
        goal_id: contribution.goal_id,
        amount_minor: contribution.amount_minor,
        note: contribution.note,
        date: contribution.date,
    }
}

pub(crate) fn map_debt(debt: engine::Debt) -> DebtView {
    DebtView {
        id: debt.id,
        kind: match debt.kind {
            engine::DebtKind::Payable => ApiDebtKind::Payable,
            engine::DebtKind::Receivable => ApiDebtKind::Receivable,
        },
        person_name: debt.person_name,
        amount_minor: debt.amount_minor,
        description: debt.description,
        due_date: debt.due_date,
        status: match debt.status {
            engine::DebtStatus::Unpaid => ApiDebtStatus::Unpaid,
            engine::DebtStatus::Paid => ApiDebtStatus::Paid,
        },
    }
}
