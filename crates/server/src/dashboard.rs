//! Dashboard and monthly report endpoints.

use api_types::{
    dashboard::{DashboardQuery, DashboardView},
    report::{MonthlyQuery, MonthlyReportView},
};
use axum::{
    Extension, Json,
    extract::{Query, State},
};

use chrono::Datelike;

use crate::{
    ServerError,
    convert::{
        map_budget_progress, map_catch_up, map_day, map_range, map_spending, map_summary,
        map_transaction, period_from_api, period_to_api,
    },
    server::ServerState,
};

pub async fn summary(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Json<DashboardView>, ServerError> {
    let period = query.period.map(period_from_api).unwrap_or_default();
    let dashboard = state
        .engine
        .dashboard_summary(user.id, period, state.today())
        .await?;

    Ok(Json(DashboardView {
        period: period_to_api(dashboard.period),
        window: map_range(dashboard.window),
        previous_window: map_range(dashboard.previous_window),
        current: map_summary(dashboard.current),
        previous: map_summary(dashboard.previous),
        income_change_pct: dashboard.income_change_pct,
        expense_change_pct: dashboard.expense_change_pct,
        balance_minor: dashboard.balance_minor,
        monthly_income_minor: dashboard.monthly_income_minor,
        monthly_expense_minor: dashboard.monthly_expense_minor,
        categories: dashboard
            .categories
            .into_iter()
            .map(|change| map_spending(change.spending, Some(change.change_pct)))
            .collect(),
        budgets: dashboard
            .budgets
            .into_iter()
            .map(map_budget_progress)
            .collect(),
        daily_trend: dashboard.daily_trend.into_iter().map(map_day).collect(),
        recent_transactions: dashboard
            .recent_transactions
            .into_iter()
            .map(map_transaction)
            .collect(),
        catch_up: map_catch_up(dashboard.catch_up),
    }))
}

pub async fn monthly_report(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Query(query): Query<MonthlyQuery>,
) -> Result<Json<MonthlyReportView>, ServerError> {
    let today = state.today();
    let year = query.year.unwrap_or_else(|| today.year());
    let month = query.month.unwrap_or_else(|| today.month());
    let report = state
        .engine
        .monthly_report(user.id, year, month, today)
        .await?;

    Ok(Json(MonthlyReportView {
        year: report.year,
        month: report.month,
        window: map_range(report.window),
        summary: map_summary(report.summary),
        previous: map_summary(report.previous),
        net_savings_minor: report.net_savings_minor,
        savings_rate: report.savings_rate,
        income_change_pct: report.income_change_pct,
        expense_change_pct: report.expense_change_pct,
        savings_change_pct: report.savings_change_pct,
        categories: report
            .categories
            .into_iter()
            .map(|spending| map_spending(spending, None))
            .collect(),
        daily_trend: report.daily_trend.into_iter().map(map_day).collect(),
    }))
}
