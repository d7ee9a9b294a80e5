//! Budgets API endpoints.

use api_types::budget::{BudgetNew, BudgetProgressView, BudgetRange, BudgetUpdate, BudgetView};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{DateRange, NewBudgetCmd, Period, UpdateBudgetCmd};
use uuid::Uuid;

use crate::{
    ServerError,
    convert::{map_budget, map_budget_progress, period_from_api},
    server::ServerState,
};

/// Budgets with their spending over `[start, end]`.
pub async fn list(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Query(query): Query<BudgetRange>,
) -> Result<Json<Vec<BudgetProgressView>>, ServerError> {
    let range = match (query.start, query.end) {
        (Some(start), Some(end)) => DateRange::new(start, end)?,
        (None, None) => Period::Monthly.window(state.today())?,
        _ => {
            return Err(ServerError::Generic(
                "start and end must be given together".to_string(),
            ));
        }
    };
    let budgets = state
        .engine
        .budgets_with_spending(user.id, range)
        .await?
        .into_iter()
        .map(map_budget_progress)
        .collect();
    Ok(Json(budgets))
}

pub async fn list_all(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<BudgetView>>, ServerError> {
    let budgets = state
        .engine
        .budgets(user.id)
        .await?
        .into_iter()
        .map(map_budget)
        .collect();
    Ok(Json(budgets))
}

pub async fn get(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(budget_id): Path<Uuid>,
) -> Result<Json<BudgetView>, ServerError> {
    let budget = state.engine.budget(user.id, budget_id).await?;
    Ok(Json(map_budget(budget)))
}

pub async fn create(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Json(payload): Json<BudgetNew>,
) -> Result<(StatusCode, Json<BudgetView>), ServerError> {
    let budget = state
        .engine
        .new_budget(NewBudgetCmd {
            user_id: user.id,
            category_id: payload.category_id,
            amount_minor: payload.amount_minor,
            period: period_from_api(payload.period),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(map_budget(budget))))
}

pub async fn update(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(budget_id): Path<Uuid>,
    Json(payload): Json<BudgetUpdate>,
) -> Result<Json<BudgetView>, ServerError> {
    let cmd = UpdateBudgetCmd {
        amount_minor: payload.amount_minor,
        period: payload.period.map(period_from_api),
    };
    let budget = state.engine.update_budget(user.id, budget_id, cmd).await?;
    Ok(Json(map_budget(budget)))
}

pub async fn delete(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(budget_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_budget(user.id, budget_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
