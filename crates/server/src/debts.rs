//! Debts API endpoints.

use api_types::debt::{DebtList, DebtNew, DebtUpdate, DebtView};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{NewDebtCmd, UpdateDebtCmd};
use uuid::Uuid;

use crate::{
    ServerError,
    convert::{debt_kind_from_api, debt_status_from_api, map_debt},
    server::ServerState,
};

pub async fn list(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Query(query): Query<DebtList>,
) -> Result<Json<Vec<DebtView>>, ServerError> {
    let debts = state
        .engine
        .debts(user.id, query.status.map(debt_status_from_api))
        .await?
        .into_iter()
        .map(map_debt)
        .collect();
    Ok(Json(debts))
}

pub async fn get(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(debt_id): Path<Uuid>,
) -> Result<Json<DebtView>, ServerError> {
    let debt = state.engine.debt(user.id, debt_id).await?;
    Ok(Json(map_debt(debt)))
}

pub async fn create(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Json(payload): Json<DebtNew>,
) -> Result<(StatusCode, Json<DebtView>), ServerError> {
    let debt = state
        .engine
        .new_debt(NewDebtCmd {
            user_id: user.id,
            kind: debt_kind_from_api(payload.kind),
            person_name: payload.person_name,
            amount_minor: payload.amount_minor,
            description: payload.description,
            due_date: payload.due_date,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(map_debt(debt))))
}

pub async fn update(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(debt_id): Path<Uuid>,
    Json(payload): Json<DebtUpdate>,
) -> Result<Json<DebtView>, ServerError> {
    let cmd = UpdateDebtCmd {
        person_name: payload.person_name,
        amount_minor: payload.amount_minor,
        description: payload.description,
        due_date: payload.due_date,
    };
    let debt = state.engine.update_debt(user.id, debt_id, cmd).await?;
    Ok(Json(map_debt(debt)))
}

pub async fn mark_paid(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(debt_id): Path<Uuid>,
) -> Result<Json<DebtView>, ServerError> {
    let debt = state.engine.mark_debt_paid(user.id, debt_id).await?;
    Ok(Json(map_debt(debt)))
}

pub async fn delete(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(debt_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_debt(user.id, debt_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
