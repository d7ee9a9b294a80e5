//! Recurring transaction rules.
//!
//! Listing and creating rules run the catch-up for the caller, dated with the
//! server's "today".

use api_types::recurring::{RecurringNew, RecurringToggle, RecurringView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::NewRecurringCmd;
use uuid::Uuid;

use crate::{
    ServerError,
    convert::{frequency_from_api, kind_from_api, map_recurring},
    server::ServerState,
};

pub async fn list(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<RecurringView>>, ServerError> {
    let rules = state
        .engine
        .recurring_rules(user.id, state.today())
        .await?
        .into_iter()
        .map(map_recurring)
        .collect();
    Ok(Json(rules))
}

pub async fn get(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(rule_id): Path<Uuid>,
) -> Result<Json<RecurringView>, ServerError> {
    let rule = state.engine.recurring_rule(user.id, rule_id).await?;
    Ok(Json(map_recurring(rule)))
}

pub async fn create(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Json(payload): Json<RecurringNew>,
) -> Result<(StatusCode, Json<RecurringView>), ServerError> {
    let cmd = NewRecurringCmd {
        user_id: user.id,
        wallet_id: payload.wallet_id,
        category_id: payload.category_id,
        kind: kind_from_api(payload.kind),
        amount_minor: payload.amount_minor,
        description: payload.description.unwrap_or_default(),
        frequency: frequency_from_api(payload.frequency),
        start_date: payload.start_date,
    };
    let rule = state.engine.new_recurring(cmd, state.today()).await?;
    Ok((StatusCode::CREATED, Json(map_recurring(rule))))
}

pub async fn toggle(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(rule_id): Path<Uuid>,
    Json(payload): Json<RecurringToggle>,
) -> Result<Json<RecurringView>, ServerError> {
    let rule = state
        .engine
        .set_recurring_active(user.id, rule_id, payload.is_active)
        .await?;
    Ok(Json(map_recurring(rule)))
}

pub async fn delete(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(rule_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_recurring(user.id, rule_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
