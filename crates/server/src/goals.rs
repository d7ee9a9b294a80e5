//! Savings goals and their contributions.

use api_types::goal::{ContributionView, GoalFunds, GoalNew, GoalUpdate, GoalView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{GoalFundsCmd, NewGoalCmd, UpdateGoalCmd};
use uuid::Uuid;

use crate::{
    ServerError,
    convert::{map_contribution, map_goal},
    server::ServerState,
};

pub async fn list(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<GoalView>>, ServerError> {
    let goals = state
        .engine
        .goals(user.id)
        .await?
        .into_iter()
        .map(map_goal)
        .collect();
    Ok(Json(goals))
}

pub async fn get(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(goal_id): Path<Uuid>,
) -> Result<Json<GoalView>, ServerError> {
    let goal = state.engine.goal(user.id, goal_id).await?;
    Ok(Json(map_goal(goal)))
}

pub async fn create(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Json(payload): Json<GoalNew>,
) -> Result<(StatusCode, Json<GoalView>), ServerError> {
    let goal = state
        .engine
        .new_goal(NewGoalCmd {
            user_id: user.id,
            name: payload.name,
            target_amount_minor: payload.target_amount_minor,
            deadline: payload.deadline,
            icon: payload.icon,
            color: payload.color,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(map_goal(goal))))
}

pub async fn update(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(goal_id): Path<Uuid>,
    Json(payload): Json<GoalUpdate>,
) -> Result<Json<GoalView>, ServerError> {
    let cmd = UpdateGoalCmd {
        name: payload.name,
        target_amount_minor: payload.target_amount_minor,
        deadline: payload.deadline,
        icon: payload.icon,
        color: payload.color,
    };
    let goal = state.engine.update_goal(user.id, goal_id, cmd).await?;
    Ok(Json(map_goal(goal)))
}

pub async fn delete(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(goal_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_goal(user.id, goal_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_funds(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(goal_id): Path<Uuid>,
    Json(payload): Json<GoalFunds>,
) -> Result<(StatusCode, Json<GoalView>), ServerError> {
    let goal = state
        .engine
        .add_goal_funds(GoalFundsCmd {
            user_id: user.id,
            goal_id,
            amount_minor: payload.amount_minor,
            note: payload.note,
            date: payload.date.unwrap_or_else(|| state.today()),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(map_goal(goal))))
}

pub async fn contributions(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(goal_id): Path<Uuid>,
) -> Result<Json<Vec<ContributionView>>, ServerError> {
    let contributions = state
        .engine
        .goal_contributions(user.id, goal_id)
        .await?
        .into_iter()
        .map(map_contribution)
        .collect();
    Ok(Json(contributions))
}
