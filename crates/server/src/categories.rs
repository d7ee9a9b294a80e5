//! Categories API endpoints.

use api_types::category::{CategoryList, CategoryNew, CategoryUpdate, CategoryView};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{NewCategoryCmd, UpdateCategoryCmd};
use uuid::Uuid;

use crate::{
    ServerError,
    convert::{kind_from_api, map_category},
    server::ServerState,
};

pub async fn list(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Query(query): Query<CategoryList>,
) -> Result<Json<Vec<CategoryView>>, ServerError> {
    let categories = state
        .engine
        .categories(user.id, query.kind.map(kind_from_api))
        .await?
        .into_iter()
        .map(map_category)
        .collect();
    Ok(Json(categories))
}

pub async fn create(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Json(payload): Json<CategoryNew>,
) -> Result<(StatusCode, Json<CategoryView>), ServerError> {
    let cmd = NewCategoryCmd {
        icon: payload.icon,
        color: payload.color,
        is_essential: payload.is_essential,
        ..NewCategoryCmd::new(user.id, payload.name, kind_from_api(payload.kind))
    };
    let category = state.engine.new_category(cmd).await?;
    Ok((StatusCode::CREATED, Json(map_category(category))))
}

pub async fn update(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(category_id): Path<Uuid>,
    Json(payload): Json<CategoryUpdate>,
) -> Result<Json<CategoryView>, ServerError> {
    let cmd = UpdateCategoryCmd {
        name: payload.name,
        icon: payload.icon,
        color: payload.color,
        is_essential: payload.is_essential,
    };
    let category = state
        .engine
        .update_category(user.id, category_id, cmd)
        .await?;
    Ok(Json(map_category(category)))
}

pub async fn delete(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(category_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_category(user.id, category_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
