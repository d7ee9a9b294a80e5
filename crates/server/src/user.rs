//! Signup and the current user.

use api_types::user::{UserNew, UserView};
use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::{ServerError, convert::map_user, server::ServerState};

/// Create a user with its default wallet and categories.
pub async fn signup(
    State(state): State<ServerState>,
    Json(payload): Json<UserNew>,
) -> Result<(StatusCode, Json<UserView>), ServerError> {
    let display_name = payload
        .display_name
        .as_deref()
        .unwrap_or(payload.username.as_str());
    let user = state
        .engine
        .new_user(&payload.username, display_name)
        .await?;
    tracing::info!(user_id = %user.id, "user signed up");
    Ok((StatusCode::CREATED, Json(map_user(user))))
}

pub async fn me(Extension(user): Extension<engine::User>) -> Json<UserView> {
    Json(map_user(user))
}
