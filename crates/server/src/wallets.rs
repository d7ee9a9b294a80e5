//! Wallets API endpoints.

use api_types::wallet::{WalletListResponse, WalletNew, WalletUpdate, WalletView};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use engine::{NewWalletCmd, UpdateWalletCmd};
use uuid::Uuid;

use crate::{ServerError, convert::map_wallet, server::ServerState};

pub async fn list(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
) -> Result<Json<WalletListResponse>, ServerError> {
    let wallets = state.engine.wallets(user.id).await?;
    let total_balance_minor = state.engine.total_balance(user.id).await?;
    Ok(Json(WalletListResponse {
        wallets: wallets.into_iter().map(map_wallet).collect(),
        total_balance_minor,
    }))
}

pub async fn get(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(wallet_id): Path<Uuid>,
) -> Result<Json<WalletView>, ServerError> {
    let wallet = state.engine.wallet(user.id, wallet_id).await?;
    Ok(Json(map_wallet(wallet)))
}

pub async fn create(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Json(payload): Json<WalletNew>,
) -> Result<(StatusCode, Json<WalletView>), ServerError> {
    let cmd = NewWalletCmd {
        icon: payload.icon,
        color: payload.color,
        is_default: payload.is_default,
        ..NewWalletCmd::new(user.id, payload.name)
    };
    let wallet = state.engine.new_wallet(cmd).await?;
    Ok((StatusCode::CREATED, Json(map_wallet(wallet))))
}

pub async fn update(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(wallet_id): Path<Uuid>,
    Json(payload): Json<WalletUpdate>,
) -> Result<Json<WalletView>, ServerError> {
    if payload.name.is_none()
        && payload.icon.is_none()
        && payload.color.is_none()
        && payload.is_default.is_none()
    {
        return Err(ServerError::Generic(
            "provide at least one of name, icon, color or is_default".to_string(),
        ));
    }

    let cmd = UpdateWalletCmd {
        name: payload.name,
        icon: payload.icon,
        color: payload.color,
        is_default: payload.is_default,
    };
    let wallet = state.engine.update_wallet(user.id, wallet_id, cmd).await?;
    Ok(Json(map_wallet(wallet)))
}

pub async fn delete(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(wallet_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_wallet(user.id, wallet_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
