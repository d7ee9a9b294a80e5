//! Wallet-to-wallet transfers.

use api_types::transfer::{TransferNew, TransferView};
use axum::{Extension, Json, extract::State, http::StatusCode};
use engine::TransferCmd;

use crate::{ServerError, convert::map_transaction, server::ServerState};

pub async fn create(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Json(payload): Json<TransferNew>,
) -> Result<(StatusCode, Json<TransferView>), ServerError> {
    let pair = state
        .engine
        .transfer(TransferCmd {
            user_id: user.id,
            from_wallet_id: payload.from_wallet_id,
            to_wallet_id: payload.to_wallet_id,
            amount_minor: payload.amount_minor,
            date: payload.date,
            note: payload.note,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TransferView {
            debit: map_transaction(pair.debit),
            credit: map_transaction(pair.credit),
        }),
    ))
}
