//! Transactions API endpoints

use api_types::transaction::{
    TransactionList, TransactionListResponse, TransactionNew, TransactionUpdate, TransactionView,
};
use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use engine::{NewTransactionCmd, TransactionSearch, UpdateTransactionCmd};
use uuid::Uuid;

use crate::{
    ServerError,
    convert::{currency_from_api, kind_from_api, map_transaction},
    server::ServerState,
};

pub async fn list(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Query(query): Query<TransactionList>,
) -> Result<Json<TransactionListResponse>, ServerError> {
    let search = TransactionSearch {
        from: query.from,
        to: query.to,
        category_id: query.category_id,
        wallet_id: query.wallet_id,
        kind: query.kind.map(kind_from_api),
        text: query.q,
        limit: query.limit,
        offset: query.offset,
    };
    let page = state.engine.search_transactions(user.id, search).await?;

    Ok(Json(TransactionListResponse {
        transactions: page.transactions.into_iter().map(map_transaction).collect(),
        total: page.total,
        limit: page.limit,
        offset: page.offset,
    }))
}

pub async fn get(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(transaction_id): Path<Uuid>,
) -> Result<Json<TransactionView>, ServerError> {
    let tx = state.engine.transaction(user.id, transaction_id).await?;
    Ok(Json(map_transaction(tx)))
}

/// Record an income or expense. Foreign amounts are converted to the base
/// currency with the cached rates.
pub async fn create(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Json(payload): Json<TransactionNew>,
) -> Result<(StatusCode, Json<TransactionView>), ServerError> {
    let mut cmd = NewTransactionCmd::new(
        user.id,
        payload.category_id,
        kind_from_api(payload.kind),
        payload.amount_minor,
        payload.date,
    );
    if let Some(wallet_id) = payload.wallet_id {
        cmd = cmd.wallet_id(wallet_id);
    }
    if let Some(description) = payload.description {
        cmd = cmd.description(description);
    }
    if let Some(notes) = payload.notes {
        cmd = cmd.notes(notes);
    }
    if let Some(proof_ref) = payload.proof_ref {
        cmd = cmd.proof_ref(proof_ref);
    }

    let currency = payload
        .currency
        .map(currency_from_api)
        .unwrap_or(engine::fx::BASE_CURRENCY);
    if currency != engine::fx::BASE_CURRENCY {
        let conversion = state
            .rates
            .convert(payload.amount_minor, currency)
            .await?;
        cmd = cmd.converted(conversion);
    }

    let tx = state.engine.create_transaction(cmd).await?;
    Ok((StatusCode::CREATED, Json(map_transaction(tx))))
}

pub async fn update(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(transaction_id): Path<Uuid>,
    Json(payload): Json<TransactionUpdate>,
) -> Result<Json<TransactionView>, ServerError> {
    let cmd = UpdateTransactionCmd {
        category_id: payload.category_id,
        wallet_id: payload.wallet_id,
        kind: payload.kind.map(kind_from_api),
        amount_minor: payload.amount_minor,
        date: payload.date,
        description: payload.description,
        notes: payload.notes,
        proof_ref: payload.proof_ref,
        ..UpdateTransactionCmd::new(user.id, transaction_id)
    };
    let tx = state.engine.update_transaction(cmd).await?;
    Ok(Json(map_transaction(tx)))
}

pub async fn delete(
    Extension(user): Extension<engine::User>,
    State(state): State<ServerState>,
    Path(transaction_id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state
        .engine
        .delete_transaction(user.id, transaction_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
