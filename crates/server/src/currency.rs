//! Exchange rates endpoint.

use api_types::currency::{RateOrigin, RatesResponse};
use axum::{Json, extract::State};
use engine::fx::{self, BASE_CURRENCY};

use crate::{convert::currency_to_api, server::ServerState};

pub async fn rates(State(state): State<ServerState>) -> Json<RatesResponse> {
    let snapshot = state.rates.rates().await;
    Json(RatesResponse {
        base: currency_to_api(BASE_CURRENCY),
        origin: match snapshot.origin {
            fx::RateOrigin::Live => RateOrigin::Live,
            fx::RateOrigin::Fallback => RateOrigin::Fallback,
        },
        fetched_at: snapshot.fetched_at,
        rates: snapshot
            .rates
            .into_iter()
            .map(|(currency, rate)| (currency_to_api(currency), rate))
            .collect(),
    })
}
