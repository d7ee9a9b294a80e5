use axum::{
    Router,
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
};
use axum_extra::{
    TypedHeader,
    headers::{Error as AxumError, Header},
    typed_header::TypedHeaderRejection,
};
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use uuid::Uuid;

use std::sync::Arc;

use crate::{
    ServerError, budgets, categories, currency, dashboard, debts, goals, rates::OpenErApi,
    recurring, transactions, transfers, user, wallets,
};
use engine::{Engine, EngineError, fx::RateCache};

/// Header carrying the id of the authenticated user.
pub static USER_HEADER: axum::http::HeaderName = axum::http::HeaderName::from_static("x-user-id");

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub rates: Arc<RateCache<OpenErApi>>,
    /// Zone used to decide what "today" is for the user.
    pub timezone: Tz,
}

impl ServerState {
    pub fn new(engine: Engine, rates: RateCache<OpenErApi>, timezone: Tz) -> Self {
        Self {
            engine: Arc::new(engine),
            rates: Arc::new(rates),
            timezone,
        }
    }

    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.timezone).date_naive()
    }
}

/// `TypedHeader` for the user id header.
///
/// Authentication happens upstream; requests reach the server with the
/// user's id in "x-user-id".
#[derive(Debug)]
struct UserHeader(Uuid);

impl Header for UserHeader {
    fn name() -> &'static axum::http::HeaderName {
        &USER_HEADER
    }

    fn decode<'i, I>(values: &mut I) -> Result<Self, AxumError>
    where
        Self: Sized,
        I: Iterator<Item = &'i axum::http::HeaderValue>,
    {
        let value = values.next().ok_or_else(AxumError::invalid)?;
        let Ok(value) = value.to_str() else {
            return Err(AxumError::invalid());
        };
        let Ok(value) = Uuid::parse_str(value.trim()) else {
            return Err(AxumError::invalid());
        };

        Ok(UserHeader(value))
    }

    fn encode<E: Extend<axum::http::HeaderValue>>(&self, values: &mut E) {
        let as_string = self.0.to_string();
        match axum::http::HeaderValue::from_str(&as_string) {
            Ok(value) => values.extend(std::iter::once(value)),
            Err(_) => tracing::error!("failed to encode x-user-id header"),
        }
    }
}

async fn auth(
    user_header: Result<TypedHeader<UserHeader>, TypedHeaderRejection>,
    State(state): State<ServerState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ServerError> {
    // Missing and malformed ids are both unauthenticated.
    let Ok(TypedHeader(UserHeader(user_id))) = user_header else {
        return Err(ServerError::Unauthorized);
    };

    let user = match state.engine.user(user_id).await {
        Ok(user) => user,
        Err(EngineError::KeyNotFound(_)) => return Err(ServerError::Unauthorized),
        Err(err) => return Err(err.into()),
    };

    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

pub fn router(state: ServerState) -> Router {
    let authenticated = Router::new()
        .route("/me", get(user::me))
        .route("/wallets", get(wallets::list).post(wallets::create))
        .route(
            "/wallets/{id}",
            get(wallets::get)
                .put(wallets::update)
                .delete(wallets::delete),
        )
        .route("/categories", get(categories::list).post(categories::create))
        .route(
            "/categories/{id}",
            put(categories::update).delete(categories::delete),
        )
        .route(
            "/transactions",
            get(transactions::list).post(transactions::create),
        )
        .route(
            "/transactions/{id}",
            get(transactions::get)
                .put(transactions::update)
                .delete(transactions::delete),
        )
        .route("/transfers", post(transfers::create))
        .route("/recurring", get(recurring::list).post(recurring::create))
        .route(
            "/recurring/{id}",
            get(recurring::get).delete(recurring::delete),
        )
        .route("/recurring/{id}/toggle", put(recurring::toggle))
        .route("/budgets", get(budgets::list).post(budgets::create))
        .route("/budgets/all", get(budgets::list_all))
        .route(
            "/budgets/{id}",
            get(budgets::get)
                .put(budgets::update)
                .delete(budgets::delete),
        )
        .route("/dashboard", get(dashboard::summary))
        .route("/reports/monthly", get(dashboard::monthly_report))
        .route("/goals", get(goals::list).post(goals::create))
        .route(
            "/goals/{id}",
            get(goals::get).put(goals::update).delete(goals::delete),
        )
        .route(
            "/goals/{id}/contributions",
            get(goals::contributions).post(goals::add_funds),
        )
        .route("/debts", get(debts::list).post(debts::create))
        .route(
            "/debts/{id}",
            get(debts::get).put(debts::update).delete(debts::delete),
        )
        .route("/debts/{id}/paid", put(debts::mark_paid))
        .route("/currency/rates", get(currency::rates))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth));

    Router::new()
        .route("/users", post(user::signup))
        .merge(authenticated)
        .with_state(state)
}

pub async fn run_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router(state)).await
}

pub fn spawn_with_listener(
    state: ServerState,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(state, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
