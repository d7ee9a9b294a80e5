use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use chrono::Datelike;
use engine::{Engine, fx::RateCache};
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::Database;
use serde_json::{Value, json};
use server::{OpenErApi, ServerState, router};
use tower::ServiceExt;

async fn app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    // Nothing listens there: every fetch fails and the fallback table is used.
    let rates = RateCache::new(OpenErApi::new(
        reqwest::Client::new(),
        "http://127.0.0.1:9/v6/latest/USD",
    ));
    router(ServerState::new(engine, rates, chrono_tz::Asia::Jakarta))
}

async fn call(
    app: &Router,
    method: &str,
    uri: &str,
    user: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header("x-user-id", user);
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn signup(app: &Router, username: &str) -> String {
    let (status, body) = call(
        app,
        "POST",
        "/users",
        None,
        Some(json!({ "username": username })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

async fn category_id(app: &Router, user: &str, kind: &str, name: &str) -> String {
    let (status, body) = call(
        app,
        "GET",
        &format!("/categories?kind={kind}"),
        Some(user),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body.as_array()
        .unwrap()
        .iter()
        .find(|c| c["name"] == name)
        .unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string()
}

#[tokio::test]
async fn missing_or_unknown_user_header_is_401() {
    let app = app().await;
    let (status, body) = call(&app, "GET", "/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    let unknown = uuid::Uuid::new_v4().to_string();
    let (status, _) = call(&app, "GET", "/me", Some(&unknown), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call(&app, "GET", "/wallets", Some("not-a-uuid"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn signup_provisions_main_wallet_and_rejects_duplicates() {
    let app = app().await;
    let user = signup(&app, "alice").await;

    let (status, me) = call(&app, "GET", "/me", Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "alice");

    let (status, wallets) = call(&app, "GET", "/wallets", Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(wallets["wallets"][0]["name"], "Main Wallet");
    assert_eq!(wallets["wallets"][0]["is_default"], true);
    assert_eq!(wallets["total_balance_minor"], 0);

    let (status, _) = call(
        &app,
        "POST",
        "/users",
        None,
        Some(json!({ "username": "alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn transaction_lifecycle_moves_the_default_wallet() {
    let app = app().await;
    let user = signup(&app, "alice").await;
    let food = category_id(&app, &user, "expense", "Food").await;

    let (status, tx) = call(
        &app,
        "POST",
        "/transactions",
        Some(&user),
        Some(json!({
            "category_id": food,
            "kind": "expense",
            "amount_minor": 25_000,
            "date": "2026-03-02",
            "description": "lunch"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let tx_id = tx["id"].as_str().unwrap().to_string();

    let (_, wallets) = call(&app, "GET", "/wallets", Some(&user), None).await;
    assert_eq!(wallets["total_balance_minor"], -25_000);

    let (status, updated) = call(
        &app,
        "PUT",
        &format!("/transactions/{tx_id}"),
        Some(&user),
        Some(json!({ "amount_minor": 30_000 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["amount_minor"], 30_000);

    let (_, wallets) = call(&app, "GET", "/wallets", Some(&user), None).await;
    assert_eq!(wallets["total_balance_minor"], -30_000);

    let (status, page) = call(&app, "GET", "/transactions?q=LUNCH", Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 1);

    let (status, _) = call(
        &app,
        "DELETE",
        &format!("/transactions/{tx_id}"),
        Some(&user),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, wallets) = call(&app, "GET", "/wallets", Some(&user), None).await;
    assert_eq!(wallets["total_balance_minor"], 0);
}

#[tokio::test]
async fn foreign_currency_uses_fallback_rates() {
    let app = app().await;
    let user = signup(&app, "alice").await;
    let food = category_id(&app, &user, "expense", "Food").await;

    let (status, tx) = call(
        &app,
        "POST",
        "/transactions",
        Some(&user),
        Some(json!({
            "category_id": food,
            "kind": "expense",
            "amount_minor": 1250,
            "currency": "USD",
            "date": "2026-03-02"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(tx["amount_minor"], 200_000);
    assert_eq!(tx["original_amount_minor"], 1250);
    assert_eq!(tx["currency"], "USD");

    let (status, rates) = call(&app, "GET", "/currency/rates", Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rates["origin"], "fallback");
    assert_eq!(rates["base"], "IDR");
    assert_eq!(rates["rates"]["USD"], 16_000.0);
}

#[tokio::test]
async fn invalid_amount_is_422_with_error_body() {
    let app = app().await;
    let user = signup(&app, "alice").await;
    let food = category_id(&app, &user, "expense", "Food").await;

    let (status, body) = call(
        &app,
        "POST",
        "/transactions",
        Some(&user),
        Some(json!({
            "category_id": food,
            "kind": "expense",
            "amount_minor": 0,
            "date": "2026-03-02"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("amount"));
}

#[tokio::test]
async fn other_users_resources_are_forbidden() {
    let app = app().await;
    let alice = signup(&app, "alice").await;
    let bob = signup(&app, "bob").await;
    let food = category_id(&app, &alice, "expense", "Food").await;

    let (_, tx) = call(
        &app,
        "POST",
        "/transactions",
        Some(&alice),
        Some(json!({
            "category_id": food,
            "kind": "expense",
            "amount_minor": 5_000,
            "date": "2026-03-02"
        })),
    )
    .await;
    let tx_id = tx["id"].as_str().unwrap();

    let (status, _) = call(&app, "GET", &format!("/transactions/{tx_id}"), Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = call(
        &app,
        "DELETE",
        &format!("/transactions/{tx_id}"),
        Some(&bob),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let missing = uuid::Uuid::new_v4();
    let (status, _) = call(
        &app,
        "GET",
        &format!("/transactions/{missing}"),
        Some(&bob),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn transfers_move_money_but_not_the_dashboard() {
    let app = app().await;
    let user = signup(&app, "alice").await;

    let (_, wallets) = call(&app, "GET", "/wallets", Some(&user), None).await;
    let main = wallets["wallets"][0]["id"].as_str().unwrap().to_string();
    let (status, savings) = call(
        &app,
        "POST",
        "/wallets",
        Some(&user),
        Some(json!({ "name": "Savings" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let savings = savings["id"].as_str().unwrap().to_string();

    let today = chrono::Utc::now()
        .with_timezone(&chrono_tz::Asia::Jakarta)
        .date_naive();
    let (status, pair) = call(
        &app,
        "POST",
        "/transfers",
        Some(&user),
        Some(json!({
            "from_wallet_id": main,
            "to_wallet_id": savings,
            "amount_minor": 40_000,
            "date": today,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(pair["debit"]["kind"], "expense");
    assert_eq!(pair["credit"]["kind"], "income");

    let (_, saved) = call(&app, "GET", &format!("/wallets/{savings}"), Some(&user), None).await;
    assert_eq!(saved["balance_minor"], 40_000);

    let (status, dashboard) = call(&app, "GET", "/dashboard?period=monthly", Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dashboard["current"]["income_minor"], 0);
    assert_eq!(dashboard["current"]["expense_minor"], 0);
    assert_eq!(dashboard["balance_minor"], 0);

    let (status, _) = call(
        &app,
        "POST",
        "/transfers",
        Some(&user),
        Some(json!({
            "from_wallet_id": main,
            "to_wallet_id": main,
            "amount_minor": 1,
            "date": today,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn last_wallet_cannot_be_deleted() {
    let app = app().await;
    let user = signup(&app, "alice").await;
    let (_, wallets) = call(&app, "GET", "/wallets", Some(&user), None).await;
    let main = wallets["wallets"][0]["id"].as_str().unwrap().to_string();

    let (status, _) = call(&app, "DELETE", &format!("/wallets/{main}"), Some(&user), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn monthly_report_validates_and_defaults_the_month() {
    let app = app().await;
    let user = signup(&app, "alice").await;

    let (status, _) = call(
        &app,
        "GET",
        "/reports/monthly?year=2026&month=13",
        Some(&user),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, report) = call(
        &app,
        "GET",
        "/reports/monthly?year=2020&month=2",
        Some(&user),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["daily_trend"].as_array().unwrap().len(), 29);

    let today = chrono::Utc::now()
        .with_timezone(&chrono_tz::Asia::Jakarta)
        .date_naive();
    let (status, report) = call(&app, "GET", "/reports/monthly", Some(&user), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["year"], today.year());
    assert_eq!(report["month"], today.month());
}
