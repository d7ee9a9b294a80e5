#![allow(dead_code)]

use chrono::NaiveDate;
use sea_orm::{ConnectionTrait, Database, DatabaseConnection};
use uuid::Uuid;

use engine::{
    Engine, NewWalletCmd, RecurrencePolicy, TransactionKind, TransactionSearch, User, Wallet,
};
use migration::MigratorTrait;

pub async fn engine_with_db() -> (Engine, DatabaseConnection) {
    engine_with_policy(RecurrencePolicy::default()).await
}

pub async fn engine_with_policy(policy: RecurrencePolicy) -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .recurrence(policy)
        .build()
        .await
        .unwrap();
    (engine, db)
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub async fn signup(engine: &Engine, username: &str) -> User {
    engine.new_user(username, "").await.unwrap()
}

pub async fn category_id(
    engine: &Engine,
    user_id: Uuid,
    kind: TransactionKind,
    name: &str,
) -> Uuid {
    engine
        .categories(user_id, Some(kind))
        .await
        .unwrap()
        .into_iter()
        .find(|c| c.name == name)
        .unwrap_or_else(|| panic!("category {name} missing"))
        .id
}

pub async fn default_wallet(engine: &Engine, user_id: Uuid) -> Wallet {
    engine
        .wallets(user_id)
        .await
        .unwrap()
        .into_iter()
        .find(|w| w.is_default)
        .unwrap()
}

pub async fn add_wallet(engine: &Engine, user_id: Uuid, name: &str) -> Wallet {
    engine
        .new_wallet(NewWalletCmd::new(user_id, name))
        .await
        .unwrap()
}

pub async fn balance(engine: &Engine, user_id: Uuid, wallet_id: Uuid) -> i64 {
    engine.wallet(user_id, wallet_id).await.unwrap().balance
}

pub async fn transaction_count(engine: &Engine, user_id: Uuid) -> u64 {
    engine
        .search_transactions(user_id, TransactionSearch::default())
        .await
        .unwrap()
        .total
}

/// Installs an SQLite trigger that aborts the matching statement.
pub async fn install_trigger(db: &DatabaseConnection, sql: &str) {
    db.execute_unprepared(sql).await.unwrap();
}

pub async fn drop_trigger(db: &DatabaseConnection, name: &str) {
    db.execute_unprepared(&format!("DROP TRIGGER {name}"))
        .await
        .unwrap();
}
