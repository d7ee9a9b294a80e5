use std::{sync::Arc, time::Duration};

use chrono_tz::Tz;
use engine::{
    events::{LogHooks, activity_channel, spawn_activity_consumer},
    fx::RateCache,
};
use migration::{Migrator, MigratorTrait};
use server::{OpenErApi, ServerState};
use settings::Database;

mod settings;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let settings = settings::Settings::new()?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "dompet={level},server={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let timezone: Tz = settings
        .app
        .timezone
        .parse()
        .map_err(|err| format!("invalid timezone {}: {err}", settings.app.timezone))?;

    let db = parse_database(&settings.server.database).await?;

    let (events, rx) = activity_channel();
    let consumer = spawn_activity_consumer(rx, Arc::new(LogHooks));

    let engine = engine::Engine::builder()
        .database(db)
        .events(events)
        .recurrence(settings.recurrence.policy)
        .build()
        .await?;
    tracing::info!(
        policy = ?engine.recurrence_policy(),
        %timezone,
        "engine ready"
    );

    let source = OpenErApi::with_url(settings.currency.api_url.as_str())
        .with_timeout(Duration::from_secs(settings.currency.timeout_secs));
    let rates = RateCache::new(source)
        .with_ttl(Duration::from_secs(settings.currency.ttl_secs));
    let state = ServerState::new(engine, rates, timezone);

    let bind = settings
        .server
        .bind
        .clone()
        .unwrap_or_else(|| "127.0.0.1".to_string());
    let addr = format!("{}:{}", bind, settings.server.port);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    server::run_with_listener(state, listener).await?;

    consumer.abort();
    Ok(())
}

async fn parse_database(
    config: &Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn std::error::Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    let database = sea_orm::Database::connect(url).await?;
    Migrator::up(&database, None).await?;
    tracing::info!("database migrated");
    Ok(database)
}
