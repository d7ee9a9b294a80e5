//! Handles settings for the application.
//!
//! Values are read from an optional `settings.toml` in the working directory,
//! then overridden by `DOMPET__SECTION__KEY` environment variables.
use config::{Config, ConfigError, Environment, File};
use engine::RecurrencePolicy;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Database {
    Memory,
    Sqlite(String),
}

impl Default for Database {
    fn default() -> Self {
        Database::Sqlite("dompet.db".to_string())
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
    /// IANA zone deciding what "today" is.
    pub timezone: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            timezone: "Asia/Jakarta".to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: Option<String>,
    pub port: u16,
    pub database: Database,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: None,
            port: 8080,
            database: Database::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Recurrence {
    pub policy: RecurrencePolicy,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Currency {
    pub api_url: String,
    pub ttl_secs: u64,
    /// Per-request limit before the fallback table is used.
    pub timeout_secs: u64,
}

impl Default for Currency {
    fn default() -> Self {
        Self {
            api_url: server::DEFAULT_RATES_URL.to_string(),
            ttl_secs: engine::fx::DEFAULT_TTL.as_secs(),
            timeout_secs: server::DEFAULT_RATES_TIMEOUT.as_secs(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub recurrence: Recurrence,
    pub currency: Currency,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings").required(false))
            .add_source(
                Environment::with_prefix("DOMPET")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn parse(toml: &str) -> Settings {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn empty_file_uses_defaults() {
        let settings = parse("");
        assert_eq!(settings.app.level, "info");
        assert_eq!(settings.app.timezone, "Asia/Jakarta");
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.recurrence.policy, RecurrencePolicy::CatchUp);
        assert_eq!(settings.currency.ttl_secs, 3600);
        assert_eq!(settings.currency.timeout_secs, 5);
    }

    #[test]
    fn reads_sections() {
        let settings = parse(
            r#"
            [app]
            level = "debug"

            [server]
            port = 9000
            database = "memory"

            [recurrence]
            policy = "single_step"

            [currency]
            timeout_secs = 2
            "#,
        );
        assert_eq!(settings.app.level, "debug");
        assert_eq!(settings.server.port, 9000);
        assert!(matches!(settings.server.database, Database::Memory));
        assert_eq!(settings.recurrence.policy, RecurrencePolicy::SingleStep);
        assert_eq!(settings.currency.timeout_secs, 2);
    }

    #[test]
    fn sqlite_database_takes_a_path() {
        let settings = parse(
            r#"
            [server]
            database = { sqlite = "/tmp/ledger.db" }
            "#,
        );
        assert!(matches!(settings.server.database, Database::Sqlite(path) if path == "/tmp/ledger.db"));
    }
}
