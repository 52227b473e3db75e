use crate::config::parameter;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Error, Pool, Sqlite};
use std::str::FromStr;
use tracing::info;

pub struct Database {
    pool: Pool<Sqlite>,
}

/// Bootstrap DDL, applied on every startup. The UNIQUE constraint on
/// refresh_tokens.user_id is load-bearing: it is what makes issue-time
/// upserts supersede the previous session atomically.
const SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS users (
        id         TEXT PRIMARY KEY,
        email      TEXT NOT NULL UNIQUE,
        firstname  TEXT NOT NULL,
        lastname   TEXT NOT NULL,
        role       TEXT NOT NULL DEFAULT 'regular'
                   CHECK (role IN ('regular', 'admin', 'manager')),
        auth_type  TEXT NOT NULL DEFAULT 'email'
                   CHECK (auth_type IN ('microsoft', 'google', 'linkedin', 'email')),
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )"#,
    r#"CREATE TABLE IF NOT EXISTS refresh_tokens (
        token_id   TEXT PRIMARY KEY,
        user_id    TEXT NOT NULL UNIQUE REFERENCES users(id),
        expire_at  TEXT NOT NULL,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )"#,
];

#[async_trait]
pub trait DatabaseTrait {
    async fn init() -> Result<Self, Error>
    where
        Self: Sized;
    fn get_pool(&self) -> &Pool<Sqlite>;
}

impl Database {
    /// Connect to `database_url`, create missing tables, and return the handle.
    /// Integration tests use this directly with `sqlite::memory:` pools.
    pub async fn init_with(database_url: &str, max_connections: u32) -> Result<Self, Error> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let acquire_timeout_seconds = parameter::get_optional("DB_ACQUIRE_TIMEOUT_SECONDS")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(std::time::Duration::from_secs(acquire_timeout_seconds))
            .connect_with(options)
            .await?;

        for statement in SCHEMA {
            sqlx::query(statement).execute(&pool).await?;
        }

        Ok(Self { pool })
    }
}

#[async_trait]
impl DatabaseTrait for Database {
    async fn init() -> Result<Self, Error> {
        let database_url = parameter::get("DATABASE_URL");

        let max_connections = parameter::get_optional("DB_MAX_CONNECTIONS")
            .and_then(|s| s.parse::<u32>().ok())
            .unwrap_or(5);

        let database = Self::init_with(&database_url, max_connections).await?;
        info!("Database pool configured: max={}", max_connections);

        Ok(database)
    }

    fn get_pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }
}
