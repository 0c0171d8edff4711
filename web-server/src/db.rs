//! Database module - SQLite connection and schema

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

/// Create database connection pool
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
}

/// Single-connection in-memory pool; the database lives as long as the pool
pub async fn create_memory_pool() -> Result<SqlitePool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
}

/// Run database migrations
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA_SQL).execute(pool).await?;

    tracing::info!("Database schema applied successfully");
    Ok(())
}

/// Database schema SQL
const SCHEMA_SQL: &str = r#"
-- Users
CREATE TABLE IF NOT EXISTS users (
    id BLOB PRIMARY KEY,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    phone TEXT NOT NULL,
    last_login TEXT,
    created_at TEXT NOT NULL
);

-- Analyses (one per classification request, append-only)
CREATE TABLE IF NOT EXISTS analyses (
    id BLOB PRIMARY KEY,
    user_id BLOB NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    email TEXT NOT NULL,
    phone TEXT,
    gender TEXT,
    occupation TEXT,
    sleep_duration REAL NOT NULL,
    stress INTEGER NOT NULL,
    age INTEGER NOT NULL,
    blood_pressure TEXT NOT NULL,
    heart_rate INTEGER NOT NULL,
    tea_coffee TEXT NOT NULL,
    bmi TEXT NOT NULL,
    snoring TEXT NOT NULL,
    work_hours REAL NOT NULL,
    features TEXT NOT NULL,
    class_index INTEGER NOT NULL,
    diagnosis TEXT NOT NULL,
    full_diagnosis TEXT NOT NULL,
    severity TEXT NOT NULL,
    color TEXT NOT NULL,
    model_id TEXT,
    created_at TEXT NOT NULL
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_analyses_user ON analyses(user_id);
CREATE INDEX IF NOT EXISTS idx_analyses_severity ON analyses(severity);
CREATE INDEX IF NOT EXISTS idx_analyses_email ON analyses(email);
"#;
