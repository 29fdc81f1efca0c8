use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::env;

use crate::api::AppError;

pub type Result<T> = std::result::Result<T, AppError>;

/// Idempotent schema bootstrap. Statements are issued one by one, the
/// way the original migration runner split its SQL file.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS reservations (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        phone TEXT NOT NULL,
        date TEXT NOT NULL,
        time TEXT NOT NULL,
        guests INTEGER NOT NULL,
        notes TEXT,
        status TEXT NOT NULL DEFAULT 'pending',
        created_at INTEGER NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS menu_categories (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        order_index INTEGER NOT NULL DEFAULT 0
    )",
    "CREATE TABLE IF NOT EXISTS menu_items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        category_id INTEGER NOT NULL,
        name TEXT NOT NULL,
        description TEXT NOT NULL,
        image_url TEXT NOT NULL,
        is_active INTEGER NOT NULL DEFAULT 1,
        order_index INTEGER NOT NULL DEFAULT 0,
        FOREIGN KEY (category_id) REFERENCES menu_categories (id)
    )",
    "CREATE TABLE IF NOT EXISTS sessions (
        id TEXT PRIMARY KEY,
        created_at INTEGER NOT NULL,
        expires_at INTEGER NOT NULL
    )",
    "CREATE INDEX IF NOT EXISTS idx_reservations_date ON reservations (date)",
    "CREATE INDEX IF NOT EXISTS idx_reservations_status ON reservations (status)",
    "CREATE INDEX IF NOT EXISTS idx_menu_items_category ON menu_items (category_id)",
    "CREATE INDEX IF NOT EXISTS idx_sessions_expires ON sessions (expires_at)",
];

/// Handle over the embedded SQLite database. Constructed once at process
/// start, passed down via `web::Data`, closed at shutdown. All statements
/// are independent and non-transactional.
#[derive(Debug, Clone)]
pub struct Store {
    pub(crate) pool: SqlitePool,
}

impl Store {
    /// Opens the connection pool from `DATABASE_URL` and pings it.
    ///
    /// Defaults to `sqlite:restaurant.db?mode=rwc` (created on first run)
    /// when the variable is unset.
    pub async fn init() -> Result<Store> {
        let database_url = env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:restaurant.db?mode=rwc".to_string());

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&database_url)
            .await
            .map_err(|e| AppError::database("connect", e))?;

        // Test connection
        sqlx::query("SELECT 1")
            .execute(&pool)
            .await
            .map_err(|e| AppError::database("ping", e))?;

        tracing::info!(url = %database_url, "sqlite connection established");

        Ok(Store { pool })
    }

    /// Creates tables and indexes if they do not exist yet.
    pub async fn create_schema(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database("create_schema", e))?;
        }

        tracing::info!("database schema ready");
        Ok(())
    }

    /// Drains the pool. Called once after the HTTP server stops.
    pub async fn close(&self) {
        self.pool.close().await;
    }

    pub fn current_timestamp() -> i64 {
        chrono::Utc::now().timestamp()
    }
}

#[cfg(test)]
pub(crate) async fn test_store() -> Store {
    // A single connection keeps every statement on the same in-memory
    // database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool");

    let store = Store { pool };
    store.create_schema().await.expect("schema");
    store
}
