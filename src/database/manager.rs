use sqlx::{postgres::PgPoolOptions, Executor, PgPool};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::DatabaseConfig;

/// Errors from the storage layer
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A unique constraint rejected the write; carries the offending field.
    #[error("Duplicate value for unique field: {0}")]
    Conflict(String),

    #[error("Database unavailable: {0}")]
    Unavailable(String),

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error(transparent)]
    Sqlx(sqlx::Error),
}

impl From<sqlx::Error> for DatabaseError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_) => {
                DatabaseError::Unavailable(err.to_string())
            }
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                let field = db_err
                    .constraint()
                    .map(field_for_constraint)
                    .unwrap_or("value")
                    .to_string();
                DatabaseError::Conflict(field)
            }
            other => DatabaseError::Sqlx(other),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DatabaseError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DatabaseError::MigrationError(err.to_string())
    }
}

/// Map unique constraint names from the migrations to API field names
fn field_for_constraint(constraint: &str) -> &'static str {
    match constraint {
        "users_email_key" => "email",
        "users_username_key" => "username",
        _ => "value",
    }
}

/// Pool construction and schema management for the Postgres store
pub struct DatabaseManager;

impl DatabaseManager {
    /// Open a pool. Acquisition waits at most `connection_timeout` seconds and
    /// every session gets a server-side `statement_timeout`, so no store call
    /// can hang a request indefinitely.
    pub async fn connect(config: &DatabaseConfig, url: &str) -> Result<PgPool, DatabaseError> {
        let statement_timeout_ms = config.statement_timeout_ms;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .after_connect(move |conn, _meta| {
                Box::pin(async move {
                    conn.execute(format!("SET statement_timeout = {}", statement_timeout_ms).as_str())
                        .await?;
                    Ok(())
                })
            })
            .connect(url)
            .await?;

        info!(
            "Created database pool (max {} connections, statement timeout {}ms)",
            config.max_connections, statement_timeout_ms
        );
        Ok(pool)
    }

    /// Apply pending migrations from `./migrations`
    pub async fn migrate(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::migrate!("./migrations").run(pool).await?;
        info!("Database migrations applied");
        Ok(())
    }

    /// Pings the pool to ensure connectivity
    pub async fn health_check(pool: &PgPool) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }
}
