//! User record storage integration using PostgreSQL
//!
//! Every registered user is a single row in the `users` table. Rows are written
//! once, after their image has been stored, and never updated or deleted.

mod error;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{
    pool::PoolConnection,
    postgres::{PgPool, PgPoolOptions},
    Connection, FromRow, Postgres,
};

pub use error::{UserStorageError, UserStorageResult};

/// How long to wait for a free connection before failing the request
const ACQUIRE_TIMEOUT_SECS: u64 = 10;

/// Statements creating the users schema, all idempotent
const SCHEMA_STATEMENTS: [&str; 2] = [
    r"
    CREATE TABLE IF NOT EXISTS users (
        id         SERIAL PRIMARY KEY,
        user_id    VARCHAR NOT NULL,
        name       VARCHAR NOT NULL,
        address    VARCHAR NOT NULL,
        image_url  VARCHAR NOT NULL,
        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    ",
    "CREATE INDEX IF NOT EXISTS ix_users_user_id ON users (user_id)",
];

/// Stored user record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserRecord {
    /// Surrogate key assigned by the database
    pub id: i32,
    /// Caller supplied identifier, not unique
    pub user_id: String,
    /// Full name
    pub name: String,
    /// Postal address
    pub address: String,
    /// Public URL of the uploaded image
    pub image_url: String,
    /// Creation time, defaulted by the database
    pub created_at: DateTime<Utc>,
}

/// User record before it has been persisted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUserRecord {
    /// Caller supplied identifier, not unique
    pub user_id: String,
    /// Full name
    pub name: String,
    /// Postal address
    pub address: String,
    /// Public URL of the uploaded image
    pub image_url: String,
}

/// Persistence operations the HTTP layer depends on
#[async_trait::async_trait]
pub trait UserStore: Send + Sync {
    /// Persists a new record and returns it with `id` and `created_at` populated
    async fn insert(&self, record: NewUserRecord) -> UserStorageResult<UserRecord>;

    /// Returns every stored record in storage-engine order
    async fn list_all(&self) -> UserStorageResult<Vec<UserRecord>>;
}

/// User storage client for PostgreSQL operations
pub struct UserStorage {
    pool: PgPool,
}

impl UserStorage {
    /// Opens a connection pool against the given database
    ///
    /// # Arguments
    ///
    /// * `database_url` - PostgreSQL connection URL
    /// * `max_connections` - Upper bound on pooled connections
    ///
    /// # Errors
    ///
    /// Returns `UserStorageError::ConnectionError` if the database is unreachable
    pub async fn connect(database_url: &str, max_connections: u32) -> UserStorageResult<Self> {
        tracing::info!(max_connections, "Connecting to database");

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(ACQUIRE_TIMEOUT_SECS))
            .connect(database_url)
            .await
            .map_err(|e| UserStorageError::ConnectionError(e.to_string()))?;

        Ok(Self::from_pool(pool))
    }

    /// Wraps an existing pool
    #[must_use]
    pub const fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates the users table and its index when they do not exist yet
    ///
    /// # Errors
    ///
    /// Returns `UserStorageError::SchemaError` if any statement fails
    pub async fn ensure_schema(&self) -> UserStorageResult<()> {
        let mut session = self.session().await?;

        for statement in SCHEMA_STATEMENTS {
            sqlx::query(statement)
                .execute(&mut *session)
                .await
                .map_err(|e| UserStorageError::SchemaError(e.to_string()))?;
        }

        tracing::info!("Users schema is in place");
        Ok(())
    }

    /// Acquires a scoped session
    ///
    /// The connection goes back to the pool when the handle is dropped, on
    /// every exit path of the caller.
    ///
    /// # Errors
    ///
    /// Returns `UserStorageError::DatabaseError` if no connection becomes available
    pub async fn session(&self) -> UserStorageResult<PoolConnection<Postgres>> {
        Ok(self.pool.acquire().await?)
    }

    /// Closes the pool, waiting for checked out sessions to be returned
    pub async fn close(&self) {
        tracing::info!("Closing database connection pool");
        self.pool.close().await;
    }
}

#[async_trait::async_trait]
impl UserStore for UserStorage {
    async fn insert(&self, record: NewUserRecord) -> UserStorageResult<UserRecord> {
        let mut session = self.session().await?;
        // Dropping the transaction without commit rolls it back
        let mut tx = session.begin().await?;

        let stored = sqlx::query_as::<_, UserRecord>(
            r"
            INSERT INTO users (user_id, name, address, image_url)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, name, address, image_url, created_at
            ",
        )
        .bind(&record.user_id)
        .bind(&record.name)
        .bind(&record.address)
        .bind(&record.image_url)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        tracing::debug!(id = stored.id, user_id = %stored.user_id, "Inserted user record");
        Ok(stored)
    }

    async fn list_all(&self) -> UserStorageResult<Vec<UserRecord>> {
        let mut session = self.session().await?;

        let records = sqlx::query_as::<_, UserRecord>(
            "SELECT id, user_id, name, address, image_url, created_at FROM users",
        )
        .fetch_all(&mut *session)
        .await?;

        Ok(records)
    }
}
