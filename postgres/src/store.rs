//! [`PostgresStore`]: the production storage gateway.

use crate::password::hash_password;
use crate::pool::PoolConfig;
use chrono::{DateTime, Utc};
use gatepass_core::{
    Seed, StorageError, StorageFuture, Ticket, TicketId, TicketRepository, TicketStatus, User,
    UserId, UserRepository,
};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::{debug, info};
use uuid::Uuid;

/// Length in bytes of the seed assigned at bind time (`gen_random_bytes(32)`).
pub const SEED_LEN: usize = 32;

/// `PostgreSQL` implementation of [`UserRepository`] and [`TicketRepository`].
///
/// Cheap to clone; clones share the pool.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Open a pool with the given settings.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Unavailable`] if the database cannot be reached
    /// within the connect timeout, [`StorageError::Database`] otherwise.
    pub async fn connect(config: &PoolConfig) -> Result<Self, StorageError> {
        let pool = config.open().await.map_err(storage_error)?;
        info!(
            max_connections = config.max_connections,
            min_connections = config.min_connections,
            "PostgreSQL pool connected"
        );
        Ok(Self::from_pool(pool))
    }

    /// Wrap an existing pool.
    #[must_use]
    pub const fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Run the embedded migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Database`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), StorageError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StorageError::Database(format!("Migration failed: {e}")))?;
        info!("Database migrations applied");
        Ok(())
    }

    /// Check that a connection can be acquired and used.
    ///
    /// # Errors
    ///
    /// Returns the storage error the health-check query produced.
    pub async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(())
    }

    /// Wait for in-flight queries to finish and close every connection.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("PostgreSQL pool closed");
    }
}

impl std::fmt::Debug for PostgresStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresStore")
            .field("pool_size", &self.pool.size())
            .finish_non_exhaustive()
    }
}

fn storage_error(e: sqlx::Error) -> StorageError {
    match e {
        sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => StorageError::Unavailable,
        other => StorageError::Database(other.to_string()),
    }
}

fn decode_error(e: sqlx::Error) -> StorageError {
    StorageError::Decode(e.to_string())
}

fn row_to_user(row: &PgRow) -> Result<User, StorageError> {
    let id: Uuid = row.try_get("user_id").map_err(decode_error)?;
    let username: String = row.try_get("username").map_err(decode_error)?;
    Ok(User::new(UserId(id), username))
}

fn row_to_ticket(row: &PgRow) -> Result<Ticket, StorageError> {
    let status: String = row.try_get("status").map_err(decode_error)?;
    let status = TicketStatus::parse(&status)
        .ok_or_else(|| StorageError::Decode(format!("unknown ticket status: {status}")))?;
    let seed: Option<Vec<u8>> = row.try_get("seed").map_err(decode_error)?;

    Ok(Ticket {
        id: row
            .try_get::<Option<Uuid>, _>("ticket_id")
            .map_err(decode_error)?
            .map(TicketId),
        user_id: row
            .try_get::<Option<Uuid>, _>("user_id")
            .map_err(decode_error)?
            .map(UserId),
        seat: row.try_get("seat").map_err(decode_error)?,
        gate: row.try_get("gate").map_err(decode_error)?,
        seed: seed.map(|bytes| Seed::from_bytes(&bytes)),
        status,
        created_at: row
            .try_get::<Option<DateTime<Utc>>, _>("created_at")
            .map_err(decode_error)?,
        used_at: row
            .try_get::<Option<DateTime<Utc>>, _>("used_at")
            .map_err(decode_error)?,
    })
}

impl UserRepository for PostgresStore {
    fn get_user_by_username<'a>(&'a self, username: &'a str) -> StorageFuture<'a, Option<User>> {
        Box::pin(async move {
            let row = sqlx::query(
                r"
                SELECT user_id, username
                FROM users
                WHERE LOWER(username) = LOWER($1)
                ",
            )
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;

            row.as_ref().map(row_to_user).transpose()
        })
    }

    fn create_user<'a>(&'a self, username: &'a str, password: &'a str) -> StorageFuture<'a, bool> {
        Box::pin(async move {
            let password_hash = hash_password(password)
                .map_err(|e| StorageError::Database(format!("password hashing failed: {e}")))?;
            let result = sqlx::query(
                r"
                INSERT INTO users (username, password_hash)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                ",
            )
            .bind(username)
            .bind(password_hash)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

            Ok(result.rows_affected() == 1)
        })
    }
}

impl TicketRepository for PostgresStore {
    fn get_ticket_by_seat_gate<'a>(
        &'a self,
        seat: &'a str,
        gate: &'a str,
    ) -> StorageFuture<'a, Option<Ticket>> {
        Box::pin(async move {
            let row = sqlx::query(
                r"
                SELECT ticket_id, user_id, seat, gate, seed, status, created_at, used_at
                FROM tickets
                WHERE seat = $1 AND gate = $2 AND status <> 'revoked'
                ",
            )
            .bind(seat)
            .bind(gate)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;

            row.as_ref().map(row_to_ticket).transpose()
        })
    }

    fn bind_ticket_to_user<'a>(
        &'a self,
        user: &'a User,
        ticket: &'a Ticket,
    ) -> StorageFuture<'a, bool> {
        Box::pin(async move {
            let Some(ticket_id) = ticket.id else {
                return Ok(false);
            };

            let result = sqlx::query(
                r"
                UPDATE tickets
                SET user_id = $2, seed = gen_random_bytes(32)
                WHERE ticket_id = $1 AND user_id IS NULL AND status <> 'revoked'
                ",
            )
            .bind(ticket_id.0)
            .bind(user.id.0)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

            debug!(%ticket_id, rows = result.rows_affected(), "Bind ticket update");
            Ok(result.rows_affected() == 1)
        })
    }

    fn mark_ticket_used(&self, ticket_id: TicketId) -> StorageFuture<'_, bool> {
        Box::pin(async move {
            let result = sqlx::query(
                r"
                UPDATE tickets
                SET status = 'used', used_at = now()
                WHERE ticket_id = $1 AND status = 'valid' AND user_id IS NOT NULL
                ",
            )
            .bind(ticket_id.0)
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

            debug!(%ticket_id, rows = result.rows_affected(), "Mark used update");
            Ok(result.rows_affected() == 1)
        })
    }
}
