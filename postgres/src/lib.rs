//! `PostgreSQL` storage gateway for gatepass.
//!
//! [`PostgresStore`] implements both gateway traits from `gatepass-core` on a
//! shared [`sqlx::PgPool`]. Every lifecycle transition is a single conditional
//! `UPDATE`, so the row itself is the arbiter under concurrent requests:
//!
//! - bind: `user_id IS NULL AND status <> 'revoked'`, assigning a fresh
//!   32-byte seed in the same statement
//! - mark used: `status = 'valid' AND user_id IS NOT NULL`
//!
//! # Example
//!
//! ```no_run
//! use gatepass_postgres::{PoolConfig, PostgresStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = PostgresStore::connect(&PoolConfig::new("postgres://localhost/gatepass")).await?;
//! store.migrate().await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod password;
mod pool;
mod store;

pub use password::{hash_password, verify_password};
pub use pool::PoolConfig;
pub use store::{PostgresStore, SEED_LEN};
