//! Database access for the portal `PostgreSQL` instance.
//!
//! The backend customer store is a remote API, not this database. Postgres
//! holds local operational data only:
//!
//! ## Tables
//!
//! - `sessions` - Tower-sessions storage
//!
//! The sessions table is created by the session store's own migration
//! (`PostgresStore::migrate`) at startup.

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
