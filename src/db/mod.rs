//! Database collaborator — pool init and startup sequencing.
//!
//! SYSTEM CONTEXT
//! ==============
//! This front end owns no schema; the pool exists for the mounted auth and
//! user routers and the `/healthz` ping. What matters here is ordering:
//! the HTTP listener binds only after the connection succeeds, and a
//! failed initial connect is fatal (no retry, the listener never starts).

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::config::env_parse;

const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

/// Initialize the `PostgreSQL` connection pool.
///
/// # Errors
///
/// Returns an error if the connection fails.
pub async fn init_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(env_parse("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS))
        .connect(database_url)
        .await?;
    Ok(pool)
}

/// Run `on_ready` only once `connect` has resolved successfully; a connect
/// failure propagates and `on_ready` never runs.
///
/// # Errors
///
/// Returns the error produced by `connect`.
pub async fn after_connect<R, E, F, Fut, T>(
    connect: impl Future<Output = Result<R, E>>,
    on_ready: F,
) -> Result<T, E>
where
    F: FnOnce(R) -> Fut,
    Fut: Future<Output = T>,
{
    let resource = connect.await?;
    Ok(on_ready(resource).await)
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
