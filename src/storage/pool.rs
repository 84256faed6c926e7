//! Database connection pool initialization.
//!
//! The store executes over sqlx's `Any` driver, which routes a single
//! placeholder-based query interface to whichever concrete driver the
//! connection URL selects. Schema creation and migration are owned by
//! external tooling; nothing here issues DDL.

use log::{error, info};
use sqlx::AnyPool;

use crate::error_handling::StoreError;

/// Connects a pool for the given database URL.
///
/// Installs the default `Any` drivers (idempotent) and logs the outcome.
/// Connection failures surface as [`StoreError::Sql`] with connect context.
pub async fn init_store_pool(database_url: &str) -> Result<AnyPool, StoreError> {
    sqlx::any::install_default_drivers();

    let pool = AnyPool::connect(database_url).await.map_err(|e| {
        error!("Failed to connect to database: {e}");
        StoreError::Sql("connect pool", e)
    })?;

    info!("Database pool initialized.");
    Ok(pool)
}
