// storage/mod.rs
// Database operations module

pub mod markers;
pub mod pool;
pub mod spectra;

// Re-export commonly used items
pub use pool::init_store_pool;

use std::str::FromStr;

use sqlx::AnyPool;

use crate::dialect::{Backend, Dialect};
use crate::error_handling::StoreError;

/// Persistence handle for spectra and their marker flags.
///
/// Holds a caller-owned connection pool and the SQL dialect resolved once
/// from the configured backend identifier. All operations are single-shot
/// statements over the pool; the store takes no locks and coordinates no
/// threads of its own, and the insert/delete flag updates are deliberately
/// not wrapped in a transaction with the primary write (see crate docs).
#[derive(Debug, Clone)]
pub struct SpectrumStore {
    pool: AnyPool,
    dialect: Dialect,
}

impl SpectrumStore {
    /// Wraps an existing pool, resolving the dialect for `backend`.
    ///
    /// An unrecognized backend identifier fails here, before any SQL is
    /// issued.
    pub fn with_pool(pool: AnyPool, backend: &str) -> Result<Self, StoreError> {
        let backend = Backend::from_str(backend)?;
        Ok(SpectrumStore {
            pool,
            dialect: Dialect::new(backend),
        })
    }

    /// Connects a new pool for `database_url` and resolves the dialect.
    pub async fn connect(database_url: &str, backend: &str) -> Result<Self, StoreError> {
        // Resolve the backend first: a bad identifier must not open connections.
        let backend = Backend::from_str(backend)?;
        let pool = pool::init_store_pool(database_url).await?;
        Ok(SpectrumStore {
            pool,
            dialect: Dialect::new(backend),
        })
    }

    /// The underlying connection pool.
    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    /// The backend this store was configured for.
    pub fn backend(&self) -> Backend {
        self.dialect.backend()
    }

    pub(crate) fn dialect(&self) -> &Dialect {
        &self.dialect
    }
}
