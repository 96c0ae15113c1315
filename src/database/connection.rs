use diesel::pg::PgConnection;
use diesel::r2d2::{self, ConnectionManager, Pool, PooledConnection};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Type alias for PostgreSQL connection pool
pub type PgPool = Pool<ConnectionManager<PgConnection>>;

/// Type alias for pooled connection
pub type PgPooledConnection = PooledConnection<ConnectionManager<PgConnection>>;

/// Database-related errors
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Connection pool error: {0}")]
    ConnectionPoolError(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Migration error: {0}")]
    MigrationError(String),

    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    #[error("Connection pool is closed")]
    PoolClosed,

    #[error("Blocking task failed: {0}")]
    TaskFailed(String),

    #[error("Diesel error: {0}")]
    DieselError(#[from] diesel::result::Error),
}

/// Process-wide connection pool with an explicit lifecycle
///
/// Created once at startup and handed to the repository. `close` drops the
/// inner pool, after which every checkout fails with `PoolClosed`; idle
/// connections are released once in-flight checkouts are returned.
#[derive(Clone)]
pub struct DatabasePool {
    inner: Arc<RwLock<Option<PgPool>>>,
}

impl DatabasePool {
    pub fn new(pool: PgPool) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(pool))),
        }
    }

    /// Check out a connection (blocks until one is available)
    pub fn get_conn(&self) -> Result<PgPooledConnection, DatabaseError> {
        // Clone the handle so the lock is not held while waiting on r2d2
        let pool = self.inner.read().clone().ok_or(DatabaseError::PoolClosed)?;

        pool.get()
            .map_err(|e| DatabaseError::ConnectionPoolError(e.to_string()))
    }

    pub fn max_size(&self) -> Option<u32> {
        self.inner.read().as_ref().map(|pool| pool.max_size())
    }

    pub fn is_closed(&self) -> bool {
        self.inner.read().is_none()
    }

    /// Release the pool; calling it again is a no-op
    pub fn close(&self) {
        if self.inner.write().take().is_some() {
            tracing::info!("Database connection pool closed");
        }
    }
}

/// Establish the connection pool and verify one connection
///
/// # Arguments
/// * `database_url` - libpq connection string or `postgres://` URL
/// * `pool_size` - Maximum number of pooled connections
pub fn establish_connection_pool(
    database_url: &str,
    pool_size: u32,
) -> Result<DatabasePool, DatabaseError> {
    tracing::info!("Establishing database connection pool...");

    let manager = ConnectionManager::<PgConnection>::new(database_url);
    let pool = r2d2::Pool::builder()
        .max_size(pool_size)
        .connection_timeout(Duration::from_secs(5))
        .build(manager)
        .map_err(|e| DatabaseError::ConnectionPoolError(e.to_string()))?;

    tracing::info!("Database pool created with max size: {}", pool_size);

    // Fail fast on bad credentials or an unreachable host
    let _ = pool
        .get()
        .map_err(|e| DatabaseError::ConnectionFailed(e.to_string()))?;

    tracing::info!("Database connection successful");

    Ok(DatabasePool::new(pool))
}
