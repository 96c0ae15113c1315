use diesel::pg::PgConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

use super::connection::DatabaseError;

/// SQL migrations under `migrations/`, compiled into the binary
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Apply every pending migration
///
/// # Returns
/// * `Ok(versions)` - Versions applied by this call (empty when up to date)
/// * `Err(DatabaseError::MigrationError)` - A migration failed
pub fn run_migrations(conn: &mut PgConnection) -> Result<Vec<String>, DatabaseError> {
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| DatabaseError::MigrationError(e.to_string()))?;

    Ok(applied.into_iter().map(|version| version.to_string()).collect())
}

/// Whether any embedded migration has not been applied yet
pub fn has_pending_migrations(conn: &mut PgConnection) -> Result<bool, DatabaseError> {
    conn.has_pending_migration(MIGRATIONS)
        .map_err(|e| DatabaseError::MigrationError(e.to_string()))
}
