//! PostgreSQL repositories
//!
//! Every call borrows a connection from the pool for the duration of one
//! statement or transaction; it goes back to the pool when dropped.

mod catalog_repository;
mod scan_repository;

pub use catalog_repository::SqlxCatalogRepository;
pub use scan_repository::SqlxScanRepository;

use sqlx::PgPool;

/// Embedded schema migrations
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Apply pending migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}
