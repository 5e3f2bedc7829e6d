//! Relational storage for the dashboard
//!
//! sea-orm entities, migrations and the repository functions the API calls.

pub mod entities;
pub mod metric;
pub mod migrator;
pub mod repository;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use std::time::Duration;
use tracing::info;

pub use metric::{CompanyScope, Grain, MetricTable, PeriodKey};
pub use repository::{RepoError, RepoResult};

/// Open the process-wide connection pool.
///
/// In-memory SQLite databases exist per connection, so their pool is pinned
/// to a single connection that is never recycled.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(database_url.to_string());
    options
        .connect_timeout(Duration::from_secs(10))
        .sqlx_logging(false);

    if database_url.contains(":memory:") {
        options
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(Duration::from_secs(u32::MAX as u64))
            .max_lifetime(Duration::from_secs(u32::MAX as u64));
    } else {
        options.max_connections(16).min_connections(1);
    }

    let db = Database::connect(options).await?;
    info!("Connected to database ({:?})", db.get_database_backend());
    Ok(db)
}

/// Apply all pending migrations
pub async fn migrate(db: &DatabaseConnection) -> Result<(), DbErr> {
    migrator::Migrator::up(db, None).await?;
    info!("Database migrations applied");
    Ok(())
}
