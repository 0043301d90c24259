use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

use crate::auth::RoleType;
use crate::error::StartupError;

/// Type alias for the PostgreSQL connection pool
pub type DbPool = PgPool;

/// Creates and configures a PostgreSQL connection pool
///
/// # Arguments
/// * `database_url` - PostgreSQL connection string
/// * `max_connections` - Upper bound on pooled connections
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    tracing::debug!("Creating database connection pool");

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(3))
        .connect(database_url)
        .await?;

    tracing::info!("Database connection pool created successfully");
    Ok(pool)
}

/// Run the embedded schema migrations
pub async fn run_migrations(pool: &PgPool) -> Result<(), StartupError> {
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Migrations completed successfully");
    Ok(())
}

/// Refuse to start when the default role row is missing.
///
/// Every sign-up with an unrecognized role tag lands on this row, so the
/// service cannot register anyone without it.
pub async fn ensure_default_role(pool: &PgPool) -> Result<(), StartupError> {
    let exists: Option<bool> =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM roles WHERE role = $1)")
            .bind(RoleType::DEFAULT.as_str())
            .fetch_one(pool)
            .await?;

    if !exists.unwrap_or(false) {
        return Err(StartupError::MissingDefaultRole(RoleType::DEFAULT));
    }

    tracing::debug!("Default role {} is present", RoleType::DEFAULT);
    Ok(())
}
