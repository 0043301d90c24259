// Startup error type
// Request-path errors live in auth::error; this covers bringing the service up

use thiserror::Error;

use crate::auth::RoleType;
use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("role {0} is not seeded in the roles table")]
    MissingDefaultRole(RoleType),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}
