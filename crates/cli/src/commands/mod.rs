//! CLI command implementations.

pub mod admin;
pub mod migrate;
pub mod seed;

use sqlx::PgPool;

/// Errors shared by the commands.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Auth error: {0}")]
    Auth(#[from] telar_admin::services::AuthError),

    #[error("Repository error: {0}")]
    Repository(#[from] telar_admin::db::RepositoryError),
}

/// Connect to the database named by `TELAR_DATABASE_URL` (or `DATABASE_URL`).
pub(crate) async fn connect() -> Result<PgPool, CommandError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("TELAR_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map_err(|_| CommandError::MissingEnvVar("TELAR_DATABASE_URL"))?;

    Ok(PgPool::connect(&database_url).await?)
}
