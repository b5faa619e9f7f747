//! Database migration command.
//!
//! Migrations live in `migrations/` at the workspace root and cover all
//! three schemas (`catalog`, `admin`, `tower_sessions`) of the shared
//! database.

use super::{CommandError, connect};

/// Run all pending migrations.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or a migration
/// fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../../migrations").run(&pool).await?;

    tracing::info!("Migrations complete");
    Ok(())
}
