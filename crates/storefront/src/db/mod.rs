//! Database operations for the shared Telar `PostgreSQL` database.
//!
//! # Schemas
//!
//! - `catalog` - categories, products, product images (written by the admin
//!   binary, read here)
//! - `tower_sessions` - session storage for the cart snapshot
//!
//! Queries are built at runtime (`query_as` / `QueryBuilder`) rather than
//! with the compile-time checked macros: the catalog predicate is dynamic,
//! and the workspace must build without a live database.
//!
//! # Migrations
//!
//! Migrations live in `migrations/` at the workspace root and run via:
//! ```bash
//! cargo run -p telar-cli -- migrate
//! ```

pub mod categories;
pub mod products;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub use categories::CategoryRepository;
pub use products::ProductRepository;

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Errors surfaced by the repositories.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// The underlying query failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
