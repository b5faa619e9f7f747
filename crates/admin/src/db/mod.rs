//! Database operations for the shared Telar `PostgreSQL` database.
//!
//! # Schemas
//!
//! - `catalog` - categories, products, product images (written here, read by
//!   the storefront)
//! - `admin` - admin users and admin sessions
//!
//! Queries are built at runtime (`query_as` / `QueryBuilder`) rather than
//! with the compile-time checked macros, so the workspace builds without a
//! live database.

pub mod admin_users;
pub mod categories;
pub mod products;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub use admin_users::AdminUserRepository;
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

    /// A unique constraint (slug or email) was violated.
    #[error("duplicate value for {0}")]
    Duplicate(&'static str),

    /// The row cannot be deleted while other rows reference it.
    #[error("{0} is still referenced")]
    StillReferenced(&'static str),
}

/// Map a sqlx error to `Duplicate` when it is a unique violation.
pub(crate) fn map_unique_violation(err: sqlx::Error, field: &'static str) -> RepositoryError {
    if let sqlx::Error::Database(db_err) = &err {
        // 23505 is PostgreSQL's unique_violation
        if db_err.code().as_deref() == Some("23505") {
            return RepositoryError::Duplicate(field);
        }
    }
    RepositoryError::Database(err)
}
