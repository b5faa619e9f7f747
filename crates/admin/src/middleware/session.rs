//! Session middleware configuration for the admin panel.
//!
//! Sets up `PostgreSQL`-backed sessions using tower-sessions with stricter
//! security settings than the storefront (SameSite=Strict, 24h expiry).

use sqlx::PgPool;
use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::PostgresStore;

use crate::config::AdminConfig;

/// Session cookie name for the admin panel.
pub const SESSION_COOKIE_NAME: &str = "telar_admin_session";

/// Session expiry time in seconds (24 hours, stricter than storefront).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Create the session layer with `PostgreSQL` store.
///
/// The session table lives in the `admin` schema, separate from the
/// storefront's shopper sessions.
///
/// # Panics
///
/// Panics if the schema or table name is rejected, which cannot happen with
/// the hardcoded values.
#[must_use]
pub fn create_session_layer(
    pool: &PgPool,
    config: &AdminConfig,
) -> SessionManagerLayer<PostgresStore> {
    let store = PostgresStore::new(pool.clone())
        .with_schema_name("admin")
        .expect("valid schema name")
        .with_table_name("session")
        .expect("valid table name");

    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
}
