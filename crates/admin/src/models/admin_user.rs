//! Admin user domain type.

use chrono::{DateTime, Utc};

use telar_core::types::AdminUserId;

/// An admin user.
///
/// The password hash is an argon2 PHC string; it never leaves this type
/// except into the verifier.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AdminUser {
    /// Unique admin user ID.
    pub id: AdminUserId,
    /// Admin's email address, stored lowercased.
    pub email: String,
    /// Admin's display name.
    pub name: String,
    /// Argon2 PHC-format password hash.
    pub password_hash: String,
    /// When the admin was created.
    pub created_at: DateTime<Utc>,
}
