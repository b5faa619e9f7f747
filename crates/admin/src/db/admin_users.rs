//! Admin user persistence.

use sqlx::PgPool;

use telar_core::types::AdminUserId;

use super::{RepositoryError, map_unique_violation};
use crate::models::AdminUser;

/// Repository for admin users.
pub struct AdminUserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> AdminUserRepository<'a> {
    /// Create a new admin user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Look up an admin user by email (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<AdminUser>, RepositoryError> {
        let user = sqlx::query_as::<_, AdminUser>(
            r"
            SELECT id, email, name, password_hash, created_at
            FROM admin.admin_user
            WHERE email = LOWER($1)
            ",
        )
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Look up an admin user by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_id(&self, id: AdminUserId) -> Result<Option<AdminUser>, RepositoryError> {
        let user = sqlx::query_as::<_, AdminUser>(
            r"
            SELECT id, email, name, password_hash, created_at
            FROM admin.admin_user
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    /// Create an admin user with an already-hashed password.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Duplicate` if the email is taken, or
    /// `RepositoryError::Database` for any other failure.
    pub async fn create(
        &self,
        email: &str,
        name: &str,
        password_hash: &str,
    ) -> Result<AdminUser, RepositoryError> {
        let user = sqlx::query_as::<_, AdminUser>(
            r"
            INSERT INTO admin.admin_user (email, name, password_hash)
            VALUES (LOWER($1), $2, $3)
            RETURNING id, email, name, password_hash, created_at
            ",
        )
        .bind(email)
        .bind(name)
        .bind(password_hash)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_unique_violation(e, "email"))?;

        Ok(user)
    }
}
