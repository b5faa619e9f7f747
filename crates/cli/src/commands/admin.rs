//! Admin account management command.

use telar_admin::db::AdminUserRepository;
use telar_admin::services::{AuthError, hash_password, validate_password};
use telar_core::types::Email;

use super::{CommandError, connect};

/// Create an admin user with the given email, name, and password.
///
/// # Errors
///
/// Returns `CommandError::Auth` if the email is malformed, the password is
/// too weak, or hashing fails, `CommandError::Repository` if the email is
/// already taken, or a database error otherwise.
pub async fn create_user(email: &str, name: &str, password: &str) -> Result<(), CommandError> {
    let email = Email::parse(email).map_err(AuthError::InvalidEmail)?;
    validate_password(password)?;
    let password_hash = hash_password(password)?;

    let pool = connect().await?;
    let user = AdminUserRepository::new(&pool)
        .create(email.as_str(), name, &password_hash)
        .await?;

    tracing::info!(email = %user.email, "Admin user created");
    Ok(())
}
