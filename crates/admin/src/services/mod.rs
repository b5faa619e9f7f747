//! Business logic services for the admin panel.

pub mod auth;

pub use auth::{AuthError, AuthService, hash_password, validate_password};
