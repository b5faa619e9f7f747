//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `TELAR_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `TELAR_BASE_URL` - Public URL for the storefront
//! - `TELAR_SESSION_SECRET` - Session signing secret (min 32 chars, no placeholders)
//! - `TELAR_WHATSAPP_NUMBER` - Recipient for the checkout handoff (digits, country code first)
//!
//! ## Optional
//! - `TELAR_HOST` - Bind address (default: 127.0.0.1)
//! - `TELAR_STOREFRONT_PORT` - Listen port (default: 3000)
//! - `TELAR_FREE_SHIPPING_THRESHOLD` - COP subtotal for free shipping (default: 50000)
//! - `TELAR_SHIPPING_FEE` - Flat COP shipping fee below the threshold (default: 15000)
//! - `SENTRY_DSN` - Sentry error tracking DSN

use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use telar_core::checkout::ShippingPolicy;
use telar_core::types::Price;
use thiserror::Error;

const MIN_SESSION_SECRET_LENGTH: usize = 32;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-", "changeme", "replace", "placeholder", "example", "secret", "password", "xxx", "todo",
    "fixme", "insert",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Session signing secret
    pub session_secret: SecretString,
    /// WhatsApp number receiving checkout handoffs
    pub whatsapp_number: String,
    /// Shipping fee policy for the checkout summary
    pub shipping: ShippingPolicy,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid, or
    /// if the session secret fails validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("TELAR_DATABASE_URL")?;
        let host = parse_env("TELAR_HOST", "127.0.0.1")?;
        let port = parse_env("TELAR_STOREFRONT_PORT", "3000")?;
        let base_url = get_required_env("TELAR_BASE_URL")?;
        let session_secret = get_session_secret("TELAR_SESSION_SECRET")?;
        let whatsapp_number = get_whatsapp_number("TELAR_WHATSAPP_NUMBER")?;
        let shipping = shipping_policy_from_env()?;
        let sentry_dsn = get_optional_env("SENTRY_DSN");

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            session_secret,
            whatsapp_number,
            shipping,
            sentry_dsn,
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
pub(crate) fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
pub(crate) fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default, parsed into its target type.
pub(crate) fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    std::env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
pub(crate) fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Load and validate a session secret from environment.
pub(crate) fn get_session_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}

/// Validate that a secret is long enough and not a placeholder.
pub(crate) fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    if secret.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {MIN_SESSION_SECRET_LENGTH} characters (got {})",
                secret.len()
            ),
        ));
    }

    let lower = secret.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    Ok(())
}

/// Load and validate the WhatsApp recipient number.
///
/// The number is embedded in `wa.me` links, which accept digits only
/// (country code first, no plus sign or separators).
fn get_whatsapp_number(key: &str) -> Result<String, ConfigError> {
    let value = get_required_env(key)?;
    let digits: String = value.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < 8 {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            "expected a phone number with country code".to_string(),
        ));
    }
    Ok(digits)
}

fn shipping_policy_from_env() -> Result<ShippingPolicy, ConfigError> {
    let defaults = ShippingPolicy::default();
    let threshold: i64 = parse_env(
        "TELAR_FREE_SHIPPING_THRESHOLD",
        &defaults.free_threshold.as_minor().to_string(),
    )?;
    let fee: i64 = parse_env(
        "TELAR_SHIPPING_FEE",
        &defaults.flat_fee.as_minor().to_string(),
    )?;
    Ok(ShippingPolicy {
        free_threshold: Price::from_minor(threshold),
        flat_fee: Price::from_minor(fee),
    })
}

/// Whether the base URL implies HTTPS (used for cookie security flags).
#[must_use]
pub fn is_secure_base_url(base_url: &str) -> bool {
    base_url.starts_with("https://")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn secret_too_short_is_rejected() {
        let result = validate_secret_strength("short", "TEST_VAR");
        assert!(matches!(result, Err(ConfigError::InsecureSecret(_, _))));
    }

    #[test]
    fn placeholder_secret_is_rejected() {
        let result =
            validate_secret_strength("changeme-changeme-changeme-changeme", "TEST_VAR");
        assert!(result.is_err());
    }

    #[test]
    fn long_random_secret_is_accepted() {
        let result = validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6q", "TEST_VAR");
        assert!(result.is_ok());
    }

    #[test]
    fn base_url_scheme_detection() {
        assert!(is_secure_base_url("https://telar.shop"));
        assert!(!is_secure_base_url("http://localhost:3000"));
    }
}
