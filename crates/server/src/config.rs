//! Server configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! All variables are optional.
//!
//! - `PERKPASS_HOST` - Bind address (default: 127.0.0.1)
//! - `PERKPASS_PORT` - Listen port (default: 3000)
//! - `PERKPASS_DATA_DIR` - Directory for JSON blobs (default: in-memory only)
//! - `PERKPASS_APP_SCHEME` - Deep-link scheme of the mobile app (default: perkpass)
//! - `PERKPASS_SUBSCRIPTION_PRICE` - Monthly business subscription in USD (default: 9.99)
//! - `PERKPASS_PLATFORM_FEE_PERCENT` - Platform fee percentage (default: 10)
//! - `PERKPASS_WEBHOOK_SECRET` - Enables webhook signature checks (min 32 chars, high entropy)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use perkpass_core::{PlatformFee, Price};
use rust_decimal::Decimal;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;

const MIN_WEBHOOK_SECRET_LENGTH: usize = 32;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Where JSON blobs are mirrored; `None` keeps everything in memory
    pub data_dir: Option<PathBuf>,
    /// URL scheme the payment hand-off page redirects to
    pub app_scheme: String,
    /// Monthly business subscription price
    pub subscription_price: Price,
    /// Commission taken on business payments
    pub platform_fee: PlatformFee,
    /// Shared secret for payment webhook signatures
    pub webhook_secret: Option<SecretString>,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 3000,
            data_dir: None,
            app_scheme: "perkpass".to_string(),
            subscription_price: Price::from_cents(999),
            platform_fee: PlatformFee::new(10),
            webhook_secret: None,
            sentry_dsn: None,
            sentry_environment: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable cannot be parsed or the webhook
    /// secret fails validation (placeholder detection, length, entropy).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let defaults = Self::default();

        let host = match get_optional_env("PERKPASS_HOST") {
            Some(raw) => parse_env("PERKPASS_HOST", &raw)?,
            None => defaults.host,
        };
        let port = match get_optional_env("PERKPASS_PORT") {
            Some(raw) => parse_env("PERKPASS_PORT", &raw)?,
            None => defaults.port,
        };
        let subscription_price = match get_optional_env("PERKPASS_SUBSCRIPTION_PRICE") {
            Some(raw) => Price::new(parse_env::<Decimal>("PERKPASS_SUBSCRIPTION_PRICE", &raw)?),
            None => defaults.subscription_price,
        };
        let platform_fee = match get_optional_env("PERKPASS_PLATFORM_FEE_PERCENT") {
            Some(raw) => {
                let percent: u32 = parse_env("PERKPASS_PLATFORM_FEE_PERCENT", &raw)?;
                if percent > 100 {
                    return Err(ConfigError::InvalidEnvVar(
                        "PERKPASS_PLATFORM_FEE_PERCENT".to_string(),
                        format!("must be at most 100 (got {percent})"),
                    ));
                }
                PlatformFee::new(percent)
            }
            None => defaults.platform_fee,
        };

        let webhook_secret = get_optional_env("PERKPASS_WEBHOOK_SECRET")
            .map(|value| {
                let secret = SecretString::from(value);
                validate_webhook_secret(&secret, "PERKPASS_WEBHOOK_SECRET")?;
                Ok::<_, ConfigError>(secret)
            })
            .transpose()?;

        Ok(Self {
            host,
            port,
            data_dir: get_optional_env("PERKPASS_DATA_DIR").map(PathBuf::from),
            app_scheme: get_optional_env("PERKPASS_APP_SCHEME").unwrap_or(defaults.app_scheme),
            subscription_price,
            platform_fee,
            webhook_secret,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Deep link the payment hand-off page sends the app to.
    #[must_use]
    pub fn payment_success_link(&self) -> String {
        format!("{}://auth/payment-setup?success=true", self.app_scheme)
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable, treating blank values as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Parse an environment value, naming the variable on failure.
fn parse_env<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a webhook secret is long, not a placeholder, and random-looking.
fn validate_webhook_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_WEBHOOK_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_WEBHOOK_SECRET_LENGTH,
                value.len()
            ),
        ));
    }

    let lower = value.to_lowercase();
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(value);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}
