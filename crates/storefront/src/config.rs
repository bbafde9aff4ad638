//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `BASE44_API_KEY` - API key sent with every backend request
//!
//! ## Optional
//! - `BASE44_BASE_URL` - Backend app URL (default: the Kiova app on base44.com)
//! - `BASE44_ACCESS_TOKEN` - Bearer token for the signed-in user
//! - `KIOVA_HOST` - Bind address (default: 127.0.0.1)
//! - `KIOVA_PORT` - Listen port (default: 3000)
//! - `KIOVA_BASE_URL` - Public URL for the storefront (default: `http://localhost:3000`)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment tag

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::SecretString;
use thiserror::Error;
use url::Url;

/// Backend app every request is sent to unless overridden.
pub const DEFAULT_BASE44_BASE_URL: &str =
    "https://app.base44.com/api/apps/690018f6927e32d11b8ea50f";

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.0;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "insert",
    "put-your",
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
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL for the storefront
    pub base_url: String,
    /// Base44 backend configuration
    pub base44: Base44Config,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment tag
    pub sentry_environment: Option<String>,
}

/// Base44 backend configuration.
///
/// Implements `Debug` manually to redact secret fields.
#[derive(Clone)]
pub struct Base44Config {
    /// App URL that entity and integration paths are resolved against
    pub base_url: Url,
    /// Static API key (sent as the `api_key` header)
    pub api_key: SecretString,
    /// Bearer token for the signed-in user, if any
    pub access_token: Option<SecretString>,
}

impl std::fmt::Debug for Base44Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Base44Config")
            .field("base_url", &self.base_url.as_str())
            .field("api_key", &"[REDACTED]")
            .field(
                "access_token",
                &self.access_token.as_ref().map(|_| "[REDACTED]"),
            )
            .finish()
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid,
    /// or if the API key looks like a placeholder.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let host = get_env_or_default("KIOVA_HOST", "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar("KIOVA_HOST".to_string(), e.to_string()))?;
        let port = get_env_or_default("KIOVA_PORT", "3000")
            .parse::<u16>()
            .map_err(|e| ConfigError::InvalidEnvVar("KIOVA_PORT".to_string(), e.to_string()))?;
        let base_url = get_env_or_default("KIOVA_BASE_URL", "http://localhost:3000");

        Ok(Self {
            host,
            port,
            base_url,
            base44: Base44Config::from_env()?,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Whether the public URL is served over HTTPS (drives secure cookies).
    #[must_use]
    pub fn is_https(&self) -> bool {
        self.base_url.starts_with("https://")
    }
}

impl Base44Config {
    /// Configuration for an app URL and API key, without an access token.
    ///
    /// The URL is treated as a directory so entity paths join below it.
    #[must_use]
    pub fn new(base_url: Url, api_key: impl Into<String>) -> Self {
        Self {
            base_url: with_trailing_slash(base_url),
            api_key: SecretString::from(api_key.into()),
            access_token: None,
        }
    }

    fn from_env() -> Result<Self, ConfigError> {
        let base_url = parse_base_url(
            "BASE44_BASE_URL",
            &get_env_or_default("BASE44_BASE_URL", DEFAULT_BASE44_BASE_URL),
        )?;

        Ok(Self {
            base_url,
            api_key: get_validated_secret("BASE44_API_KEY")?,
            access_token: get_optional_env("BASE44_ACCESS_TOKEN")
                .filter(|t| !t.trim().is_empty())
                .map(SecretString::from),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an absolute http(s) URL, normalizing it to end in a slash so that
/// relative endpoint paths join under it instead of replacing its last segment.
fn parse_base_url(var_name: &str, raw: &str) -> Result<Url, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar(var_name.to_string(), reason);

    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    Ok(with_trailing_slash(url))
}

/// `Url::join` replaces the last segment unless the path ends in `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
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
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
