//! Environment-driven configuration.
//!
//! DESIGN
//! ======
//! Everything is read once at startup into a typed `Config`. Missing
//! required variables (session secret, cookie name, database URL) are
//! startup-fatal; the process must not begin serving without them.

use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_PUBLIC_DIR: &str = "public";
const DEFAULT_SESSION_TTL_SECS: u64 = 600;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("invalid {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Process configuration, loaded once from the environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Listening port.
    pub port: u16,
    /// Postgres connection string.
    pub database_url: String,
    /// Cookie-signing secrets. The first signs new cookies; all of them
    /// verify, so old secrets can be rotated out gradually.
    pub session_secrets: Vec<String>,
    /// Session cookie name. Custom name to avoid fingerprinting.
    pub cookie_name: String,
    /// Directory holding static assets and page fragments.
    pub public_dir: PathBuf,
    /// Inactivity window before a session expires.
    pub session_ttl_secs: u64,
    /// When true, every non-public route requires an authenticated session.
    pub global_gate: bool,
    /// When true, `POST /api/dev/login` authenticates without credentials.
    pub dev_auth_bypass: bool,
}

impl Config {
    /// Load configuration from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value fails
    /// to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match std::env::var("PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .map_err(|_| ConfigError::Invalid { key: "PORT", value: raw })?,
            Err(_) => DEFAULT_PORT,
        };

        let database_url = required("DATABASE_URL")?;
        let session_secrets = parse_secrets(&required("SESSION_SECRET")?);
        if session_secrets.is_empty() {
            return Err(ConfigError::Missing("SESSION_SECRET"));
        }
        let cookie_name = required("SESSION_NAME")?;

        let public_dir = std::env::var("PUBLIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_PUBLIC_DIR));

        Ok(Self {
            port,
            database_url,
            session_secrets,
            cookie_name,
            public_dir,
            session_ttl_secs: env_parse("SESSION_TTL_SECS", DEFAULT_SESSION_TTL_SECS),
            global_gate: env_bool("GLOBAL_AUTH_GATE").unwrap_or(false),
            dev_auth_bypass: env_bool("DEV_AUTH_BYPASS").unwrap_or(false),
        })
    }

    /// Secret used to sign newly issued cookies.
    #[must_use]
    pub fn signing_secret(&self) -> &str {
        self.session_secrets.first().map_or("", String::as_str)
    }

    #[must_use]
    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}

fn required(key: &'static str) -> Result<String, ConfigError> {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::Missing(key))
}

/// Split a comma-separated secret list, dropping empty entries.
#[must_use]
pub(crate) fn parse_secrets(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
        .collect()
}

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
