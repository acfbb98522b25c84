//! Server configuration parsed from environment variables.
//!
//! `main` loads an optional `.env` through `dotenvy` before calling
//! [`ShopConfig::from_env`], so either source works.

use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;
pub const DEFAULT_ADMIN_SESSION_TTL_HOURS: i64 = 24;
pub const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required env var {0}")]
    Missing(&'static str),
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Admin login credentials. Admin login is disabled when either is unset.
#[derive(Clone, PartialEq, Eq)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Where order notifications go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyConfig {
    /// Shop owner's WhatsApp number. Notifications are skipped when unset.
    pub whatsapp_number: Option<String>,
    /// Delivery webhook. Messages are only logged when unset.
    pub webhook_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopConfig {
    pub database_url: String,
    pub db_max_connections: u32,
    pub port: u16,
    /// HTML pages plus `static/` and `pkg/` asset directories.
    pub site_dir: PathBuf,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub admin: Option<AdminCredentials>,
    pub admin_session_ttl_hours: i64,
    pub cookie_secure: bool,
    pub notify: NotifyConfig,
    pub seed_sample_products: bool,
}

impl ShopConfig {
    /// Build typed config from environment variables.
    ///
    /// Required:
    /// - `DATABASE_URL`
    ///
    /// Optional:
    /// - `DB_MAX_CONNECTIONS`: default 5, at least 1
    /// - `PORT`: default 3000
    /// - `SITE_DIR`: default `../site` next to this crate
    /// - `UPLOAD_DIR`: default `$SITE_DIR/static/uploads`
    /// - `MAX_UPLOAD_BYTES`: default 16 MiB
    /// - `ADMIN_USERNAME` / `ADMIN_PASSWORD`: admin login disabled unless both set
    /// - `ADMIN_SESSION_TTL_HOURS`: default 24, at least 1
    /// - `COOKIE_SECURE`: default false
    /// - `WHATSAPP_NUMBER`, `WHATSAPP_WEBHOOK_URL`
    /// - `SEED_SAMPLE_PRODUCTS`: default true
    ///
    /// # Errors
    ///
    /// Returns an error if `DATABASE_URL` is missing or a numeric/boolean
    /// variable does not parse or is out of range.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = non_empty_var("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;
        let db_max_connections = env_parse_at_least("DB_MAX_CONNECTIONS", DEFAULT_DB_MAX_CONNECTIONS, 1)?;
        let port = env_parse("PORT", DEFAULT_PORT)?;

        let site_dir = non_empty_var("SITE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../site"));
        let upload_dir = non_empty_var("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| site_dir.join("static").join("uploads"));

        let admin = match (non_empty_var("ADMIN_USERNAME"), non_empty_var("ADMIN_PASSWORD")) {
            (Some(username), Some(password)) => Some(AdminCredentials { username, password }),
            _ => None,
        };

        Ok(Self {
            database_url,
            db_max_connections,
            port,
            site_dir,
            upload_dir,
            max_upload_bytes: env_parse("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            admin,
            admin_session_ttl_hours: env_parse_at_least(
                "ADMIN_SESSION_TTL_HOURS",
                DEFAULT_ADMIN_SESSION_TTL_HOURS,
                1,
            )?,
            cookie_secure: env_bool("COOKIE_SECURE")?.unwrap_or(false),
            notify: NotifyConfig {
                whatsapp_number: non_empty_var("WHATSAPP_NUMBER"),
                webhook_url: non_empty_var("WHATSAPP_WEBHOOK_URL"),
            },
            seed_sample_products: env_bool("SEED_SAMPLE_PRODUCTS")?.unwrap_or(true),
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

fn env_parse<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match non_empty_var(key) {
        None => Ok(default),
        Some(raw) => raw.parse::<T>().map_err(|_| ConfigError::Invalid { var: key, value: raw }),
    }
}

fn env_parse_at_least<T>(key: &'static str, default: T, min: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + std::fmt::Display,
{
    let value = env_parse(key, default)?;
    if value < min {
        return Err(ConfigError::Invalid { var: key, value: value.to_string() });
    }
    Ok(value)
}

pub(crate) fn env_bool(key: &'static str) -> Result<Option<bool>, ConfigError> {
    let Some(raw) = non_empty_var(key) else {
        return Ok(None);
    };
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" => Ok(Some(false)),
        _ => Err(ConfigError::Invalid { var: key, value: raw }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
