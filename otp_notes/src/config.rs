//! Central configuration for the otp_notes crate
//!
//! All settings are read once at process start by [`Settings::from_env`] and then
//! handed to the components that need them. Nothing in this crate looks up the
//! environment after that point.

use chrono::Duration;
use std::env;
use std::fmt::Display;
use std::ops::RangeInclusive;
use std::str::FromStr;
use thiserror::Error;

const DEV_JWT_SECRET: &str = "default_secret_key_change_in_production";

const OTP_TTL_MINUTES_RANGE: RangeInclusive<i64> = 1..=24 * 60;
const OTP_PURGE_INTERVAL_SECS_RANGE: RangeInclusive<u64> = 1..=24 * 60 * 60;
const MAX_SESSION_TTL_DAYS: i64 = 365;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Unsupported {key}: {value}")]
    Unsupported { key: String, value: String },
}

/// Process-wide settings, constructed once and passed by reference
#[derive(Debug, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub data_store: DataStoreSettings,
    pub cache_store: CacheStoreSettings,
    pub session: SessionSettings,
    pub mail: MailSettings,
    pub google: GoogleSettings,
    pub otp: OtpSettings,
}

#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub port: u16,
    /// Prefix under which `/auth` and `/notes` are mounted, e.g. "/api"
    pub route_prefix: String,
    pub cors_allowed_origin: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataStoreKind {
    Sqlite,
    Postgres,
}

impl FromStr for DataStoreKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sqlite" => Ok(Self::Sqlite),
            "postgres" => Ok(Self::Postgres),
            other => Err(ConfigError::Unsupported {
                key: "GENERIC_DATA_STORE_TYPE".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DataStoreSettings {
    pub kind: DataStoreKind,
    pub url: String,
    pub table_prefix: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStoreKind {
    Memory,
    Redis,
}

impl FromStr for CacheStoreKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "memory" => Ok(Self::Memory),
            "redis" => Ok(Self::Redis),
            other => Err(ConfigError::Unsupported {
                key: "GENERIC_CACHE_STORE_TYPE".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CacheStoreSettings {
    pub kind: CacheStoreKind,
    pub url: String,
}

#[derive(Clone)]
pub struct SessionSettings {
    pub jwt_secret: String,
    pub expires_in: Duration,
}

impl std::fmt::Debug for SessionSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionSettings")
            .field("jwt_secret", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailTransportKind {
    Smtp,
    Memory,
}

impl FromStr for MailTransportKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "smtp" => Ok(Self::Smtp),
            "memory" => Ok(Self::Memory),
            other => Err(ConfigError::Unsupported {
                key: "MAIL_TRANSPORT_TYPE".to_string(),
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Clone)]
pub struct MailSettings {
    pub transport: MailTransportKind,
    pub host: String,
    pub port: Option<u16>,
    /// Implicit TLS when true, opportunistic STARTTLS otherwise
    pub secure: bool,
    pub user: Option<String>,
    pub password: Option<String>,
    pub from_name: String,
}

impl std::fmt::Debug for MailSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailSettings")
            .field("transport", &self.transport)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("secure", &self.secure)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("from_name", &self.from_name)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct GoogleSettings {
    pub client_id: String,
    pub jwks_url: String,
}

#[derive(Debug, Clone)]
pub struct OtpSettings {
    pub ttl_minutes: i64,
    pub purge_interval: std::time::Duration,
}

impl OtpSettings {
    /// Code lifetime, clamped to one minute up to one day
    pub fn ttl(&self) -> Duration {
        let (min, max) = OTP_TTL_MINUTES_RANGE.into_inner();
        Duration::minutes(self.ttl_minutes.clamp(min, max))
    }
}

impl Settings {
    /// Build settings from the process environment
    ///
    /// Callers are expected to have loaded any `.env` file beforehand.
    pub fn from_env() -> Result<Self, ConfigError> {
        let jwt_secret = match env::var("JWT_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                tracing::warn!("JWT_SECRET is not set, falling back to a development secret");
                DEV_JWT_SECRET.to_string()
            }
        };

        let google_client_id = env::var("GOOGLE_CLIENT_ID").unwrap_or_default();
        if google_client_id.is_empty() {
            tracing::warn!("GOOGLE_CLIENT_ID is not set, Google sign-in will reject every token");
        }

        Ok(Self {
            server: ServerSettings {
                port: parse_var("PORT", 5000)?,
                route_prefix: normalize_prefix(&env_or("API_ROUTE_PREFIX", "")),
                cors_allowed_origin: non_empty_var("CORS_ALLOWED_ORIGIN"),
            },
            data_store: DataStoreSettings {
                kind: env_or("GENERIC_DATA_STORE_TYPE", "sqlite").parse()?,
                url: env_or("GENERIC_DATA_STORE_URL", "sqlite:./notes.db"),
                table_prefix: env_or("DB_TABLE_PREFIX", "notes_"),
            },
            cache_store: CacheStoreSettings {
                kind: env_or("GENERIC_CACHE_STORE_TYPE", "memory").parse()?,
                url: env_or("GENERIC_CACHE_STORE_URL", ""),
            },
            session: SessionSettings {
                jwt_secret,
                expires_in: parse_duration(&env_or("JWT_EXPIRES_IN", "1h")).ok_or_else(|| {
                    ConfigError::InvalidValue {
                        key: "JWT_EXPIRES_IN".to_string(),
                        value: env_or("JWT_EXPIRES_IN", "1h"),
                    }
                })?,
            },
            mail: MailSettings {
                transport: env_or("MAIL_TRANSPORT_TYPE", "smtp").parse()?,
                host: env_or("EMAIL_HOST", "smtp.gmail.com"),
                port: match non_empty_var("EMAIL_PORT") {
                    Some(value) => Some(value.parse().map_err(|_| ConfigError::InvalidValue {
                        key: "EMAIL_PORT".to_string(),
                        value,
                    })?),
                    None => None,
                },
                secure: env_or("EMAIL_SECURE", "false") == "true",
                user: non_empty_var("EMAIL_USER"),
                password: non_empty_var("EMAIL_PASS"),
                from_name: env_or("EMAIL_FROM_NAME", "OTP Service"),
            },
            google: GoogleSettings {
                client_id: google_client_id,
                jwks_url: env_or(
                    "GOOGLE_JWKS_URL",
                    "https://www.googleapis.com/oauth2/v3/certs",
                ),
            },
            otp: OtpSettings {
                ttl_minutes: parse_var_in("OTP_TTL_MINUTES", 5, OTP_TTL_MINUTES_RANGE)?,
                purge_interval: std::time::Duration::from_secs(parse_var_in(
                    "OTP_PURGE_INTERVAL_SECS",
                    60,
                    OTP_PURGE_INTERVAL_SECS_RANGE,
                )?),
            },
        })
    }

    /// Settings for an isolated in-process instance: in-memory SQLite,
    /// in-memory cache and a mailer that only records messages
    pub fn in_memory() -> Self {
        Self {
            server: ServerSettings {
                port: 0,
                route_prefix: String::new(),
                cors_allowed_origin: None,
            },
            data_store: DataStoreSettings {
                kind: DataStoreKind::Sqlite,
                url: "sqlite::memory:".to_string(),
                table_prefix: "notes_".to_string(),
            },
            cache_store: CacheStoreSettings {
                kind: CacheStoreKind::Memory,
                url: String::new(),
            },
            session: SessionSettings {
                jwt_secret: DEV_JWT_SECRET.to_string(),
                expires_in: Duration::hours(1),
            },
            mail: MailSettings {
                transport: MailTransportKind::Memory,
                host: "localhost".to_string(),
                port: None,
                secure: false,
                user: None,
                password: None,
                from_name: "OTP Service".to_string(),
            },
            google: GoogleSettings {
                client_id: "test-client-id".to_string(),
                jwks_url: "https://www.googleapis.com/oauth2/v3/certs".to_string(),
            },
            otp: OtpSettings {
                ttl_minutes: 5,
                purge_interval: std::time::Duration::from_secs(60),
            },
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.is_empty())
}

fn parse_var<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError> {
    match non_empty_var(key) {
        Some(value) => value.parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value,
        }),
        None => Ok(default),
    }
}

fn parse_var_in<T>(key: &str, default: T, range: RangeInclusive<T>) -> Result<T, ConfigError>
where
    T: FromStr + PartialOrd + Display,
{
    let value = parse_var(key, default)?;
    if range.contains(&value) {
        Ok(value)
    } else {
        Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        })
    }
}

fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Parse a lifetime such as "90", "30s", "15m", "1h" or "7d"
///
/// A bare number is taken as seconds. Zero, negative and lifetimes longer
/// than a year are rejected.
pub(crate) fn parse_duration(input: &str) -> Option<Duration> {
    let input = input.trim();
    let (digits, unit) = match input.char_indices().last()? {
        (idx, c) if c.is_ascii_alphabetic() => (&input[..idx], Some(c)),
        _ => (input, None),
    };
    let amount: i64 = digits.trim().parse().ok()?;
    if amount <= 0 {
        return None;
    }
    let duration = match unit {
        None | Some('s') => Duration::try_seconds(amount),
        Some('m') => Duration::try_minutes(amount),
        Some('h') => Duration::try_hours(amount),
        Some('d') => Duration::try_days(amount),
        _ => None,
    }?;
    (duration <= Duration::days(MAX_SESSION_TTL_DAYS)).then_some(duration)
}
