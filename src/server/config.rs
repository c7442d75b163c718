//! Environment-based application configuration.
//!
//! `Config` is built exactly once, before anything touches the network, and is then shared
//! read-only through `AppState`. Mandatory settings that are missing or empty abort
//! startup; optional settings fall back to defaults but reject malformed values.

use std::{path::PathBuf, str::FromStr};

use sha2::{Digest, Sha512};
use tower_sessions::cookie::Key;

use crate::server::error::{config::ConfigError, AppError};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_PUBLIC_DIR: &str = "public";
const DEFAULT_SESSION_INACTIVITY_DAYS: i64 = 7;
const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub session_secret: String,

    pub port: u16,
    pub public_dir: PathBuf,
    pub session_inactivity_days: i64,
    pub secure_cookies: bool,
    pub max_body_bytes: usize,
}

impl Config {
    /// Loads the configuration from the process environment.
    ///
    /// # Returns
    /// - `Ok(Config)` - Every mandatory setting present and every optional setting valid
    /// - `Err(AppError::ConfigErr(_))` - A mandatory setting is missing or a value is malformed
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads the configuration through an arbitrary variable lookup.
    ///
    /// `from_env` delegates here; tests pass a map-backed lookup so they never mutate the
    /// real process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            database_url: required(&lookup, "DATABASE_URL")?,
            session_secret: required(&lookup, "SESSION_SECRET")?,
            port: optional(&lookup, "PORT", DEFAULT_PORT)?,
            public_dir: lookup("PUBLIC_DIR")
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PUBLIC_DIR)),
            session_inactivity_days: optional(
                &lookup,
                "SESSION_INACTIVITY_DAYS",
                DEFAULT_SESSION_INACTIVITY_DAYS,
            )?,
            secure_cookies: optional(&lookup, "SESSION_COOKIE_SECURE", false)?,
            max_body_bytes: optional(&lookup, "MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES)?,
        })
    }

    /// Derives the cookie signing key from the session secret.
    ///
    /// The secret is stretched with SHA-512 so any non-empty secret yields the 64 bytes
    /// the signing key requires.
    pub fn session_key(&self) -> Result<Key, AppError> {
        let digest = Sha512::digest(self.session_secret.as_bytes());

        Key::try_from(digest.as_slice())
            .map_err(|e| ConfigError::InvalidSessionKey(e.to_string()).into())
    }
}

fn required<F>(lookup: &F, name: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(name) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::MissingEnvVar(name.to_string())),
    }
}

fn optional<F, T>(lookup: &F, name: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(value) = lookup(name).filter(|value| !value.trim().is_empty()) else {
        return Ok(default);
    };

    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidEnvVar {
            name: name.to_string(),
            value,
            reason: e.to_string(),
        })
}
