//! Process configuration parsed from environment variables.
//!
//! DESIGN
//! ======
//! Everything the server needs from its environment is read once in
//! `main` and handed to constructors as a plain value. `.env` files are
//! applied by `dotenvy` before [`AppConfig::from_env`] runs, so real
//! environment variables always win.

use std::path::PathBuf;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}={value:?}: {reason}")]
    Invalid { var: &'static str, value: String, reason: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub base_url: String,
    pub log_level: String,
    pub content_dir: PathBuf,
    pub static_dir: PathBuf,
    pub static_cache_id: String,
    pub admin_logins: Vec<String>,
    /// `(session id, login)` pairs signed in at startup.
    pub admin_sessions: Vec<(String, String)>,
    pub cookie_secure: bool,
}

impl AppConfig {
    /// Build config from the process environment.
    ///
    /// Optional (defaults in parentheses):
    /// - `HOST` (`0.0.0.0`), `PORT` (`8080`)
    /// - `BASE_URL` (`http://localhost:8080`)
    /// - `LOG_LEVEL` (`info`)
    /// - `CONTENT_DIR`, `STATIC_DIR` (`content/` and `static/` in the crate)
    /// - `STATIC_CACHE_ID` (crate version)
    /// - `ADMIN_LOGINS`: comma separated
    /// - `ADMIN_SESSIONS`: comma separated `session:login` pairs; every login
    ///   must appear in `ADMIN_LOGINS`
    /// - `COOKIE_SECURE`: inferred from the `BASE_URL` scheme
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a present variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary variable source.
    ///
    /// # Errors
    ///
    /// Same as [`AppConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_owned()).filter(|v| !v.is_empty());
        let crate_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));

        let port = match var("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
                var: "PORT",
                value: raw,
                reason: "expected a port number",
            })?,
            None => DEFAULT_PORT,
        };

        let base_url = var("BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_owned())
            .trim_end_matches('/')
            .to_owned();

        let static_cache_id = var("STATIC_CACHE_ID").unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_owned());
        if static_cache_id.contains('/') {
            return Err(ConfigError::Invalid {
                var: "STATIC_CACHE_ID",
                value: static_cache_id,
                reason: "must be a single path segment",
            });
        }

        let cookie_secure = match var("COOKIE_SECURE") {
            Some(raw) => parse_bool(&raw).ok_or(ConfigError::Invalid {
                var: "COOKIE_SECURE",
                value: raw,
                reason: "expected a boolean",
            })?,
            None => base_url.starts_with("https://"),
        };

        let admin_logins: Vec<String> = var("ADMIN_LOGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|login| !login.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();

        let admin_sessions = match var("ADMIN_SESSIONS") {
            Some(raw) => parse_sessions(&raw, &admin_logins)?,
            None => Vec::new(),
        };

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_owned()),
            port,
            base_url,
            log_level: var("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_owned()),
            content_dir: var("CONTENT_DIR").map_or_else(|| crate_dir.join("content"), PathBuf::from),
            static_dir: var("STATIC_DIR").map_or_else(|| crate_dir.join("static"), PathBuf::from),
            static_cache_id,
            admin_logins,
            admin_sessions,
            cookie_secure,
        })
    }

    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Path prefix static assets are served under, e.g. `/static/0.1.0`.
    #[must_use]
    pub fn static_prefix(&self) -> String {
        format!("/static/{}", self.static_cache_id)
    }
}

fn parse_sessions(raw: &str, admin_logins: &[String]) -> Result<Vec<(String, String)>, ConfigError> {
    let invalid = |reason| ConfigError::Invalid { var: "ADMIN_SESSIONS", value: raw.to_owned(), reason };

    let mut sessions: Vec<(String, String)> = Vec::new();
    for entry in raw.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
        let (session, login) = entry
            .split_once(':')
            .map(|(session, login)| (session.trim(), login.trim()))
            .filter(|(session, login)| !session.is_empty() && !login.is_empty())
            .ok_or_else(|| invalid("expected session:login pairs"))?;
        if !admin_logins.iter().any(|admin| admin == login) {
            return Err(invalid("login is not listed in ADMIN_LOGINS"));
        }
        if sessions.iter().any(|(existing, _)| existing == session) {
            return Err(invalid("session listed twice"));
        }
        sessions.push((session.to_owned(), login.to_owned()));
    }
    Ok(sessions)
}

pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
