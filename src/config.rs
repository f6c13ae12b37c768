//! Dashboard configuration parsed from environment variables.
//!
//! DESIGN
//! ======
//! `from_env` reads the process environment; `from_lookup` takes any key
//! lookup so tests never mutate shared env state.

use std::path::PathBuf;

use axum::http::StatusCode;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_BACKEND_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_BACKEND_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_REJECT_STATUSES: &str = "401";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid PORT: {0}")]
    InvalidPort(String),
    #[error("invalid BACKEND_URL: {0}")]
    InvalidBackendUrl(String),
    #[error("invalid status code in SESSION_REJECT_STATUSES: {0}")]
    InvalidStatus(String),
    #[error("unknown BACKEND_LOGIN_FIELD: {0} (expected 'email' or 'username')")]
    InvalidLoginField(String),
}

/// Where list and statistics data comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendMode {
    /// In-memory literals, mock login.
    Mock,
    /// Thin proxy to an external REST backend.
    Proxy { base_url: String },
}

/// Field name the backend expects for the login identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginField {
    Email,
    Username,
}

impl LoginField {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Username => "username",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

/// Response statuses that mean "the session is no longer valid".
///
/// Backends disagree on whether 422 belongs here, so the set is configured
/// rather than hard-coded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectionPolicy {
    statuses: Vec<StatusCode>,
}

impl RejectionPolicy {
    #[must_use]
    pub fn new(statuses: Vec<StatusCode>) -> Self {
        Self { statuses }
    }

    /// Parse a comma-separated status list such as `"401,422"`.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let mut statuses = Vec::new();
        for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let status = part
                .parse::<u16>()
                .ok()
                .and_then(|code| StatusCode::from_u16(code).ok())
                .ok_or_else(|| ConfigError::InvalidStatus(part.to_owned()))?;
            if !statuses.contains(&status) {
                statuses.push(status);
            }
        }
        if statuses.is_empty() {
            return Err(ConfigError::InvalidStatus(raw.to_owned()));
        }
        Ok(Self { statuses })
    }

    #[must_use]
    pub fn is_rejection(&self, status: StatusCode) -> bool {
        self.statuses.contains(&status)
    }

    #[must_use]
    pub fn statuses(&self) -> &[StatusCode] {
        &self.statuses
    }
}

impl Default for RejectionPolicy {
    fn default() -> Self {
        Self { statuses: vec![StatusCode::UNAUTHORIZED] }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub port: u16,
    pub backend: BackendMode,
    pub login_field: LoginField,
    pub rejection: RejectionPolicy,
    pub timeouts: BackendTimeouts,
    pub cookie_secure: bool,
    pub verify_token_expiry: bool,
    pub static_dir: PathBuf,
}

impl DashboardConfig {
    /// Build typed config from the process environment.
    ///
    /// Optional:
    /// - `PORT`: default 3000
    /// - `BACKEND_URL`: proxy mode when set, mock mode otherwise
    /// - `BACKEND_LOGIN_FIELD`: `email` (default) or `username`
    /// - `SESSION_REJECT_STATUSES`: default `401`
    /// - `BACKEND_REQUEST_TIMEOUT_SECS`: default 30
    /// - `BACKEND_CONNECT_TIMEOUT_SECS`: default 10
    /// - `COOKIE_SECURE`: inferred from `BACKEND_URL`/`APP_ENV` when absent
    /// - `GATE_VERIFY_EXPIRY`: default true
    /// - `STATIC_DIR`: default `<crate>/static`
    ///
    /// # Errors
    ///
    /// Returns an error if any variable is set to an unusable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env`, reading values through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns an error if any value is unusable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let backend = match lookup("BACKEND_URL").map(|v| v.trim().trim_end_matches('/').to_owned()) {
            Some(url) if url.is_empty() => BackendMode::Mock,
            Some(url) => {
                if !(url.starts_with("http://") || url.starts_with("https://")) {
                    return Err(ConfigError::InvalidBackendUrl(url));
                }
                BackendMode::Proxy { base_url: url }
            }
            None => BackendMode::Mock,
        };

        let login_field = parse_login_field(lookup("BACKEND_LOGIN_FIELD").as_deref())?;
        let rejection = RejectionPolicy::parse(
            lookup("SESSION_REJECT_STATUSES")
                .as_deref()
                .unwrap_or(DEFAULT_REJECT_STATUSES),
        )?;
        let timeouts = BackendTimeouts {
            request_secs: parse_or(
                lookup("BACKEND_REQUEST_TIMEOUT_SECS"),
                DEFAULT_BACKEND_REQUEST_TIMEOUT_SECS,
            ),
            connect_secs: parse_or(
                lookup("BACKEND_CONNECT_TIMEOUT_SECS"),
                DEFAULT_BACKEND_CONNECT_TIMEOUT_SECS,
            ),
        };

        let cookie_secure = parse_bool(lookup("COOKIE_SECURE").as_deref()).unwrap_or_else(|| {
            let https_backend = matches!(&backend, BackendMode::Proxy { base_url } if base_url.starts_with("https://"));
            let production = lookup("APP_ENV").is_some_and(|env| env.trim().eq_ignore_ascii_case("production"));
            https_backend || production
        });
        let verify_token_expiry = parse_bool(lookup("GATE_VERIFY_EXPIRY").as_deref()).unwrap_or(true);

        let static_dir = lookup("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("static"));

        Ok(Self { port, backend, login_field, rejection, timeouts, cookie_secure, verify_token_expiry, static_dir })
    }
}

pub(crate) fn parse_bool(raw: Option<&str>) -> Option<bool> {
    raw.and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    })
}

fn parse_or<T>(raw: Option<String>, default: T) -> T
where
    T: std::str::FromStr,
{
    raw.and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn parse_login_field(raw: Option<&str>) -> Result<LoginField, ConfigError> {
    match raw.map(str::trim).unwrap_or("email") {
        "email" => Ok(LoginField::Email),
        "username" => Ok(LoginField::Username),
        other => Err(ConfigError::InvalidLoginField(other.to_owned())),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
