//! Configuration for the triage service.

use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;

use chrono::Duration;

use crate::error::{Result, TriageError};

/// Environment variable for the HTTP bind address
pub const ENV_BIND: &str = "FEVER_TRIAGE_BIND";
/// Environment variable for the Parquet snapshot file
pub const ENV_DATA_FILE: &str = "FEVER_TRIAGE_DATA_FILE";
/// Environment variable for the session lifetime in hours
pub const ENV_SESSION_TTL_HOURS: &str = "FEVER_TRIAGE_SESSION_TTL_HOURS";
/// Environment variable for the administrator username
pub const ENV_ADMIN_USERNAME: &str = "FEVER_TRIAGE_ADMIN_USERNAME";
/// Environment variable for the administrator password
pub const ENV_ADMIN_PASSWORD: &str = "FEVER_TRIAGE_ADMIN_PASSWORD";

/// Configuration for the triage service
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server listens on
    pub bind_address: SocketAddr,
    /// Parquet snapshot the record store loads from and persists to
    pub data_file: Option<PathBuf>,
    /// Session lifetime in hours
    pub session_ttl_hours: i64,
    /// Username of the built-in administrator
    pub admin_username: String,
    /// Password of the built-in administrator; no administrator when unset
    pub admin_password: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 3000)),
            data_file: None,
            session_ttl_hours: 12,
            admin_username: "admin".to_string(),
            admin_password: None,
        }
    }
}

impl AppConfig {
    /// Build a configuration from the process environment
    pub fn from_process_env() -> Result<Self> {
        Self::from_env(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    ///
    /// Unset or empty variables keep their defaults.
    pub fn from_env<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(bind) = get(ENV_BIND) {
            config.bind_address = bind
                .trim()
                .parse()
                .map_err(|_| TriageError::validation(ENV_BIND, format!("invalid address: {bind}")))?;
        }
        if let Some(path) = get(ENV_DATA_FILE) {
            config.data_file = Some(PathBuf::from(path));
        }
        if let Some(hours) = get(ENV_SESSION_TTL_HOURS) {
            config.session_ttl_hours = hours
                .trim()
                .parse::<i64>()
                .ok()
                .filter(|h| *h > 0)
                .ok_or_else(|| {
                    TriageError::validation(
                        ENV_SESSION_TTL_HOURS,
                        format!("expected a positive number of hours, got {hours}"),
                    )
                })?;
        }
        if let Some(username) = get(ENV_ADMIN_USERNAME) {
            config.admin_username = username.trim().to_string();
        }
        config.admin_password = get(ENV_ADMIN_PASSWORD);

        Ok(config)
    }

    /// Session lifetime as a duration
    #[must_use]
    pub fn session_ttl(&self) -> Duration {
        Duration::hours(self.session_ttl_hours)
    }
}

impl fmt::Display for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Triage Service Configuration:")?;
        writeln!(f, "  Bind Address: {}", self.bind_address)?;
        match &self.data_file {
            Some(path) => writeln!(f, "  Data File: {}", path.display())?,
            None => writeln!(f, "  Data File: (memory only)")?,
        }
        writeln!(f, "  Session TTL: {}h", self.session_ttl_hours)?;
        if self.admin_password.is_some() {
            writeln!(f, "  Administrator: {}", self.admin_username)?;
        } else {
            writeln!(f, "  Administrator: disabled")?;
        }
        Ok(())
    }
}
