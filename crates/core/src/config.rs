//! Runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into
//! the services. Nothing in this crate reads environment variables during
//! request handling, which keeps behaviour consistent across runtimes and
//! test harnesses.

use crate::error::{HospitalError, HospitalResult};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://hospital.db";
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";

/// Application configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct AppConfig {
    database_url: String,
    listen_addr: String,
}

impl AppConfig {
    /// Create a new `AppConfig`.
    ///
    /// # Errors
    ///
    /// Returns `HospitalError::Conflict` if either value is blank.
    pub fn new(database_url: String, listen_addr: String) -> HospitalResult<Self> {
        if database_url.trim().is_empty() {
            return Err(HospitalError::conflict("database_url cannot be empty"));
        }
        if listen_addr.trim().is_empty() {
            return Err(HospitalError::conflict("listen_addr cannot be empty"));
        }
        Ok(Self {
            database_url,
            listen_addr,
        })
    }

    /// Build the configuration from optional environment values, falling
    /// back to the defaults. The caller (the server binary) is the only
    /// place that touches `std::env`.
    pub fn from_env_values(
        database_url: Option<String>,
        listen_addr: Option<String>,
    ) -> HospitalResult<Self> {
        let database_url = database_url
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.into());
        let listen_addr = listen_addr
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.into());
        Self::new(database_url, listen_addr)
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn listen_addr(&self) -> &str {
        &self.listen_addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_values_uses_defaults_when_unset() {
        let cfg = AppConfig::from_env_values(None, None).expect("config should build");
        assert_eq!(cfg.database_url(), DEFAULT_DATABASE_URL);
        assert_eq!(cfg.listen_addr(), DEFAULT_LISTEN_ADDR);
    }

    #[test]
    fn test_from_env_values_ignores_blank_overrides() {
        let cfg = AppConfig::from_env_values(Some("   ".into()), Some("".into()))
            .expect("config should build");
        assert_eq!(cfg.database_url(), DEFAULT_DATABASE_URL);
        assert_eq!(cfg.listen_addr(), DEFAULT_LISTEN_ADDR);
    }

    #[test]
    fn test_from_env_values_keeps_overrides() {
        let cfg = AppConfig::from_env_values(
            Some("sqlite::memory:".into()),
            Some("127.0.0.1:8080".into()),
        )
        .expect("config should build");
        assert_eq!(cfg.database_url(), "sqlite::memory:");
        assert_eq!(cfg.listen_addr(), "127.0.0.1:8080");
    }
}
