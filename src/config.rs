//! Runtime settings read from the process environment (and `.env` via dotenvy).

use secrecy::Secret;
use std::env;
use std::fmt;
use std::time::Duration;

use crate::reconciliation::EditPolicy;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000";
const DEFAULT_AI_SERVICE_URL: &str = "http://localhost:8000";
const DEFAULT_AI_TIMEOUT_SECS: u64 = 10;
const DEFAULT_MAX_CONNECTIONS: u32 = 20;
const DEFAULT_MIN_CONNECTIONS: u32 = 5;

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{key} must be set"),
            ConfigError::Invalid { key, value } => write!(f, "{key} has invalid value '{value}'"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Application settings, constructed once in `main` and handed to components.
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub jwt_secret: Secret<String>,
    pub host: String,
    pub port: u16,
    /// Comma-separated list of allowed CORS origins
    pub cors_allowed_origins: String,
    pub ai_service_url: String,
    pub ai_timeout: Duration,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub edit_policy: EditPolicy,
    pub run_migrations: bool,
}

impl Settings {
    /// Read settings from the real process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from an arbitrary key lookup so tests don't have to touch `std::env`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| lookup(key).ok_or(ConfigError::Missing(key));

        let reconcile_on_edit = parse_or(&lookup, "RECONCILE_ON_EDIT", false)?;

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: Secret::new(required("JWT_SECRET")?),
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: parse_or(&lookup, "PORT", DEFAULT_PORT)?,
            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string()),
            ai_service_url: lookup("AI_SERVICE_URL")
                .unwrap_or_else(|| DEFAULT_AI_SERVICE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            ai_timeout: Duration::from_secs(parse_or(
                &lookup,
                "AI_TIMEOUT_SECS",
                DEFAULT_AI_TIMEOUT_SECS,
            )?),
            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?,
            db_min_connections: parse_or(&lookup, "DB_MIN_CONNECTIONS", DEFAULT_MIN_CONNECTIONS)?,
            edit_policy: if reconcile_on_edit {
                EditPolicy::Reconcile
            } else {
                EditPolicy::Ignore
            },
            run_migrations: parse_or(&lookup, "RUN_MIGRATIONS", true)?,
        })
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_applied() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/finance"),
            ("JWT_SECRET", "secret"),
        ]))
        .expect("Should build settings");

        assert_eq!(settings.port, 8080);
        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.ai_service_url, "http://localhost:8000");
        assert_eq!(settings.ai_timeout, Duration::from_secs(10));
        assert_eq!(settings.edit_policy, EditPolicy::Ignore);
        assert!(settings.run_migrations);
        assert_eq!(settings.jwt_secret.expose_secret(), "secret");
    }

    #[test]
    fn test_missing_database_url() {
        let result = Settings::from_lookup(lookup_from(&[("JWT_SECRET", "secret")]));
        assert!(matches!(result, Err(ConfigError::Missing("DATABASE_URL"))));
    }

    #[test]
    fn test_invalid_port_rejected() {
        let result = Settings::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/finance"),
            ("JWT_SECRET", "secret"),
            ("PORT", "eighty"),
        ]));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid { key: "PORT", .. })
        ));
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_lookup(lookup_from(&[
            ("DATABASE_URL", "postgres://localhost/finance"),
            ("JWT_SECRET", "secret"),
            ("PORT", "5000"),
            ("AI_SERVICE_URL", "http://ai:8000/"),
            ("RECONCILE_ON_EDIT", "true"),
            ("RUN_MIGRATIONS", "false"),
        ]))
        .expect("Should build settings");

        assert_eq!(settings.port, 5000);
        assert_eq!(settings.ai_service_url, "http://ai:8000");
        assert_eq!(settings.edit_policy, EditPolicy::Reconcile);
        assert!(!settings.run_migrations);
    }
}
