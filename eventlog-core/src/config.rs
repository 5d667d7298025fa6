use std::env;

use crate::errors::ConfigError;

/// Rows per page when `EVENTLOG_PAGE_SIZE` is not set.
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// Bind address used when `EVENTLOG_HTTP_BIND` is not set.
pub const DEFAULT_HTTP_BIND: &str = "0.0.0.0:8080";

/// Runtime environment used by the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Lenient parse; anything unrecognised is development.
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "production" | "prod" => Environment::Production,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Development,
        }
    }
}

/// Process-wide configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct CoreConfig {
    pub database_url: String,
    pub environment: Environment,
    pub http_bind: String,
    pub page_size: u32,
}

impl CoreConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| match key {
            "DATABASE_URL" => env::var("DATABASE_URL").ok(),
            other => env::var(format!("EVENTLOG_{other}")).ok(),
        })
    }

    /// Loads configuration from env vars prefixed with the provided value (e.g. `BROWSER_`).
    pub fn from_env_with_prefix(prefix: &str) -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let config = Self::from_lookup(|key| env::var(format!("{prefix}{key}")).ok());
        config.map_err(|err| match err {
            ConfigError::MissingEnvVar(key) => ConfigError::MissingEnvVar(format!("{prefix}{key}")),
            other => other,
        })
    }

    /// Builds the configuration from an arbitrary key lookup.
    ///
    /// Keys are unprefixed: `DATABASE_URL`, `ENV`, `HTTP_BIND`, `PAGE_SIZE`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".into()))?;

        let environment = lookup("ENV")
            .map(|raw| Environment::parse(&raw))
            .unwrap_or_default();

        let http_bind = lookup("HTTP_BIND").unwrap_or_else(|| DEFAULT_HTTP_BIND.to_string());

        let page_size = match lookup("PAGE_SIZE") {
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(value) if value > 0 => value,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "PAGE_SIZE".into(),
                        value: raw,
                    })
                }
            },
            None => DEFAULT_PAGE_SIZE,
        };

        Ok(Self {
            database_url,
            environment,
            http_bind,
            page_size,
        })
    }

    /// Returns the store connection URL.
    pub fn database_url(&self) -> &str {
        &self.database_url
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn loads_defaults() {
        let cfg = CoreConfig::from_lookup(lookup(&[("DATABASE_URL", "sqlite::memory:")]))
            .expect("config should load");
        assert_eq!(cfg.environment, Environment::Development);
        assert_eq!(cfg.http_bind, DEFAULT_HTTP_BIND);
        assert_eq!(cfg.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn requires_database_url() {
        let err = CoreConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(key) if key == "DATABASE_URL"));
    }

    #[test]
    fn reads_overrides() {
        let cfg = CoreConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite:events.db"),
            ("ENV", "prod"),
            ("HTTP_BIND", "127.0.0.1:9000"),
            ("PAGE_SIZE", "25"),
        ]))
        .expect("config should load");
        assert_eq!(cfg.environment, Environment::Production);
        assert_eq!(cfg.http_bind, "127.0.0.1:9000");
        assert_eq!(cfg.page_size, 25);
    }

    #[test]
    fn unknown_environment_is_development() {
        assert_eq!(Environment::parse("STAGE"), Environment::Staging);
        assert_eq!(Environment::parse("qa"), Environment::Development);
    }

    #[test]
    fn rejects_zero_page_size() {
        let err = CoreConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "sqlite:events.db"),
            ("PAGE_SIZE", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }
}
