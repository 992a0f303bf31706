use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("APP_NAME must not be empty")]
    MissingAppName,

    #[error("APP_VERSION must start with 'v', got {0:?}")]
    InvalidVersion(String),

    #[error("HTTP_PORT must be a port number, got {0:?}")]
    InvalidPort(String),

    #[error("JWT_SECRET_ACCESS_TOKEN must not be empty")]
    MissingJwtSecret,

    #[error("PAGINATION_MAX_PAGE_SIZE must be a positive integer or 'none', got {0:?}")]
    InvalidMaxPageSize(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub app: HttpAppConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub pagination: PaginationConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpAppConfig {
    pub name: String,
    pub version: String,
    pub debug: bool,
    /// Kept as text so a bad value surfaces through `validate` instead of
    /// silently falling back.
    pub port: String,
    pub allow_origins: Vec<String>,
    pub allow_methods: Vec<String>,
    pub allow_headers: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Full connection URL. When unset one is composed from the parts below.
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
    /// Prepended to every entity table name.
    pub prefix: String,
    pub max_connections: u32,
    pub connection_timeout: u64,
    pub auto_migrate: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    pub jwt_issuer: String,
    pub bcrypt_cost: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    /// Positive integer, or `none` (or empty) for no cap. Read through
    /// `AppConfig::max_page_size`.
    pub max_page_size: String,
    pub debug_logging: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let environment = match lookup("APP_ENV").as_deref() {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_overrides(lookup)
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        fn list(v: &str) -> Vec<String> {
            v.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect()
        }

        // App overrides
        if let Some(v) = lookup("APP_NAME") {
            self.app.name = v;
        }
        if let Some(v) = lookup("APP_VERSION") {
            self.app.version = v;
        }
        if let Some(v) = lookup("APP_DEBUG") {
            self.app.debug = v.parse().unwrap_or(self.app.debug);
        }
        if let Some(v) = lookup("HTTP_PORT") {
            self.app.port = v;
        }
        if let Some(v) = lookup("HTTP_ALLOW_ORIGINS") {
            self.app.allow_origins = list(&v);
        }
        if let Some(v) = lookup("HTTP_ALLOW_METHODS") {
            self.app.allow_methods = list(&v);
        }
        if let Some(v) = lookup("HTTP_ALLOW_HEADERS") {
            self.app.allow_headers = list(&v);
        }

        // Database overrides
        if let Some(v) = lookup("DATABASE_URL").filter(|v| !v.is_empty()) {
            self.database.url = Some(v);
        }
        if let Some(v) = lookup("DB_HOST") {
            self.database.host = v;
        }
        if let Some(v) = lookup("DB_PORT") {
            self.database.port = v.parse().unwrap_or(self.database.port);
        }
        if let Some(v) = lookup("DB_DATABASE") {
            self.database.database = v;
        }
        if let Some(v) = lookup("DB_USERNAME") {
            self.database.username = v;
        }
        if let Some(v) = lookup("DB_PASSWORD") {
            self.database.password = v;
        }
        if let Some(v) = lookup("DB_PREFIX") {
            self.database.prefix = v;
        }
        if let Some(v) = lookup("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Some(v) = lookup("DATABASE_CONNECTION_TIMEOUT") {
            self.database.connection_timeout = v.parse().unwrap_or(self.database.connection_timeout);
        }
        if let Some(v) = lookup("DATABASE_AUTO_MIGRATE") {
            self.database.auto_migrate = v.parse().unwrap_or(self.database.auto_migrate);
        }

        // Auth overrides
        if let Some(v) = lookup("JWT_SECRET_ACCESS_TOKEN") {
            self.auth.jwt_secret = v;
        }
        if let Some(v) = lookup("JWT_EXPIRY_HOURS") {
            self.auth.jwt_expiry_hours = v.parse().unwrap_or(self.auth.jwt_expiry_hours);
        }
        if let Some(v) = lookup("JWT_ISSUER") {
            self.auth.jwt_issuer = v;
        }
        if let Some(v) = lookup("BCRYPT_COST") {
            self.auth.bcrypt_cost = v.parse().unwrap_or(self.auth.bcrypt_cost);
        }

        // Pagination overrides
        if let Some(v) = lookup("PAGINATION_MAX_PAGE_SIZE") {
            self.pagination.max_page_size = v;
        }
        if let Some(v) = lookup("PAGINATION_DEBUG_LOGGING") {
            self.pagination.debug_logging = v.parse().unwrap_or(self.pagination.debug_logging);
        }

        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.app.name.trim().is_empty() {
            return Err(ConfigError::MissingAppName);
        }
        if !self.app.version.starts_with('v') {
            return Err(ConfigError::InvalidVersion(self.app.version.clone()));
        }
        self.http_port()?;
        if self.auth.jwt_secret.is_empty() {
            return Err(ConfigError::MissingJwtSecret);
        }
        self.max_page_size()?;
        Ok(())
    }

    /// `None` disables the cap.
    pub fn max_page_size(&self) -> Result<Option<i64>, ConfigError> {
        let raw = self.pagination.max_page_size.trim();
        if raw.is_empty() || raw.eq_ignore_ascii_case("none") {
            return Ok(None);
        }
        match raw.parse::<i64>() {
            Ok(max) if max >= 1 => Ok(Some(max)),
            _ => Err(ConfigError::InvalidMaxPageSize(self.pagination.max_page_size.clone())),
        }
    }

    pub fn http_port(&self) -> Result<u16, ConfigError> {
        self.app
            .port
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidPort(self.app.port.clone()))
    }

    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            app: HttpAppConfig {
                name: "user-crud-api".to_string(),
                version: format!("v{}", env!("CARGO_PKG_VERSION")),
                debug: true,
                port: "8080".to_string(),
                allow_origins: vec!["*".to_string()],
                allow_methods: vec![],
                allow_headers: vec![],
            },
            database: DatabaseConfig {
                url: None,
                host: "localhost".to_string(),
                port: 5432,
                database: "user_crud".to_string(),
                username: "postgres".to_string(),
                password: "postgres".to_string(),
                prefix: String::new(),
                max_connections: 10,
                connection_timeout: 30,
                auto_migrate: false,
            },
            auth: AuthConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24 * 7, // 1 week
                jwt_issuer: "user-crud-api".to_string(),
                bcrypt_cost: 10,
            },
            pagination: PaginationConfig {
                max_page_size: "1000".to_string(),
                debug_logging: true,
            },
        }
    }

    fn staging() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Staging;
        config.app.debug = false;
        config.app.allow_origins = vec!["https://staging.example.com".to_string()];
        config.database.max_connections = 20;
        config.database.connection_timeout = 10;
        config.database.auto_migrate = true;
        config.auth.jwt_expiry_hours = 24;
        config.auth.bcrypt_cost = 12;
        config.pagination = PaginationConfig {
            max_page_size: "500".to_string(),
            debug_logging: false,
        };
        config
    }

    fn production() -> Self {
        let mut config = Self::development();
        config.environment = Environment::Production;
        config.app.debug = false;
        config.app.allow_origins = vec!["https://app.example.com".to_string()];
        config.database.max_connections = 50;
        config.database.connection_timeout = 5;
        config.auth.jwt_expiry_hours = 4;
        config.auth.bcrypt_cost = 12;
        config.pagination = PaginationConfig {
            max_page_size: "100".to_string(),
            debug_logging: false,
        };
        config
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_pairs(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_default_development_config() {
        let config = from_pairs(&[]);
        assert_eq!(config.environment, Environment::Development);
        assert!(config.app.debug);
        assert_eq!(config.max_page_size(), Ok(Some(1000)));
        assert!(!config.database.auto_migrate);
    }

    #[test]
    fn test_default_production_config() {
        let config = from_pairs(&[("APP_ENV", "production")]);
        assert!(config.is_production());
        assert_eq!(config.max_page_size(), Ok(Some(100)));
        assert!(!config.app.debug);
    }

    #[test]
    fn staging_auto_migrates() {
        assert!(from_pairs(&[("APP_ENV", "stage")]).database.auto_migrate);
    }

    #[test]
    fn env_overrides_apply() {
        let config = from_pairs(&[
            ("HTTP_PORT", "9000"),
            ("HTTP_ALLOW_ORIGINS", "http://a.test, http://b.test,"),
            ("DB_PREFIX", "app_"),
            ("DB_PORT", "not-a-port"),
            ("PAGINATION_MAX_PAGE_SIZE", "none"),
            ("JWT_SECRET_ACCESS_TOKEN", "s3cret"),
        ]);
        assert_eq!(config.http_port().unwrap(), 9000);
        assert_eq!(config.app.allow_origins, vec!["http://a.test", "http://b.test"]);
        assert_eq!(config.database.prefix, "app_");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.max_page_size(), Ok(None));
        assert_eq!(config.auth.jwt_secret, "s3cret");
    }

    #[test]
    fn validate_requires_secret() {
        assert_eq!(from_pairs(&[]).validate(), Err(ConfigError::MissingJwtSecret));
        assert!(from_pairs(&[("JWT_SECRET_ACCESS_TOKEN", "x")]).validate().is_ok());
    }

    #[test]
    fn validate_checks_version_prefix() {
        let config = from_pairs(&[("APP_VERSION", "1.0.0"), ("JWT_SECRET_ACCESS_TOKEN", "x")]);
        assert_eq!(config.validate(), Err(ConfigError::InvalidVersion("1.0.0".into())));
    }

    #[test]
    fn validate_checks_port_and_name() {
        let config = from_pairs(&[("HTTP_PORT", "http"), ("JWT_SECRET_ACCESS_TOKEN", "x")]);
        assert_eq!(config.validate(), Err(ConfigError::InvalidPort("http".into())));

        let config = from_pairs(&[("APP_NAME", " "), ("JWT_SECRET_ACCESS_TOKEN", "x")]);
        assert_eq!(config.validate(), Err(ConfigError::MissingAppName));
    }

    #[test]
    fn max_page_size_rejects_typos_and_non_positive_values() {
        for raw in ["1OO", "-5", "0", "ten"] {
            let config = from_pairs(&[("PAGINATION_MAX_PAGE_SIZE", raw), ("JWT_SECRET_ACCESS_TOKEN", "x")]);
            assert_eq!(
                config.validate(),
                Err(ConfigError::InvalidMaxPageSize(raw.into())),
                "{raw}"
            );
        }
    }

    #[test]
    fn max_page_size_accepts_none_empty_and_padded_values() {
        for raw in ["none", "NONE", "", " 250 "] {
            let config = from_pairs(&[("PAGINATION_MAX_PAGE_SIZE", raw), ("JWT_SECRET_ACCESS_TOKEN", "x")]);
            assert!(config.validate().is_ok(), "{raw}");
        }
        let config = from_pairs(&[("PAGINATION_MAX_PAGE_SIZE", " 250 ")]);
        assert_eq!(config.max_page_size(), Ok(Some(250)));
    }
}
