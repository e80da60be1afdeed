use serde::Deserialize;

use crate::domain::DomainError;
use crate::infrastructure::storage::{PostgresConfig, StorageConfig, StorageType};

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub backend: StorageType,
    /// Falls back to `DATABASE_URL` when unset
    pub url: Option<String>,
    pub max_connections: u32,
    /// Insert the demo roster at startup when storage is empty
    pub seed_demo_data: bool,
}

/// Token verification settings.
///
/// Exactly one key source is used, in order of preference: `jwks_url`,
/// `public_key_pem`, `secret`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub issuer: String,
    pub audience: String,
    pub algorithm: String,
    pub secret: Option<String>,
    pub public_key_pem: Option<String>,
    pub jwks_url: Option<String>,
    pub jwks_cache_ttl_secs: u64,
    /// Minimum gap between refetches triggered by unknown key ids
    pub jwks_min_refresh_secs: u64,
    pub leeway_secs: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StorageType::InMemory,
            url: None,
            max_connections: 10,
            seed_demo_data: false,
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            issuer: "https://bball.local/".to_string(),
            audience: "bball".to_string(),
            algorithm: "HS256".to_string(),
            secret: None,
            public_key_pem: None,
            jwks_url: None,
            jwks_cache_ttl_secs: 600,
            jwks_min_refresh_secs: 10,
            leeway_secs: 0,
        }
    }
}

impl DatabaseConfig {
    /// Resolve the storage backend to open
    pub fn storage_config(&self) -> Result<StorageConfig, DomainError> {
        match self.backend {
            StorageType::InMemory => Ok(StorageConfig::InMemory),
            StorageType::Postgres => {
                let url = self.url.as_deref().filter(|url| !url.is_empty()).ok_or_else(|| {
                    DomainError::configuration(
                        "database.url (or DATABASE_URL) is required for the postgres backend",
                    )
                })?;

                Ok(StorageConfig::Postgres(
                    PostgresConfig::new(url).with_max_connections(self.max_connections),
                ))
            }
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        if config.database.url.is_none() {
            config.database.url = std::env::var("DATABASE_URL").ok();
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::{Config, File, FileFormat};

    fn from_toml(toml: &str) -> AppConfig {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = from_toml("");

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.database.backend, StorageType::InMemory);
        assert_eq!(config.auth.algorithm, "HS256");
        assert!(config.auth.secret.is_none());
    }

    #[test]
    fn test_sections_override_defaults() {
        let config = from_toml(
            r#"
            [server]
            port = 5000

            [logging]
            level = "debug"
            format = "json"

            [database]
            backend = "postgres"
            url = "postgres://localhost/bball"
            max_connections = 3

            [auth]
            issuer = "https://tenant.auth0.com/"
            audience = "bball-api"
            algorithm = "RS256"
            jwks_url = "https://tenant.auth0.com/.well-known/jwks.json"
            "#,
        );

        assert_eq!(config.server.port, 5000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.database.backend, StorageType::Postgres);
        assert_eq!(config.auth.audience, "bball-api");
        assert_eq!(config.auth.jwks_cache_ttl_secs, 600);
        assert_eq!(config.auth.jwks_min_refresh_secs, 10);

        match config.database.storage_config().unwrap() {
            StorageConfig::Postgres(pg) => {
                assert_eq!(pg.url, "postgres://localhost/bball");
                assert_eq!(pg.max_connections, 3);
            }
            other => panic!("Expected postgres, got {:?}", other),
        }
    }

    #[test]
    fn test_postgres_requires_url() {
        let database = DatabaseConfig {
            backend: StorageType::Postgres,
            ..Default::default()
        };

        assert!(matches!(
            database.storage_config(),
            Err(DomainError::Configuration { .. })
        ));
    }

    #[test]
    fn test_memory_backend_ignores_url() {
        let config = from_toml("[database]\nbackend = \"memory\"\nseed_demo_data = true\n");

        assert!(config.database.seed_demo_data);
        assert!(matches!(
            config.database.storage_config().unwrap(),
            StorageConfig::InMemory
        ));
    }
}
