//! Storage factory for runtime backend selection

use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use crate::domain::player::PlayerRepository;
use crate::domain::team::TeamRepository;
use crate::domain::DomainError;

use super::in_memory::InMemoryRosterStore;
use super::postgres::{PostgresConfig, PostgresRosterStore};

/// Supported storage backends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum StorageType {
    /// In-memory storage (for testing/development)
    #[default]
    #[serde(rename = "memory", alias = "in_memory", alias = "in-memory")]
    InMemory,
    /// PostgreSQL storage
    #[serde(rename = "postgres", alias = "postgresql", alias = "pg")]
    Postgres,
}

/// Storage configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// In-memory storage configuration
    InMemory,
    /// PostgreSQL storage configuration
    Postgres(PostgresConfig),
}

impl StorageConfig {
    /// Creates a PostgreSQL configuration from a URL
    pub fn postgres_url(url: impl Into<String>) -> Self {
        Self::Postgres(PostgresConfig::new(url))
    }

    /// Returns the storage type
    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }
}

#[derive(Debug, Clone)]
enum Backend {
    InMemory(Arc<InMemoryRosterStore>),
    Postgres(Arc<PostgresRosterStore>),
}

/// Handle to the opened storage backend.
///
/// Constructed once at startup, shared through the application state and
/// closed on shutdown.
#[derive(Debug, Clone)]
pub struct RosterStorage {
    backend: Backend,
}

impl RosterStorage {
    /// Fresh, empty in-memory storage
    pub fn in_memory() -> Self {
        Self {
            backend: Backend::InMemory(Arc::new(InMemoryRosterStore::new())),
        }
    }

    pub fn storage_type(&self) -> StorageType {
        match &self.backend {
            Backend::InMemory(_) => StorageType::InMemory,
            Backend::Postgres(_) => StorageType::Postgres,
        }
    }

    pub fn teams(&self) -> Arc<dyn TeamRepository> {
        match &self.backend {
            Backend::InMemory(store) => store.clone() as Arc<dyn TeamRepository>,
            Backend::Postgres(store) => store.clone() as Arc<dyn TeamRepository>,
        }
    }

    pub fn players(&self) -> Arc<dyn PlayerRepository> {
        match &self.backend {
            Backend::InMemory(store) => store.clone() as Arc<dyn PlayerRepository>,
            Backend::Postgres(store) => store.clone() as Arc<dyn PlayerRepository>,
        }
    }

    /// Discard every row and recreate the schema
    pub async fn reset(&self) -> Result<(), DomainError> {
        match &self.backend {
            Backend::InMemory(store) => store.clear(),
            Backend::Postgres(store) => store.reset().await,
        }
    }

    /// Round-trip to the backend
    pub async fn ping(&self) -> Result<(), DomainError> {
        match &self.backend {
            Backend::InMemory(store) => TeamRepository::list(store.as_ref()).await.map(|_| ()),
            Backend::Postgres(store) => store.ping().await,
        }
    }

    /// Release connections held by the backend
    pub async fn close(&self) {
        if let Backend::Postgres(store) = &self.backend {
            store.close().await;
            info!("PostgreSQL pool closed");
        }
    }
}

/// Factory for opening storage backends
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    /// Opens the backend described by the configuration
    pub async fn create(config: &StorageConfig) -> Result<RosterStorage, DomainError> {
        let storage = match config {
            StorageConfig::InMemory => RosterStorage::in_memory(),
            StorageConfig::Postgres(pg_config) => {
                let store = PostgresRosterStore::connect(pg_config).await?;
                RosterStorage {
                    backend: Backend::Postgres(Arc::new(store)),
                }
            }
        };

        info!(backend = ?storage.storage_type(), "Storage opened");
        Ok(storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::team::NewTeam;

    #[derive(Deserialize)]
    struct Wrapper {
        backend: StorageType,
    }

    fn parse(value: &str) -> Option<StorageType> {
        serde_json::from_str::<Wrapper>(&format!(r#"{{"backend":"{}"}}"#, value))
            .ok()
            .map(|w| w.backend)
    }

    #[test]
    fn test_storage_type_names() {
        assert_eq!(parse("memory"), Some(StorageType::InMemory));
        assert_eq!(parse("in_memory"), Some(StorageType::InMemory));
        assert_eq!(parse("postgres"), Some(StorageType::Postgres));
        assert_eq!(parse("postgresql"), Some(StorageType::Postgres));
        assert_eq!(parse("pg"), Some(StorageType::Postgres));
        assert_eq!(parse("sqlite"), None);
    }

    #[test]
    fn test_storage_config_types() {
        assert_eq!(StorageConfig::InMemory.storage_type(), StorageType::InMemory);

        let postgres = StorageConfig::postgres_url("postgres://localhost/test");
        assert_eq!(postgres.storage_type(), StorageType::Postgres);
    }

    #[tokio::test]
    async fn test_in_memory_repositories_share_tables() {
        let storage = StorageFactory::create(&StorageConfig::InMemory).await.unwrap();

        let team = storage
            .teams()
            .create(NewTeam::new("Heat").unwrap())
            .await
            .unwrap();

        let player = crate::domain::player::NewPlayer::new(
            "Lebron James",
            "Small Forward",
            "6'9",
            Some(team.id()),
        )
        .unwrap();
        assert!(storage.players().create(player).await.is_ok());

        storage.ping().await.unwrap();
    }

    #[tokio::test]
    async fn test_reset_clears_in_memory_rows() {
        let storage = RosterStorage::in_memory();
        storage
            .teams()
            .create(NewTeam::new("Heat").unwrap())
            .await
            .unwrap();

        storage.reset().await.unwrap();

        assert!(storage.teams().list().await.unwrap().is_empty());
    }
}
