//! BBall Manager API
//!
//! A role-gated HTTP API over basketball teams and players:
//! - Bearer token verification (shared secret, RSA public key or remote JWKS)
//! - Per-route permission checks for admin and analyst roles
//! - In-memory or PostgreSQL storage

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;
use std::time::Duration;

use api::state::AppState;
use config::{AuthConfig, DatabaseConfig};
use domain::{DomainError, TokenVerifier};
use infrastructure::auth::{
    parse_algorithm, JwtVerifier, KeyProvider, RemoteJwksProvider, StaticKeyProvider,
    VerifierConfig,
};
use infrastructure::storage::{seed_demo_data, RosterStorage, StorageFactory};
use tracing::info;

/// Build the token verifier from the configured key source.
///
/// Key sources are tried in order: `jwks_url`, `public_key_pem`, `secret`.
pub fn create_token_verifier(auth: &AuthConfig) -> Result<Arc<dyn TokenVerifier>, DomainError> {
    let keys: Arc<dyn KeyProvider> = if let Some(url) = non_empty(&auth.jwks_url) {
        info!(url = %url, "Verifying tokens against remote JWKS");
        Arc::new(
            RemoteJwksProvider::new(url, Duration::from_secs(auth.jwks_cache_ttl_secs))
                .with_min_refresh_interval(Duration::from_secs(auth.jwks_min_refresh_secs)),
        )
    } else if let Some(pem) = non_empty(&auth.public_key_pem) {
        info!(algorithm = %auth.algorithm, "Verifying tokens with configured public key");
        Arc::new(StaticKeyProvider::rsa_pem(
            pem.as_bytes(),
            parse_algorithm(&auth.algorithm)?,
        )?)
    } else if let Some(secret) = non_empty(&auth.secret) {
        info!(algorithm = %auth.algorithm, "Verifying tokens with shared secret");
        Arc::new(StaticKeyProvider::hmac(
            secret.as_bytes(),
            parse_algorithm(&auth.algorithm)?,
        )?)
    } else {
        return Err(DomainError::configuration(
            "No token key configured: set auth.jwks_url, auth.public_key_pem or auth.secret",
        ));
    };

    Ok(Arc::new(JwtVerifier::new(
        keys,
        VerifierConfig {
            issuer: auth.issuer.clone(),
            audience: auth.audience.clone(),
            leeway_secs: auth.leeway_secs,
        },
    )))
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

/// Open the configured storage backend, seeding the demo roster into an
/// empty store when `seed_demo_data` is set
pub async fn open_storage(database: &DatabaseConfig) -> Result<RosterStorage, DomainError> {
    let storage = StorageFactory::create(&database.storage_config()?).await?;

    if database.seed_demo_data && storage.teams().list().await?.is_empty() {
        seed_demo_data(&storage).await?;
    }

    Ok(storage)
}

/// Create the application state with all services initialized
pub async fn create_app_state(config: &AppConfig) -> Result<AppState, DomainError> {
    let verifier = create_token_verifier(&config.auth)?;
    let storage = open_storage(&config.database).await?;

    info!(backend = ?storage.storage_type(), "Storage ready");

    Ok(AppState::new(storage, verifier))
}
