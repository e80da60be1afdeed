//! Signing material used to verify tokens

use std::fmt::Debug;

use async_trait::async_trait;
use jsonwebtoken::{Algorithm, DecodingKey};

use crate::domain::auth::AuthError;
use crate::domain::DomainError;

/// A decoding key together with the algorithm it must be used with
#[derive(Clone)]
pub struct VerificationKey {
    pub algorithm: Algorithm,
    pub decoding_key: DecodingKey,
}

impl Debug for VerificationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationKey")
            .field("algorithm", &self.algorithm)
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

/// Source of verification keys, looked up by the token's `kid` header
#[async_trait]
pub trait KeyProvider: Send + Sync + Debug {
    async fn key(&self, kid: Option<&str>) -> Result<VerificationKey, AuthError>;
}

/// A single key supplied by configuration; the `kid` header is ignored
#[derive(Debug, Clone)]
pub struct StaticKeyProvider {
    key: VerificationKey,
}

impl StaticKeyProvider {
    /// Shared-secret key for HS256/HS384/HS512
    pub fn hmac(secret: &[u8], algorithm: Algorithm) -> Result<Self, DomainError> {
        if !is_hmac(algorithm) {
            return Err(DomainError::configuration(format!(
                "Algorithm {:?} cannot be used with a shared secret",
                algorithm
            )));
        }

        if secret.is_empty() {
            return Err(DomainError::configuration("Signing secret cannot be empty"));
        }

        Ok(Self {
            key: VerificationKey {
                algorithm,
                decoding_key: DecodingKey::from_secret(secret),
            },
        })
    }

    /// RSA public key in PEM format for RS256/RS384/RS512
    pub fn rsa_pem(pem: &[u8], algorithm: Algorithm) -> Result<Self, DomainError> {
        if !is_rsa(algorithm) {
            return Err(DomainError::configuration(format!(
                "Algorithm {:?} cannot be used with an RSA public key",
                algorithm
            )));
        }

        let decoding_key = DecodingKey::from_rsa_pem(pem).map_err(|e| {
            DomainError::configuration(format!("Failed to parse RSA public key: {}", e))
        })?;

        Ok(Self {
            key: VerificationKey {
                algorithm,
                decoding_key,
            },
        })
    }
}

#[async_trait]
impl KeyProvider for StaticKeyProvider {
    async fn key(&self, _kid: Option<&str>) -> Result<VerificationKey, AuthError> {
        Ok(self.key.clone())
    }
}

/// Parse an algorithm name such as `HS256` or `RS256`
pub fn parse_algorithm(name: &str) -> Result<Algorithm, DomainError> {
    name.parse::<Algorithm>()
        .map_err(|_| DomainError::configuration(format!("Unsupported algorithm: {}", name)))
}

pub(crate) fn is_hmac(algorithm: Algorithm) -> bool {
    matches!(
        algorithm,
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
    )
}

pub(crate) fn is_rsa(algorithm: Algorithm) -> bool {
    matches!(
        algorithm,
        Algorithm::RS256
            | Algorithm::RS384
            | Algorithm::RS512
            | Algorithm::PS256
            | Algorithm::PS384
            | Algorithm::PS512
    )
}
