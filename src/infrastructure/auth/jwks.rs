//! Remote JSON Web Key Set provider with a TTL cache

use std::fmt::Debug;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use jsonwebtoken::jwk::{AlgorithmParameters, Jwk, JwkSet, KeyAlgorithm};
use jsonwebtoken::{Algorithm, DecodingKey};
use moka::future::Cache;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::keys::{KeyProvider, VerificationKey};
use crate::domain::auth::AuthError;

/// Cache slot for a key published without a `kid`
const UNNAMED_KEY: &str = "";

/// Default minimum time between two fetches triggered by unknown `kid`s
pub const DEFAULT_MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(10);

/// Fetches signing keys from `{issuer}/.well-known/jwks.json` or any JWKS URL.
///
/// Keys are cached by `kid` for the configured TTL. An unknown `kid`
/// triggers one refetch before the token is rejected, which picks up
/// rotated keys without waiting for expiry. Refetches are serialized and
/// at most one succeeds per `min_refresh_interval`; misses inside that
/// window are rejected without contacting the endpoint.
pub struct RemoteJwksProvider {
    client: reqwest::Client,
    url: String,
    cache: Cache<String, VerificationKey>,
    min_refresh_interval: Duration,
    last_refresh: Mutex<Option<Instant>>,
}

impl Debug for RemoteJwksProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteJwksProvider")
            .field("url", &self.url)
            .field("cached_keys", &self.cache.entry_count())
            .finish()
    }
}

impl RemoteJwksProvider {
    pub fn new(url: impl Into<String>, ttl: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            client,
            url: url.into(),
            cache: Cache::builder().time_to_live(ttl).build(),
            min_refresh_interval: DEFAULT_MIN_REFRESH_INTERVAL,
            last_refresh: Mutex::new(None),
        }
    }

    pub fn with_min_refresh_interval(mut self, interval: Duration) -> Self {
        self.min_refresh_interval = interval;
        self
    }

    async fn refresh(&self) -> Result<(), AuthError> {
        debug!(url = %self.url, "Fetching JWKS");

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                warn!(url = %self.url, error = %e, "JWKS fetch failed");
                AuthError::key_set_unavailable(format!("Unable to fetch signing keys: {}", e))
            })?;

        let key_set: JwkSet = response.json().await.map_err(|e| {
            warn!(url = %self.url, error = %e, "JWKS response is not a key set");
            AuthError::key_set_unavailable(format!("Unable to parse signing keys: {}", e))
        })?;

        let mut loaded = 0usize;
        for jwk in &key_set.keys {
            let kid = jwk.common.key_id.clone().unwrap_or_default();

            match verification_key(jwk) {
                Some(key) => {
                    self.cache.insert(kid, key).await;
                    loaded += 1;
                }
                None => warn!(kid = %kid, "Skipping unsupported JWK"),
            }
        }

        info!(url = %self.url, keys = loaded, "JWKS refreshed");
        Ok(())
    }
}

#[async_trait]
impl KeyProvider for RemoteJwksProvider {
    async fn key(&self, kid: Option<&str>) -> Result<VerificationKey, AuthError> {
        let kid = kid.unwrap_or(UNNAMED_KEY).to_string();

        if let Some(key) = self.cache.get(&kid).await {
            return Ok(key);
        }

        let mut last_refresh = self.last_refresh.lock().await;

        // another task may have refreshed while we waited
        if let Some(key) = self.cache.get(&kid).await {
            return Ok(key);
        }

        if let Some(at) = *last_refresh {
            if at.elapsed() < self.min_refresh_interval {
                debug!(kid = %kid, "Unknown key id; JWKS refreshed recently, not refetching");
                return Err(AuthError::invalid_signature(
                    "Unable to find the appropriate key",
                ));
            }
        }

        self.refresh().await?;
        *last_refresh = Some(Instant::now());
        drop(last_refresh);

        self.cache
            .get(&kid)
            .await
            .ok_or_else(|| AuthError::invalid_signature("Unable to find the appropriate key"))
    }
}

fn verification_key(jwk: &Jwk) -> Option<VerificationKey> {
    let algorithm = jwk_algorithm(jwk)?;
    let decoding_key = DecodingKey::from_jwk(jwk).ok()?;

    Some(VerificationKey {
        algorithm,
        decoding_key,
    })
}

fn jwk_algorithm(jwk: &Jwk) -> Option<Algorithm> {
    match jwk.common.key_algorithm {
        Some(KeyAlgorithm::HS256) => Some(Algorithm::HS256),
        Some(KeyAlgorithm::HS384) => Some(Algorithm::HS384),
        Some(KeyAlgorithm::HS512) => Some(Algorithm::HS512),
        Some(KeyAlgorithm::ES256) => Some(Algorithm::ES256),
        Some(KeyAlgorithm::ES384) => Some(Algorithm::ES384),
        Some(KeyAlgorithm::RS256) => Some(Algorithm::RS256),
        Some(KeyAlgorithm::RS384) => Some(Algorithm::RS384),
        Some(KeyAlgorithm::RS512) => Some(Algorithm::RS512),
        Some(KeyAlgorithm::PS256) => Some(Algorithm::PS256),
        Some(KeyAlgorithm::PS384) => Some(Algorithm::PS384),
        Some(KeyAlgorithm::PS512) => Some(Algorithm::PS512),
        Some(KeyAlgorithm::EdDSA) => Some(Algorithm::EdDSA),
        // encryption-only algorithms
        Some(_) => None,
        None => match &jwk.algorithm {
            AlgorithmParameters::RSA(_) => Some(Algorithm::RS256),
            AlgorithmParameters::EllipticCurve(_) => Some(Algorithm::ES256),
            AlgorithmParameters::OctetKeyPair(_) => Some(Algorithm::EdDSA),
            AlgorithmParameters::OctetKey(_) => Some(Algorithm::HS256),
            #[allow(unreachable_patterns)]
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
    use chrono::Duration as ChronoDuration;
    use rand::rngs::OsRng;
    use rsa::pkcs1::EncodeRsaPrivateKey;
    use rsa::traits::PublicKeyParts;
    use rsa::RsaPrivateKey;
    use std::sync::Arc;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::domain::auth::{AuthErrorKind, Permission, Role, TokenVerifier};
    use crate::infrastructure::auth::{JwtSigner, JwtVerifier, VerifierConfig};

    const ISSUER: &str = "https://bball.test/";
    const AUDIENCE: &str = "bball";

    struct TestKey {
        signer: JwtSigner,
        jwks: serde_json::Value,
    }

    fn rsa_key(kid: &str) -> TestKey {
        let private_key = RsaPrivateKey::new(&mut OsRng, 2048).unwrap();
        let pem = private_key
            .to_pkcs1_pem(rsa::pkcs1::LineEnding::LF)
            .unwrap();

        let signer = JwtSigner::rsa_pem(pem.as_bytes(), Algorithm::RS256, ISSUER, AUDIENCE)
            .unwrap()
            .with_key_id(kid);

        let jwks = serde_json::json!({
            "keys": [{
                "kty": "RSA",
                "use": "sig",
                "alg": "RS256",
                "kid": kid,
                "n": URL_SAFE_NO_PAD.encode(private_key.n().to_bytes_be()),
                "e": URL_SAFE_NO_PAD.encode(private_key.e().to_bytes_be()),
            }]
        });

        TestKey { signer, jwks }
    }

    fn verifier(provider: RemoteJwksProvider) -> JwtVerifier {
        JwtVerifier::new(
            Arc::new(provider),
            VerifierConfig {
                issuer: ISSUER.to_string(),
                audience: AUDIENCE.to_string(),
                leeway_secs: 0,
            },
        )
    }

    #[tokio::test]
    async fn test_verifies_token_with_remote_key() {
        let server = MockServer::start().await;
        let key = rsa_key("key-1");

        Mock::given(method("GET"))
            .and(path("/.well-known/jwks.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&key.jwks))
            .expect(1)
            .mount(&server)
            .await;

        let provider = RemoteJwksProvider::new(
            format!("{}/.well-known/jwks.json", server.uri()),
            Duration::from_secs(300),
        );
        let verifier = verifier(provider);

        let token = key
            .signer
            .sign("auth0|admin", &Role::Admin.permissions(), ChronoDuration::hours(1))
            .unwrap();

        // second verification is served from the cache
        for _ in 0..2 {
            let claims = verifier.verify(&token).await.unwrap();
            assert!(claims.has_permission(Permission::DeletePlayer));
        }
    }

    #[tokio::test]
    async fn test_unknown_kid_refetches_then_fails() {
        let server = MockServer::start().await;
        let published = rsa_key("published");
        let rogue = rsa_key("rogue");

        Mock::given(method("GET"))
            .and(path("/jwks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&published.jwks))
            .expect(2)
            .mount(&server)
            .await;

        let provider =
            RemoteJwksProvider::new(format!("{}/jwks", server.uri()), Duration::from_secs(300))
                .with_min_refresh_interval(Duration::ZERO);
        let verifier = verifier(provider);

        let good = published
            .signer
            .sign("auth0|admin", &Role::Admin.permissions(), ChronoDuration::hours(1))
            .unwrap();
        assert!(verifier.verify(&good).await.is_ok());

        let bad = rogue
            .signer
            .sign("auth0|admin", &Role::Admin.permissions(), ChronoDuration::hours(1))
            .unwrap();
        let err = verifier.verify(&bad).await.unwrap_err();
        assert_eq!(err.kind, AuthErrorKind::InvalidSignature);
    }

    #[tokio::test]
    async fn test_unknown_kids_do_not_refetch_within_interval() {
        let server = MockServer::start().await;
        let published = rsa_key("published");

        Mock::given(method("GET"))
            .and(path("/jwks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&published.jwks))
            .expect(1)
            .mount(&server)
            .await;

        let provider =
            RemoteJwksProvider::new(format!("{}/jwks", server.uri()), Duration::from_secs(300));
        let verifier = Arc::new(verifier(provider));

        let good = published
            .signer
            .sign("auth0|admin", &Role::Admin.permissions(), ChronoDuration::hours(1))
            .unwrap();
        assert!(verifier.verify(&good).await.is_ok());

        let forged = rsa_key("forged");
        let mut handles = Vec::new();
        for i in 0..5 {
            let token = forged
                .signer
                .clone()
                .with_key_id(format!("forged-{}", i))
                .sign("auth0|admin", &Role::Admin.permissions(), ChronoDuration::hours(1))
                .unwrap();
            let verifier = verifier.clone();
            handles.push(tokio::spawn(async move { verifier.verify(&token).await }));
        }

        for handle in handles {
            let err = handle.await.unwrap().unwrap_err();
            assert_eq!(err.kind, AuthErrorKind::InvalidSignature);
        }
    }

    #[tokio::test]
    async fn test_concurrent_misses_share_one_fetch() {
        let server = MockServer::start().await;
        let published = rsa_key("published");

        Mock::given(method("GET"))
            .and(path("/jwks"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&published.jwks))
            .expect(1)
            .mount(&server)
            .await;

        let provider = Arc::new(RemoteJwksProvider::new(
            format!("{}/jwks", server.uri()),
            Duration::from_secs(300),
        ));

        let mut handles = Vec::new();
        for _ in 0..5 {
            let provider = provider.clone();
            handles.push(tokio::spawn(async move {
                provider.key(Some("published")).await
            }));
        }

        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }
    }

    #[tokio::test]
    async fn test_unreachable_key_set() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/jwks"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let provider =
            RemoteJwksProvider::new(format!("{}/jwks", server.uri()), Duration::from_secs(300));

        let err = provider.key(Some("any")).await.unwrap_err();
        assert_eq!(err.kind, AuthErrorKind::KeySetUnavailable);
    }

    #[tokio::test]
    async fn test_invalid_key_set_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/jwks"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&server)
            .await;

        let provider =
            RemoteJwksProvider::new(format!("{}/jwks", server.uri()), Duration::from_secs(300));

        let err = provider.key(None).await.unwrap_err();
        assert_eq!(err.kind, AuthErrorKind::KeySetUnavailable);
    }

    #[test]
    fn test_algorithm_inferred_from_key_type() {
        let jwk: Jwk = serde_json::from_value(serde_json::json!({
            "kty": "oct",
            "k": URL_SAFE_NO_PAD.encode(b"secret"),
        }))
        .unwrap();

        assert_eq!(jwk_algorithm(&jwk), Some(Algorithm::HS256));
    }
}
