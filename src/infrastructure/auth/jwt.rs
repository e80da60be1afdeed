//! JWT verification and signing

use std::collections::BTreeSet;
use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, encode, Algorithm, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::keys::{is_hmac, is_rsa, KeyProvider};
use crate::domain::auth::{AuthError, Claims, Permission, TokenVerifier};
use crate::domain::DomainError;

/// `aud` may be a single string or an array of strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Audience {
    Single(String),
    Multiple(Vec<String>),
}

impl Audience {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::Single(aud) => vec![aud],
            Self::Multiple(aud) => aud,
        }
    }
}

/// JWT claims structure as carried in the token payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Subject
    pub sub: String,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: Audience,
    /// Issued at timestamp (Unix epoch)
    #[serde(default)]
    pub iat: i64,
    /// Expiration timestamp (Unix epoch)
    pub exp: i64,
    /// Granted permission strings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permissions: Option<Vec<String>>,
}

impl JwtClaims {
    fn into_claims(self) -> Result<Claims, AuthError> {
        let permissions = self
            .permissions
            .ok_or_else(|| AuthError::invalid_claims("Permissions not included in JWT"))?;

        Ok(Claims {
            subject: self.sub,
            issuer: self.iss,
            audience: self.aud.into_vec(),
            expires_at: self.exp,
            permissions: permissions.into_iter().collect::<BTreeSet<_>>(),
        })
    }
}

/// Expected issuer and audience of incoming tokens
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    pub issuer: String,
    pub audience: String,
    /// Clock skew tolerated on `exp`, in seconds
    pub leeway_secs: u64,
}

/// Verifies bearer tokens against keys from a [`KeyProvider`]
#[derive(Debug, Clone)]
pub struct JwtVerifier {
    keys: Arc<dyn KeyProvider>,
    config: VerifierConfig,
}

impl JwtVerifier {
    pub fn new(keys: Arc<dyn KeyProvider>, config: VerifierConfig) -> Self {
        Self { keys, config }
    }

    fn validation(&self, algorithm: Algorithm) -> Validation {
        let mut validation = Validation::new(algorithm);
        validation.leeway = self.config.leeway_secs;
        validation.set_issuer(&[self.config.issuer.as_str()]);
        validation.set_audience(&[self.config.audience.as_str()]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation
    }
}

#[async_trait]
impl TokenVerifier for JwtVerifier {
    async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let header = decode_header(token)
            .map_err(|_| AuthError::malformed("Unable to parse authentication token"))?;

        let key = self.keys.key(header.kid.as_deref()).await?;

        if header.alg != key.algorithm {
            return Err(AuthError::invalid_signature(format!(
                "Token signed with {:?}, expected {:?}",
                header.alg, key.algorithm
            )));
        }

        let data = decode::<JwtClaims>(token, &key.decoding_key, &self.validation(key.algorithm))
            .map_err(map_jwt_error)?;

        let claims = data.claims.into_claims()?;
        debug!(subject = %claims.subject, "Token verified");

        Ok(claims)
    }
}

fn map_jwt_error(err: jsonwebtoken::errors::Error) -> AuthError {
    match err.kind() {
        ErrorKind::ExpiredSignature => AuthError::expired(),
        ErrorKind::InvalidSignature
        | ErrorKind::InvalidAlgorithm
        | ErrorKind::InvalidAlgorithmName
        | ErrorKind::InvalidKeyFormat
        | ErrorKind::InvalidRsaKey(_)
        | ErrorKind::InvalidEcdsaKey
        | ErrorKind::RsaFailedSigning
        | ErrorKind::Crypto(_) => AuthError::invalid_signature("Token signature is invalid"),
        ErrorKind::InvalidIssuer => AuthError::invalid_claims("Incorrect issuer"),
        ErrorKind::InvalidAudience => AuthError::invalid_claims("Incorrect audience"),
        ErrorKind::InvalidSubject | ErrorKind::ImmatureSignature => {
            AuthError::invalid_claims("Incorrect claims")
        }
        ErrorKind::MissingRequiredClaim(claim) => {
            AuthError::invalid_claims(format!("Missing required claim: {}", claim))
        }
        ErrorKind::Json(_) => AuthError::invalid_claims("Incorrect claims"),
        _ => AuthError::malformed("Unable to parse authentication token"),
    }
}

/// Issues tokens in the same shape the verifier accepts
#[derive(Clone)]
pub struct JwtSigner {
    encoding_key: EncodingKey,
    algorithm: Algorithm,
    key_id: Option<String>,
    issuer: String,
    audience: String,
}

impl Debug for JwtSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtSigner")
            .field("algorithm", &self.algorithm)
            .field("key_id", &self.key_id)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("encoding_key", &"[hidden]")
            .finish()
    }
}

impl JwtSigner {
    /// Signer backed by a shared secret
    pub fn hmac(
        secret: &[u8],
        algorithm: Algorithm,
        issuer: impl Into<String>,
        audience: impl Into<String>,
    ) -> Result<Self, DomainError> {
        if !is_hmac(algorithm) || secret.is_empty() {
            return Err(DomainError::configuration(format!(
                "Cannot sign {:?} tokens with a shared secret",
                algorithm
            )));
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            algorithm,
            key_id: None,
            issuer: issuer.into(),
            audience: audience.into(),
        })
    }

    /// Signer backed by an RSA private key in PEM format
    pub fn rsa_pem(
        pem: &[u8],
        algorithm: Algorithm,
        issuer: impl Into<String>,
        audience: impl Into<String>,
    ) -> Result<Self, DomainError> {
        if !is_rsa(algorithm) {
            return Err(DomainError::configuration(format!(
                "Cannot sign {:?} tokens with an RSA key",
                algorithm
            )));
        }

        let encoding_key = EncodingKey::from_rsa_pem(pem).map_err(|e| {
            DomainError::configuration(format!("Failed to parse RSA private key: {}", e))
        })?;

        Ok(Self {
            encoding_key,
            algorithm,
            key_id: None,
            issuer: issuer.into(),
            audience: audience.into(),
        })
    }

    /// Set the `kid` header written into issued tokens
    pub fn with_key_id(mut self, key_id: impl Into<String>) -> Self {
        self.key_id = Some(key_id.into());
        self
    }

    /// Build claims for `subject` expiring after `ttl`
    pub fn claims_for<I, S>(&self, subject: &str, permissions: I, ttl: Duration) -> JwtClaims
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let now = Utc::now();

        JwtClaims {
            sub: subject.to_string(),
            iss: self.issuer.clone(),
            aud: Audience::Single(self.audience.clone()),
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            permissions: Some(permissions.into_iter().map(Into::into).collect()),
        }
    }

    /// Sign a token granting `permissions`
    pub fn sign(
        &self,
        subject: &str,
        permissions: &[Permission],
        ttl: Duration,
    ) -> Result<String, DomainError> {
        let claims = self.claims_for(subject, permissions.iter().map(|p| p.as_str()), ttl);
        self.sign_claims(&claims)
    }

    /// Sign an arbitrary claim set
    pub fn sign_claims(&self, claims: &JwtClaims) -> Result<String, DomainError> {
        let mut header = Header::new(self.algorithm);
        header.kid = self.key_id.clone();

        encode(&header, claims, &self.encoding_key)
            .map_err(|e| DomainError::internal(format!("Failed to sign token: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::auth::{AuthErrorKind, Role};
    use crate::infrastructure::auth::StaticKeyProvider;

    const SECRET: &[u8] = b"unit-test-secret";
    const ISSUER: &str = "https://bball.test/";
    const AUDIENCE: &str = "bball";

    fn signer() -> JwtSigner {
        JwtSigner::hmac(SECRET, Algorithm::HS256, ISSUER, AUDIENCE).unwrap()
    }

    fn verifier_with(secret: &[u8]) -> JwtVerifier {
        let keys = StaticKeyProvider::hmac(secret, Algorithm::HS256).unwrap();
        JwtVerifier::new(
            Arc::new(keys),
            VerifierConfig {
                issuer: ISSUER.to_string(),
                audience: AUDIENCE.to_string(),
                leeway_secs: 0,
            },
        )
    }

    fn verifier() -> JwtVerifier {
        verifier_with(SECRET)
    }

    #[tokio::test]
    async fn test_sign_and_verify() {
        let token = signer()
            .sign("auth0|admin", &Role::Admin.permissions(), Duration::hours(1))
            .unwrap();

        let claims = verifier().verify(&token).await.unwrap();

        assert_eq!(claims.subject, "auth0|admin");
        assert_eq!(claims.issuer, ISSUER);
        assert_eq!(claims.audience, vec![AUDIENCE.to_string()]);
        assert_eq!(claims.permissions.len(), Permission::ALL.len());
        assert!(claims.has_permission(Permission::DeleteTeam));
    }

    #[tokio::test]
    async fn test_verify_authorization_header() {
        let token = signer()
            .sign("auth0|analyst", &Role::Analyst.permissions(), Duration::hours(1))
            .unwrap();

        let header = format!("Bearer {}", token);
        let claims = verifier()
            .verify_authorization(Some(&header))
            .await
            .unwrap();

        assert!(claims.has_permission(Permission::ListTeams));
        assert!(!claims.has_permission(Permission::CreateTeam));
    }

    #[tokio::test]
    async fn test_wrong_secret() {
        let token = signer()
            .sign("auth0|admin", &Role::Admin.permissions(), Duration::hours(1))
            .unwrap();

        let err = verifier_with(b"another-secret").verify(&token).await.unwrap_err();
        assert_eq!(err.kind, AuthErrorKind::InvalidSignature);
    }

    #[tokio::test]
    async fn test_expired_token() {
        let token = signer()
            .sign("auth0|admin", &Role::Admin.permissions(), Duration::hours(-2))
            .unwrap();

        let err = verifier().verify(&token).await.unwrap_err();
        assert_eq!(err.kind, AuthErrorKind::Expired);
    }

    #[tokio::test]
    async fn test_wrong_audience() {
        let token = JwtSigner::hmac(SECRET, Algorithm::HS256, ISSUER, "someone-else")
            .unwrap()
            .sign("auth0|admin", &Role::Admin.permissions(), Duration::hours(1))
            .unwrap();

        let err = verifier().verify(&token).await.unwrap_err();
        assert_eq!(err.kind, AuthErrorKind::InvalidClaims);
    }

    #[tokio::test]
    async fn test_wrong_issuer() {
        let token = JwtSigner::hmac(SECRET, Algorithm::HS256, "https://evil.test/", AUDIENCE)
            .unwrap()
            .sign("auth0|admin", &Role::Admin.permissions(), Duration::hours(1))
            .unwrap();

        let err = verifier().verify(&token).await.unwrap_err();
        assert_eq!(err.kind, AuthErrorKind::InvalidClaims);
    }

    #[tokio::test]
    async fn test_missing_permissions_claim() {
        let signer = signer();
        let mut claims = signer.claims_for("auth0|admin", Vec::<String>::new(), Duration::hours(1));
        claims.permissions = None;
        let token = signer.sign_claims(&claims).unwrap();

        let err = verifier().verify(&token).await.unwrap_err();
        assert_eq!(err.kind, AuthErrorKind::InvalidClaims);
        assert_eq!(err.description, "Permissions not included in JWT");
    }

    #[tokio::test]
    async fn test_audience_array_accepted() {
        let signer = signer();
        let mut claims =
            signer.claims_for("auth0|admin", ["get:teams"], Duration::hours(1));
        claims.aud = Audience::Multiple(vec!["other".to_string(), AUDIENCE.to_string()]);
        let token = signer.sign_claims(&claims).unwrap();

        let verified = verifier().verify(&token).await.unwrap();
        assert_eq!(verified.audience.len(), 2);
    }

    #[tokio::test]
    async fn test_garbage_token() {
        let err = verifier().verify("not-a-jwt").await.unwrap_err();
        assert_eq!(err.kind, AuthErrorKind::MalformedHeader);
    }

    #[tokio::test]
    async fn test_algorithm_mismatch_rejected() {
        let token = JwtSigner::hmac(SECRET, Algorithm::HS512, ISSUER, AUDIENCE)
            .unwrap()
            .sign("auth0|admin", &Role::Admin.permissions(), Duration::hours(1))
            .unwrap();

        let err = verifier().verify(&token).await.unwrap_err();
        assert_eq!(err.kind, AuthErrorKind::InvalidSignature);
    }

    #[tokio::test]
    async fn test_rs256_with_static_public_key() {
        use rand::rngs::OsRng;
        use rsa::pkcs1::{EncodeRsaPrivateKey, EncodeRsaPublicKey};
        use rsa::RsaPrivateKey;

        let private_key = RsaPrivateKey::new(&mut OsRng, 2048).unwrap();
        let private_pem = private_key
            .to_pkcs1_pem(rsa::pkcs1::LineEnding::LF)
            .unwrap();
        let public_pem = private_key
            .to_public_key()
            .to_pkcs1_pem(rsa::pkcs1::LineEnding::LF)
            .unwrap();

        let signer = JwtSigner::rsa_pem(private_pem.as_bytes(), Algorithm::RS256, ISSUER, AUDIENCE)
            .unwrap()
            .with_key_id("rsa-1");
        let token = signer
            .sign("auth0|admin", &Role::Admin.permissions(), Duration::hours(1))
            .unwrap();

        let header = decode_header(&token).unwrap();
        assert_eq!(header.kid, Some("rsa-1".to_string()));

        let keys = StaticKeyProvider::rsa_pem(public_pem.as_bytes(), Algorithm::RS256).unwrap();
        let verifier = JwtVerifier::new(
            Arc::new(keys),
            VerifierConfig {
                issuer: ISSUER.to_string(),
                audience: AUDIENCE.to_string(),
                leeway_secs: 30,
            },
        );

        let claims = verifier.verify(&token).await.unwrap();
        assert!(claims.has_permission(Permission::CreatePlayer));
    }

    #[test]
    fn test_signer_rejects_mismatched_key_type() {
        assert!(JwtSigner::hmac(SECRET, Algorithm::RS256, ISSUER, AUDIENCE).is_err());
        assert!(JwtSigner::rsa_pem(b"pem", Algorithm::HS256, ISSUER, AUDIENCE).is_err());
    }
}
