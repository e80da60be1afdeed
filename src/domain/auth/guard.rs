//! Token verification contract and the permission check

use async_trait::async_trait;

use super::claims::Claims;
use super::error::AuthError;
use super::permission::Permission;

/// Verifies bearer credentials and extracts their claims
#[async_trait]
pub trait TokenVerifier: Send + Sync + std::fmt::Debug {
    /// Verify a raw JWT and return its claims
    async fn verify(&self, token: &str) -> Result<Claims, AuthError>;

    /// Verify the value of an `Authorization` header
    async fn verify_authorization(&self, header: Option<&str>) -> Result<Claims, AuthError> {
        let token = bearer_token(header)?;
        self.verify(token).await
    }
}

/// Extract the token from an `Authorization: Bearer <token>` header value
///
/// Only an absent header counts as missing; a present but blank value is malformed.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let header = header.ok_or_else(AuthError::missing_header)?;
    let mut parts = header.split_whitespace();

    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        (Some(scheme), _, _) if !scheme.eq_ignore_ascii_case("bearer") => Err(
            AuthError::malformed("Authorization header must start with \"Bearer\""),
        ),
        (Some(_), None, _) => Err(AuthError::malformed("Token not found")),
        (None, _, _) => Err(AuthError::malformed("Authorization header is empty")),
        _ => Err(AuthError::malformed(
            "Authorization header must be bearer token",
        )),
    }
}

/// Require `permission` to be granted by `claims`
pub fn authorize(claims: &Claims, permission: Permission) -> Result<(), AuthError> {
    if claims.has_permission(permission) {
        Ok(())
    } else {
        Err(AuthError::forbidden(format!(
            "Permission '{}' not granted",
            permission
        )))
    }
}
