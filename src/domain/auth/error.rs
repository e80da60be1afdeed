//! Authentication and authorization errors

use thiserror::Error;

/// Why a request was denied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthErrorKind {
    /// No Authorization header
    MissingHeader,
    /// Header present but not `Bearer <token>`, or the token cannot be parsed
    MalformedHeader,
    /// Signature does not verify against the configured keys
    InvalidSignature,
    /// Token expiry has passed
    Expired,
    /// Issuer, audience or required claims do not match
    InvalidClaims,
    /// Valid token without the required permission
    Forbidden,
    /// Signing keys could not be fetched
    KeySetUnavailable,
}

impl AuthErrorKind {
    /// Stable code rendered in error responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingHeader => "authorization_header_missing",
            Self::MalformedHeader => "invalid_header",
            Self::InvalidSignature => "invalid_signature",
            Self::Expired => "token_expired",
            Self::InvalidClaims => "invalid_claims",
            Self::Forbidden => "forbidden",
            Self::KeySetUnavailable => "service_unavailable",
        }
    }
}

/// Authentication or authorization failure
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{}: {}", .kind.code(), .description)]
pub struct AuthError {
    pub kind: AuthErrorKind,
    pub description: String,
}

impl AuthError {
    pub fn new(kind: AuthErrorKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
        }
    }

    pub fn missing_header() -> Self {
        Self::new(AuthErrorKind::MissingHeader, "Authorization header is expected")
    }

    pub fn malformed(description: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::MalformedHeader, description)
    }

    pub fn invalid_signature(description: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::InvalidSignature, description)
    }

    pub fn expired() -> Self {
        Self::new(AuthErrorKind::Expired, "Token expired")
    }

    pub fn invalid_claims(description: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::InvalidClaims, description)
    }

    pub fn forbidden(description: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::Forbidden, description)
    }

    pub fn key_set_unavailable(description: impl Into<String>) -> Self {
        Self::new(AuthErrorKind::KeySetUnavailable, description)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_uses_code() {
        let err = AuthError::expired();
        assert_eq!(err.to_string(), "token_expired: Token expired");
    }

    #[test]
    fn test_codes_are_distinct() {
        let kinds = [
            AuthErrorKind::MissingHeader,
            AuthErrorKind::MalformedHeader,
            AuthErrorKind::InvalidSignature,
            AuthErrorKind::Expired,
            AuthErrorKind::InvalidClaims,
            AuthErrorKind::Forbidden,
            AuthErrorKind::KeySetUnavailable,
        ];

        let codes: std::collections::HashSet<_> = kinds.iter().map(|k| k.code()).collect();
        assert_eq!(codes.len(), kinds.len());
    }
}
