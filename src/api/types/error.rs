//! Error envelope returned by every endpoint

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::domain::auth::{AuthError, AuthErrorKind};
use crate::domain::DomainError;

/// Stable, client-facing error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCode {
    AuthorizationHeaderMissing,
    InvalidHeader,
    InvalidSignature,
    TokenExpired,
    InvalidClaims,
    Forbidden,
    NotFound,
    BadMethod,
    Unprocessable,
    InternalServerError,
    ServiceUnavailable,
}

impl ApiErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthorizationHeaderMissing => "authorization_header_missing",
            Self::InvalidHeader => "invalid_header",
            Self::InvalidSignature => "invalid_signature",
            Self::TokenExpired => "token_expired",
            Self::InvalidClaims => "invalid_claims",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::BadMethod => "bad_method",
            Self::Unprocessable => "unprocessable",
            Self::InternalServerError => "internal_server_error",
            Self::ServiceUnavailable => "service_unavailable",
        }
    }
}

impl std::fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `{"success": false, "error": <status>, "message": <code>}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub success: bool,
    pub error: u16,
    pub message: String,
}

/// API error with status code.
///
/// `detail` is logged but never sent to the client.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: ApiErrorCode,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: ApiErrorCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            code,
            detail: detail.into(),
        }
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, ApiErrorCode::NotFound, detail)
    }

    pub fn bad_method() -> Self {
        Self::new(
            StatusCode::METHOD_NOT_ALLOWED,
            ApiErrorCode::BadMethod,
            "Method not allowed",
        )
    }

    pub fn unprocessable(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            ApiErrorCode::Unprocessable,
            detail,
        )
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            ApiErrorCode::InternalServerError,
            detail,
        )
    }

    pub fn body(&self) -> ApiErrorResponse {
        ApiErrorResponse {
            success: false,
            error: self.status.as_u16(),
            message: self.code.as_str().to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(status = self.status.as_u16(), code = %self.code, detail = %self.detail, "Request failed");
        } else {
            debug!(status = self.status.as_u16(), code = %self.code, detail = %self.detail, "Request rejected");
        }

        (self.status, Json(self.body())).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        let detail = err.to_string();

        match err {
            DomainError::NotFound { .. } => Self::not_found(detail),
            DomainError::Validation { .. } | DomainError::Conflict { .. } => {
                Self::unprocessable(detail)
            }
            DomainError::Storage { .. }
            | DomainError::Configuration { .. }
            | DomainError::Internal { .. } => Self::internal(detail),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        let (status, code) = match err.kind {
            AuthErrorKind::MissingHeader => (
                StatusCode::UNAUTHORIZED,
                ApiErrorCode::AuthorizationHeaderMissing,
            ),
            AuthErrorKind::MalformedHeader => {
                (StatusCode::UNAUTHORIZED, ApiErrorCode::InvalidHeader)
            }
            AuthErrorKind::InvalidSignature => {
                (StatusCode::UNAUTHORIZED, ApiErrorCode::InvalidSignature)
            }
            AuthErrorKind::Expired => (StatusCode::UNAUTHORIZED, ApiErrorCode::TokenExpired),
            AuthErrorKind::InvalidClaims => {
                (StatusCode::UNAUTHORIZED, ApiErrorCode::InvalidClaims)
            }
            AuthErrorKind::Forbidden => (StatusCode::FORBIDDEN, ApiErrorCode::Forbidden),
            AuthErrorKind::KeySetUnavailable => (
                StatusCode::SERVICE_UNAVAILABLE,
                ApiErrorCode::ServiceUnavailable,
            ),
        };

        Self::new(status, code, err.description)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}: {}", self.status.as_u16(), self.code, self.detail)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_envelope() {
        let body = ApiError::not_found("Team 9 not found").body();

        assert!(!body.success);
        assert_eq!(body.error, 404);
        assert_eq!(body.message, "not_found");
    }

    #[test]
    fn test_detail_not_exposed() {
        let err = ApiError::internal("connection refused on 10.0.0.3");
        let json = serde_json::to_string(&err.body()).unwrap();

        assert!(!json.contains("10.0.0.3"));
        assert!(json.contains("internal_server_error"));
    }

    #[test]
    fn test_domain_error_conversion() {
        let cases = [
            (DomainError::not_found("x"), StatusCode::NOT_FOUND),
            (DomainError::validation("x"), StatusCode::UNPROCESSABLE_ENTITY),
            (DomainError::conflict("x"), StatusCode::UNPROCESSABLE_ENTITY),
            (DomainError::storage("x"), StatusCode::INTERNAL_SERVER_ERROR),
            (DomainError::internal("x"), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (domain_err, status) in cases {
            assert_eq!(ApiError::from(domain_err).status, status);
        }
    }

    #[test]
    fn test_auth_error_conversion() {
        let err = ApiError::from(AuthError::missing_header());
        assert_eq!(err.status, StatusCode::UNAUTHORIZED);
        assert_eq!(err.code, ApiErrorCode::AuthorizationHeaderMissing);

        let err = ApiError::from(AuthError::expired());
        assert_eq!(err.code, ApiErrorCode::TokenExpired);

        let err = ApiError::from(AuthError::forbidden("nope"));
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.body().message, "forbidden");

        let err = ApiError::from(AuthError::key_set_unavailable("down"));
        assert_eq!(err.status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_auth_codes_match_domain_codes() {
        let kinds = [
            AuthErrorKind::MissingHeader,
            AuthErrorKind::MalformedHeader,
            AuthErrorKind::InvalidSignature,
            AuthErrorKind::Expired,
            AuthErrorKind::InvalidClaims,
            AuthErrorKind::Forbidden,
            AuthErrorKind::KeySetUnavailable,
        ];

        for kind in kinds {
            let err = ApiError::from(AuthError::new(kind, "x"));
            assert_eq!(err.code.as_str(), kind.code());
        }
    }
}
