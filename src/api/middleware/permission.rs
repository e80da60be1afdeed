//! Per-route permission guard

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};
use tracing::debug;

use crate::api::types::ApiError;
use crate::domain::auth::{authorize, AuthError, Permission, TokenVerifier};

/// State of one guarded route: the permission it requires and the
/// verifier used to read the caller's token
#[derive(Clone)]
pub struct PermissionGuard {
    permission: Permission,
    verifier: Arc<dyn TokenVerifier>,
}

impl PermissionGuard {
    pub fn new(permission: Permission, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self {
            permission,
            verifier,
        }
    }
}

/// Verify the bearer token and require the guard's permission.
///
/// Runs before any path or body extraction, so authentication failures are
/// reported ahead of 404/422. The verified `Claims` are stored in the
/// request extensions.
pub async fn require_permission(
    State(guard): State<PermissionGuard>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let authorization = match request.headers().get(header::AUTHORIZATION) {
        Some(value) => Some(
            value
                .to_str()
                .map_err(|_| AuthError::malformed("Authorization header is not valid UTF-8"))?
                .to_string(),
        ),
        None => None,
    };

    let claims = guard
        .verifier
        .verify_authorization(authorization.as_deref())
        .await
        .inspect_err(|e| debug!(permission = %guard.permission, error = %e, "Authentication failed"))?;

    authorize(&claims, guard.permission).inspect_err(
        |e| debug!(subject = %claims.subject, error = %e, "Authorization denied"),
    )?;

    debug!(subject = %claims.subject, permission = %guard.permission, "Request authorized");
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

/// Wrap a method route so it only runs for callers holding `permission`
pub fn guarded<S>(
    route: MethodRouter<S>,
    permission: Permission,
    verifier: &Arc<dyn TokenVerifier>,
) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    route.route_layer(middleware::from_fn_with_state(
        PermissionGuard::new(permission, verifier.clone()),
        require_permission,
    ))
}
