use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::health;
use super::players;
use super::state::AppState;
use super::teams;
use super::types::ApiError;

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    let verifier = state.verifier.clone();

    Router::new()
        // Health endpoints (no auth)
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        // Resource endpoints, one permission per route
        .merge(teams::routes(&verifier))
        .merge(players::routes(&verifier))
        .fallback(not_found)
        .method_not_allowed_fallback(bad_method)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}

async fn not_found() -> ApiError {
    ApiError::not_found("No route matches the request path")
}

async fn bad_method() -> ApiError {
    ApiError::bad_method()
}
