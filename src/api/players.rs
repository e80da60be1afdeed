//! Player endpoints

use std::sync::Arc;

use axum::{
    extract::State,
    routing::{delete, get, patch, post},
    Extension, Router,
};
use tracing::info;

use crate::api::middleware::guarded;
use crate::api::state::AppState;
use crate::api::types::{
    ApiError, CreatePlayerBody, DeletedResponse, Json, Path, PlayerDetail, PlayerResponse,
    PlayerSummary, PlayersResponse, UpdatePlayerBody,
};
use crate::domain::auth::{Claims, Permission, TokenVerifier};
use crate::domain::player::PlayerId;

/// Player routes, each guarded by its own permission
pub fn routes(verifier: &Arc<dyn TokenVerifier>) -> Router<AppState> {
    Router::new()
        .route(
            "/players",
            guarded(get(list_players), Permission::ListPlayers, verifier)
                .merge(guarded(post(create_player), Permission::CreatePlayer, verifier)),
        )
        .route(
            "/players/{id}",
            guarded(get(get_player), Permission::GetPlayer, verifier)
                .merge(guarded(patch(update_player), Permission::UpdatePlayer, verifier))
                .merge(guarded(delete(delete_player), Permission::DeletePlayer, verifier)),
        )
}

/// GET /players
pub async fn list_players(
    State(state): State<AppState>,
) -> Result<Json<PlayersResponse>, ApiError> {
    let profiles = state.player_service.list().await?;

    Ok(Json(PlayersResponse {
        success: true,
        players: profiles.iter().map(PlayerSummary::from).collect(),
    }))
}

/// GET /players/{id}
pub async fn get_player(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PlayerResponse>, ApiError> {
    let profile = state.player_service.get(PlayerId::new(id)).await?;

    Ok(Json(PlayerResponse {
        success: true,
        player: PlayerDetail::from(&profile),
    }))
}

/// POST /players
pub async fn create_player(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<CreatePlayerBody>,
) -> Result<Json<PlayerResponse>, ApiError> {
    let profile = state.player_service.create(body.into()).await?;
    info!(subject = %claims.subject, id = %profile.player().id(), "Player created via API");

    Ok(Json(PlayerResponse {
        success: true,
        player: PlayerDetail::from(&profile),
    }))
}

/// PATCH /players/{id}
///
/// An unknown id is reported as 404 even when the body is unreadable.
pub async fn update_player(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    body: Result<Json<UpdatePlayerBody>, ApiError>,
) -> Result<Json<PlayerResponse>, ApiError> {
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            state.player_service.get(PlayerId::new(id)).await?;
            return Err(rejection);
        }
    };

    let profile = state
        .player_service
        .update(PlayerId::new(id), body.into())
        .await?;
    info!(subject = %claims.subject, id = id, "Player updated via API");

    Ok(Json(PlayerResponse {
        success: true,
        player: PlayerDetail::from(&profile),
    }))
}

/// DELETE /players/{id}
pub async fn delete_player(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let deleted = state.player_service.delete(PlayerId::new(id)).await?;
    info!(subject = %claims.subject, id = %deleted, "Player deleted via API");

    Ok(Json(DeletedResponse::new(deleted.value())))
}
