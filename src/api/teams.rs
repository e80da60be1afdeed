//! Team endpoints

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
    ApiError, DeletedResponse, Json, Path, TeamBody, TeamDetailResponse, TeamResponse, TeamView,
    TeamsResponse,
};
use crate::domain::auth::{Claims, Permission, TokenVerifier};
use crate::domain::team::TeamId;

/// Team routes, each guarded by its own permission
pub fn routes(verifier: &Arc<dyn TokenVerifier>) -> Router<AppState> {
    Router::new()
        .route(
            "/teams",
            guarded(get(list_teams), Permission::ListTeams, verifier)
                .merge(guarded(post(create_team), Permission::CreateTeam, verifier)),
        )
        .route(
            "/teams/{id}",
            guarded(get(get_team), Permission::GetTeam, verifier)
                .merge(guarded(patch(update_team), Permission::UpdateTeam, verifier))
                .merge(guarded(delete(delete_team), Permission::DeleteTeam, verifier)),
        )
}

/// GET /teams
pub async fn list_teams(State(state): State<AppState>) -> Result<Json<TeamsResponse>, ApiError> {
    let rosters = state.team_service.list().await?;

    Ok(Json(TeamsResponse {
        success: true,
        teams: rosters.iter().map(TeamView::from).collect(),
    }))
}

/// GET /teams/{id}
pub async fn get_team(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TeamDetailResponse>, ApiError> {
    let roster = state.team_service.get(TeamId::new(id)).await?;

    Ok(Json(TeamDetailResponse {
        success: true,
        name: roster.team().name().to_string(),
        players: roster.player_names(),
    }))
}

/// POST /teams
pub async fn create_team(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<TeamBody>,
) -> Result<Json<TeamResponse>, ApiError> {
    let roster = state.team_service.create(body.into()).await?;
    info!(subject = %claims.subject, id = %roster.team().id(), "Team created via API");

    Ok(Json(TeamResponse {
        success: true,
        team: TeamView::from(&roster),
    }))
}

/// PATCH /teams/{id}
///
/// An unknown id is reported as 404 even when the body is unreadable.
pub async fn update_team(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    body: Result<Json<TeamBody>, ApiError>,
) -> Result<Json<TeamResponse>, ApiError> {
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            state.team_service.get(TeamId::new(id)).await?;
            return Err(rejection);
        }
    };

    let roster = state
        .team_service
        .update(TeamId::new(id), body.into())
        .await?;
    info!(subject = %claims.subject, id = id, "Team updated via API");

    Ok(Json(TeamResponse {
        success: true,
        team: TeamView::from(&roster),
    }))
}

/// DELETE /teams/{id}
pub async fn delete_team(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let deleted = state.team_service.delete(TeamId::new(id)).await?;
    info!(subject = %claims.subject, id = %deleted, "Team deleted via API");

    Ok(Json(DeletedResponse::new(deleted.value())))
}
