//! Application state for shared services

use std::sync::Arc;

use crate::domain::auth::TokenVerifier;
use crate::infrastructure::player::PlayerService;
use crate::infrastructure::storage::RosterStorage;
use crate::infrastructure::team::TeamService;

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub team_service: Arc<TeamService>,
    pub player_service: Arc<PlayerService>,
    pub verifier: Arc<dyn TokenVerifier>,
    pub storage: RosterStorage,
}

impl AppState {
    /// Wire the services over an opened storage backend
    pub fn new(storage: RosterStorage, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self {
            team_service: Arc::new(TeamService::new(storage.teams(), storage.players())),
            player_service: Arc::new(PlayerService::new(storage.players(), storage.teams())),
            verifier,
            storage,
        }
    }
}
