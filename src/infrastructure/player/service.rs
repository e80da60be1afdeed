//! Player service

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::player::{
    require_player_field, NewPlayer, Player, PlayerChanges, PlayerId, PlayerProfile,
    PlayerRepository,
};
use crate::domain::team::{TeamId, TeamRepository};
use crate::domain::DomainError;

/// Request for creating a new player
#[derive(Debug, Clone, Default)]
pub struct CreatePlayerRequest {
    pub name: Option<String>,
    pub position: Option<String>,
    pub height: Option<String>,
    pub team_id: Option<i64>,
}

/// Player service; every result carries the resolved team name
#[derive(Clone)]
pub struct PlayerService {
    players: Arc<dyn PlayerRepository>,
    teams: Arc<dyn TeamRepository>,
}

impl std::fmt::Debug for PlayerService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlayerService").finish_non_exhaustive()
    }
}

impl PlayerService {
    pub fn new(players: Arc<dyn PlayerRepository>, teams: Arc<dyn TeamRepository>) -> Self {
        Self { players, teams }
    }

    /// List all players
    ///
    /// Players and teams are two separate reads, not one snapshot. Players
    /// are read first, so any team they reference resolves unless it was
    /// deleted in between, and then they show as free agents, which is where
    /// the delete leaves them.
    pub async fn list(&self) -> Result<Vec<PlayerProfile>, DomainError> {
        let players = self.players.list().await?;

        let team_names: HashMap<TeamId, String> = self
            .teams
            .list()
            .await?
            .into_iter()
            .map(|team| (team.id(), team.name().to_string()))
            .collect();

        debug!(count = players.len(), "Listed players");

        Ok(players
            .into_iter()
            .map(|player| {
                let team_name = player.team_id().and_then(|id| team_names.get(&id).cloned());
                PlayerProfile::new(player, team_name)
            })
            .collect())
    }

    /// Get a player by ID
    pub async fn get(&self, id: PlayerId) -> Result<PlayerProfile, DomainError> {
        debug!(id = %id, "Getting player");

        let player = self.find(id).await?;
        self.profile(player).await
    }

    /// Create a new player
    pub async fn create(&self, request: CreatePlayerRequest) -> Result<PlayerProfile, DomainError> {
        let player = NewPlayer::new(
            require_player_field("name", request.name)?,
            require_player_field("position", request.position)?,
            require_player_field("height", request.height)?,
            request.team_id.map(TeamId::new),
        )?;

        let player = self.players.create(player).await?;
        info!(id = %player.id(), name = %player.name(), "Created player");

        self.profile(player).await
    }

    /// Apply a partial update; the player must exist before the body is considered
    pub async fn update(
        &self,
        id: PlayerId,
        changes: PlayerChanges,
    ) -> Result<PlayerProfile, DomainError> {
        let current = self.find(id).await?;

        if changes.is_empty() {
            debug!(id = %id, "Empty player update");
            return self.profile(current).await;
        }

        let merged = changes.apply(&current)?;
        let player = self.players.update(&merged).await?;
        info!(id = %id, "Updated player");

        self.profile(player).await
    }

    /// Delete a player
    pub async fn delete(&self, id: PlayerId) -> Result<PlayerId, DomainError> {
        if !self.players.delete(id).await? {
            return Err(DomainError::not_found(format!("Player {} not found", id)));
        }

        info!(id = %id, "Deleted player");
        Ok(id)
    }

    async fn find(&self, id: PlayerId) -> Result<Player, DomainError> {
        self.players
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Player {} not found", id)))
    }

    async fn profile(&self, player: Player) -> Result<PlayerProfile, DomainError> {
        let team_name = match player.team_id() {
            Some(team_id) => self
                .teams
                .get(team_id)
                .await?
                .map(|team| team.name().to_string()),
            None => None,
        };

        Ok(PlayerProfile::new(player, team_name))
    }
}
