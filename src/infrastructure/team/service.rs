//! Team service for roster management

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::player::{Player, PlayerRepository};
use crate::domain::team::{NewTeam, TeamId, TeamRepository, TeamRoster, TeamValidationError};
use crate::domain::DomainError;

/// Request for creating a new team
#[derive(Debug, Clone, Default)]
pub struct CreateTeamRequest {
    pub name: Option<String>,
}

/// Request for updating a team
#[derive(Debug, Clone, Default)]
pub struct UpdateTeamRequest {
    pub name: Option<String>,
}

/// Team service for managing teams and reading their rosters
#[derive(Clone)]
pub struct TeamService {
    teams: Arc<dyn TeamRepository>,
    players: Arc<dyn PlayerRepository>,
}

impl std::fmt::Debug for TeamService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TeamService").finish_non_exhaustive()
    }
}

impl TeamService {
    pub fn new(teams: Arc<dyn TeamRepository>, players: Arc<dyn PlayerRepository>) -> Self {
        Self { teams, players }
    }

    /// List all teams with their players
    ///
    /// Teams and players are two separate reads, not one snapshot. Players
    /// pointing at a team missing from the first read are left out.
    pub async fn list(&self) -> Result<Vec<TeamRoster>, DomainError> {
        let teams = self.teams.list().await?;
        let mut by_team: HashMap<TeamId, Vec<Player>> = HashMap::new();

        for player in self.players.list().await? {
            if let Some(team_id) = player.team_id() {
                by_team.entry(team_id).or_default().push(player);
            }
        }

        debug!(count = teams.len(), "Listed teams");

        Ok(teams
            .into_iter()
            .map(|team| {
                let players = by_team.remove(&team.id()).unwrap_or_default();
                TeamRoster::new(team, players)
            })
            .collect())
    }

    /// Get a team and its players
    pub async fn get(&self, id: TeamId) -> Result<TeamRoster, DomainError> {
        debug!(id = %id, "Getting team");

        let team = self
            .teams
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Team {} not found", id)))?;

        let players = self.players.list_by_team(id).await?;
        Ok(TeamRoster::new(team, players))
    }

    /// Create a new team
    pub async fn create(&self, request: CreateTeamRequest) -> Result<TeamRoster, DomainError> {
        let name = request.name.ok_or(TeamValidationError::MissingName)?;
        let team = self.teams.create(NewTeam::new(name)?).await?;

        info!(id = %team.id(), name = %team.name(), "Created team");
        Ok(TeamRoster::new(team, Vec::new()))
    }

    /// Rename a team; the team must exist before the body is considered
    pub async fn update(
        &self,
        id: TeamId,
        request: UpdateTeamRequest,
    ) -> Result<TeamRoster, DomainError> {
        let mut team = self
            .teams
            .get(id)
            .await?
            .ok_or_else(|| DomainError::not_found(format!("Team {} not found", id)))?;

        let name = request.name.ok_or(TeamValidationError::MissingName)?;
        team.set_name(name)?;

        let team = self.teams.update(&team).await?;
        let players = self.players.list_by_team(id).await?;

        info!(id = %id, name = %team.name(), "Updated team");
        Ok(TeamRoster::new(team, players))
    }

    /// Delete a team, releasing its players as free agents
    pub async fn delete(&self, id: TeamId) -> Result<TeamId, DomainError> {
        if !self.teams.delete(id).await? {
            return Err(DomainError::not_found(format!("Team {} not found", id)));
        }

        info!(id = %id, "Deleted team");
        Ok(id)
    }
}
