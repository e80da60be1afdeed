//! In-memory roster storage

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use crate::domain::player::{NewPlayer, Player, PlayerId, PlayerRepository};
use crate::domain::team::{NewTeam, Team, TeamId, TeamRepository};
use crate::domain::DomainError;

#[derive(Debug, Default)]
struct Tables {
    teams: BTreeMap<i64, Team>,
    players: BTreeMap<i64, Player>,
    next_team_id: i64,
    next_player_id: i64,
}

impl Tables {
    fn name_taken(&self, name: &str, except: Option<TeamId>) -> bool {
        self.teams
            .values()
            .any(|team| team.name() == name && Some(team.id()) != except)
    }

    fn check_team_ref(&self, team_id: Option<TeamId>) -> Result<(), DomainError> {
        match team_id {
            Some(id) if !self.teams.contains_key(&id.value()) => Err(DomainError::validation(
                format!("Team {} does not exist", id),
            )),
            _ => Ok(()),
        }
    }
}

/// Thread-safe in-memory storage for teams and players.
///
/// Both tables sit behind one lock so a team delete and the release of its
/// players are a single write. Data is lost when the process terminates.
#[derive(Debug, Default)]
pub struct InMemoryRosterStore {
    tables: RwLock<Tables>,
}

impl InMemoryRosterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every row and restart identifiers at 1
    pub fn clear(&self) -> Result<(), DomainError> {
        *self.write()? = Tables::default();
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, DomainError> {
        self.tables
            .read()
            .map_err(|e| DomainError::storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, DomainError> {
        self.tables
            .write()
            .map_err(|e| DomainError::storage(format!("Failed to acquire write lock: {}", e)))
    }
}

#[async_trait]
impl TeamRepository for InMemoryRosterStore {
    async fn list(&self) -> Result<Vec<Team>, DomainError> {
        Ok(self.read()?.teams.values().cloned().collect())
    }

    async fn get(&self, id: TeamId) -> Result<Option<Team>, DomainError> {
        Ok(self.read()?.teams.get(&id.value()).cloned())
    }

    async fn create(&self, team: NewTeam) -> Result<Team, DomainError> {
        let mut tables = self.write()?;

        if tables.name_taken(team.name(), None) {
            return Err(DomainError::conflict(format!(
                "Team '{}' already exists",
                team.name()
            )));
        }

        tables.next_team_id += 1;
        let team = team.into_team(TeamId::new(tables.next_team_id));
        tables.teams.insert(team.id().value(), team.clone());

        Ok(team)
    }

    async fn update(&self, team: &Team) -> Result<Team, DomainError> {
        let mut tables = self.write()?;

        if !tables.teams.contains_key(&team.id().value()) {
            return Err(DomainError::not_found(format!("Team {} not found", team.id())));
        }

        if tables.name_taken(team.name(), Some(team.id())) {
            return Err(DomainError::conflict(format!(
                "Team '{}' already exists",
                team.name()
            )));
        }

        tables.teams.insert(team.id().value(), team.clone());
        Ok(team.clone())
    }

    async fn delete(&self, id: TeamId) -> Result<bool, DomainError> {
        let mut tables = self.write()?;

        if tables.teams.remove(&id.value()).is_none() {
            return Ok(false);
        }

        for player in tables.players.values_mut() {
            if player.team_id() == Some(id) {
                player.release();
            }
        }

        Ok(true)
    }
}

#[async_trait]
impl PlayerRepository for InMemoryRosterStore {
    async fn list(&self) -> Result<Vec<Player>, DomainError> {
        Ok(self.read()?.players.values().cloned().collect())
    }

    async fn list_by_team(&self, team_id: TeamId) -> Result<Vec<Player>, DomainError> {
        Ok(self
            .read()?
            .players
            .values()
            .filter(|player| player.team_id() == Some(team_id))
            .cloned()
            .collect())
    }

    async fn get(&self, id: PlayerId) -> Result<Option<Player>, DomainError> {
        Ok(self.read()?.players.get(&id.value()).cloned())
    }

    async fn create(&self, player: NewPlayer) -> Result<Player, DomainError> {
        let mut tables = self.write()?;
        tables.check_team_ref(player.team_id())?;

        tables.next_player_id += 1;
        let player = player.into_player(PlayerId::new(tables.next_player_id));
        tables.players.insert(player.id().value(), player.clone());

        Ok(player)
    }

    async fn update(&self, player: &Player) -> Result<Player, DomainError> {
        let mut tables = self.write()?;

        if !tables.players.contains_key(&player.id().value()) {
            return Err(DomainError::not_found(format!(
                "Player {} not found",
                player.id()
            )));
        }

        tables.check_team_ref(player.team_id())?;
        tables.players.insert(player.id().value(), player.clone());

        Ok(player.clone())
    }

    async fn delete(&self, id: PlayerId) -> Result<bool, DomainError> {
        Ok(self.write()?.players.remove(&id.value()).is_some())
    }
}
