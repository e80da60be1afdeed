//! Team entity and related types

use serde::{Deserialize, Serialize};

use super::validation::{validate_team_name, TeamValidationError};
use crate::domain::player::Player;

/// Team identifier, assigned by storage on insert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(i64);

impl TeamId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for TeamId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Team entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    id: TeamId,
    name: String,
}

impl Team {
    /// Create a team value for a stored row
    pub fn new(id: TeamId, name: impl Into<String>) -> Result<Self, TeamValidationError> {
        let name = name.into();
        validate_team_name(&name)?;

        Ok(Self { id, name })
    }

    pub fn id(&self) -> TeamId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Update the name
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), TeamValidationError> {
        let name = name.into();
        validate_team_name(&name)?;
        self.name = name;
        Ok(())
    }
}

/// A team that has not been inserted yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTeam {
    name: String,
}

impl NewTeam {
    pub fn new(name: impl Into<String>) -> Result<Self, TeamValidationError> {
        let name = name.into();
        validate_team_name(&name)?;

        Ok(Self { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Attach the identifier assigned by storage
    pub fn into_team(self, id: TeamId) -> Team {
        Team { id, name: self.name }
    }
}

/// A team together with the players it owns
#[derive(Debug, Clone, PartialEq)]
pub struct TeamRoster {
    team: Team,
    players: Vec<Player>,
}

impl TeamRoster {
    pub fn new(team: Team, players: Vec<Player>) -> Self {
        Self { team, players }
    }

    pub fn team(&self) -> &Team {
        &self.team
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player_names(&self) -> Vec<String> {
        self.players.iter().map(|p| p.name().to_string()).collect()
    }
}
