//! Player entity and related types

use serde::{Deserialize, Serialize};

use super::validation::{require_player_field, validate_player_field, PlayerValidationError};
use crate::domain::team::TeamId;

/// Label rendered for a player without a team
pub const FREE_AGENT: &str = "Free Agent";

/// Player identifier, assigned by storage on insert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(i64);

impl PlayerId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl From<i64> for PlayerId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Player entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    id: PlayerId,
    name: String,
    position: String,
    height: String,
    team_id: Option<TeamId>,
}

impl Player {
    pub fn id(&self) -> PlayerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> &str {
        &self.position
    }

    pub fn height(&self) -> &str {
        &self.height
    }

    pub fn team_id(&self) -> Option<TeamId> {
        self.team_id
    }

    /// Drop the team reference, making the player a free agent
    pub fn release(&mut self) {
        self.team_id = None;
    }
}

/// A player that has not been inserted yet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPlayer {
    name: String,
    position: String,
    height: String,
    team_id: Option<TeamId>,
}

impl NewPlayer {
    pub fn new(
        name: impl Into<String>,
        position: impl Into<String>,
        height: impl Into<String>,
        team_id: Option<TeamId>,
    ) -> Result<Self, PlayerValidationError> {
        let name = name.into();
        let position = position.into();
        let height = height.into();

        validate_player_field("name", &name)?;
        validate_player_field("position", &position)?;
        validate_player_field("height", &height)?;

        Ok(Self {
            name,
            position,
            height,
            team_id,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn position(&self) -> &str {
        &self.position
    }

    pub fn height(&self) -> &str {
        &self.height
    }

    pub fn team_id(&self) -> Option<TeamId> {
        self.team_id
    }

    /// Attach the identifier assigned by storage
    pub fn into_player(self, id: PlayerId) -> Player {
        Player {
            id,
            name: self.name,
            position: self.position,
            height: self.height,
            team_id: self.team_id,
        }
    }
}

/// Partial update for a player; `None` leaves the attribute untouched.
///
/// Every field is doubly optional. `Some(None)` clears the team reference,
/// and is rejected for the required text attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlayerChanges {
    pub name: Option<Option<String>>,
    pub position: Option<Option<String>>,
    pub height: Option<Option<String>>,
    pub team_id: Option<Option<TeamId>>,
}

impl PlayerChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.position.is_none()
            && self.height.is_none()
            && self.team_id.is_none()
    }

    /// Apply the changes, returning the merged player.
    ///
    /// The input is left untouched when any supplied field is invalid.
    pub fn apply(self, player: &Player) -> Result<Player, PlayerValidationError> {
        let mut merged = player.clone();

        if let Some(name) = self.name {
            merged.name = require_player_field("name", name)?;
        }

        if let Some(position) = self.position {
            merged.position = require_player_field("position", position)?;
        }

        if let Some(height) = self.height {
            merged.height = require_player_field("height", height)?;
        }

        if let Some(team_id) = self.team_id {
            merged.team_id = team_id;
        }

        Ok(merged)
    }
}

/// A player together with the resolved name of its team
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerProfile {
    player: Player,
    team_name: Option<String>,
}

impl PlayerProfile {
    pub fn new(player: Player, team_name: Option<String>) -> Self {
        Self { player, team_name }
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Team name, or "Free Agent" when the player has no team
    pub fn team_label(&self) -> &str {
        self.team_name.as_deref().unwrap_or(FREE_AGENT)
    }
}
