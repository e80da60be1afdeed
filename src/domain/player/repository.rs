//! Player repository trait

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::entity::{NewPlayer, Player, PlayerId};
use crate::domain::team::TeamId;
use crate::domain::DomainError;

/// Repository for managing players
///
/// A team reference that does not point at an existing team is rejected
/// with `DomainError::Validation`.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    /// List all players ordered by identifier
    async fn list(&self) -> Result<Vec<Player>, DomainError>;

    /// List the players owned by a team
    async fn list_by_team(&self, team_id: TeamId) -> Result<Vec<Player>, DomainError>;

    /// Get a player by ID
    async fn get(&self, id: PlayerId) -> Result<Option<Player>, DomainError>;

    /// Insert a player and return it with its assigned identifier
    async fn create(&self, player: NewPlayer) -> Result<Player, DomainError>;

    /// Persist changes to an existing player
    async fn update(&self, player: &Player) -> Result<Player, DomainError>;

    /// Delete a player; returns `false` when no player matched
    async fn delete(&self, id: PlayerId) -> Result<bool, DomainError>;
}
