//! Team repository trait

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use super::entity::{NewTeam, Team, TeamId};
use crate::domain::DomainError;

/// Repository for managing teams
///
/// Name uniqueness is enforced here: `create` and `update` fail with
/// `DomainError::Conflict` when another team already uses the name.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait TeamRepository: Send + Sync {
    /// List all teams ordered by identifier
    async fn list(&self) -> Result<Vec<Team>, DomainError>;

    /// Get a team by ID
    async fn get(&self, id: TeamId) -> Result<Option<Team>, DomainError>;

    /// Insert a team and return it with its assigned identifier
    async fn create(&self, team: NewTeam) -> Result<Team, DomainError>;

    /// Persist changes to an existing team
    async fn update(&self, team: &Team) -> Result<Team, DomainError>;

    /// Delete a team, clearing the team reference of every player it owns.
    ///
    /// Both steps happen in one unit of work: no reader observes a player
    /// pointing at a deleted team. Returns `false` when no team matched.
    async fn delete(&self, id: TeamId) -> Result<bool, DomainError>;
}
