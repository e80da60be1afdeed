//! Team domain module
//!
//! Teams own zero or more players. Deleting a team releases its players
//! as free agents instead of deleting them.

mod entity;
mod repository;
mod validation;

pub use entity::{NewTeam, Team, TeamId, TeamRoster};
#[cfg(test)]
pub use repository::MockTeamRepository;
pub use repository::TeamRepository;
pub use validation::{validate_team_name, TeamValidationError};
