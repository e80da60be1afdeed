//! Domain layer - Core entities, repository contracts and authorization rules

pub mod auth;
pub mod error;
pub mod player;
pub mod team;

pub use auth::{AuthError, AuthErrorKind, Claims, Permission, Role, TokenVerifier};
pub use error::DomainError;
pub use player::{NewPlayer, Player, PlayerChanges, PlayerId, PlayerProfile, PlayerRepository};
pub use team::{NewTeam, Team, TeamId, TeamRepository, TeamRoster};
