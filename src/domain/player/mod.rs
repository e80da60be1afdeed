//! Player domain module

mod entity;
mod repository;
mod validation;

pub use entity::{NewPlayer, Player, PlayerChanges, PlayerId, PlayerProfile, FREE_AGENT};
#[cfg(test)]
pub use repository::MockPlayerRepository;
pub use repository::PlayerRepository;
pub use validation::{require_player_field, validate_player_field, PlayerValidationError};
