//! Player validation

use thiserror::Error;

use crate::domain::DomainError;

/// Errors that can occur during player validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PlayerValidationError {
    #[error("Player {0} is required")]
    MissingField(&'static str),

    #[error("Player {0} cannot be empty")]
    EmptyField(&'static str),

    #[error("Player {0} cannot exceed {1} characters")]
    FieldTooLong(&'static str, usize),
}

const MAX_FIELD_LENGTH: usize = 120;

/// Validate one of the required text attributes (name, position, height)
pub fn validate_player_field(field: &'static str, value: &str) -> Result<(), PlayerValidationError> {
    if value.trim().is_empty() {
        return Err(PlayerValidationError::EmptyField(field));
    }

    if value.chars().count() > MAX_FIELD_LENGTH {
        return Err(PlayerValidationError::FieldTooLong(field, MAX_FIELD_LENGTH));
    }

    Ok(())
}

/// Unwrap a field that must be present in a create request
pub fn require_player_field(
    field: &'static str,
    value: Option<String>,
) -> Result<String, PlayerValidationError> {
    let value = value.ok_or(PlayerValidationError::MissingField(field))?;
    validate_player_field(field, &value)?;
    Ok(value)
}

impl From<PlayerValidationError> for DomainError {
    fn from(err: PlayerValidationError) -> Self {
        DomainError::validation(err.to_string())
    }
}
