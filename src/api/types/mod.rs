//! HTTP request and response types

pub mod error;
pub mod json;
pub mod path;
pub mod roster;

pub use error::{ApiError, ApiErrorCode, ApiErrorResponse};
pub use json::Json;
pub use path::Path;
pub use roster::{
    CreatePlayerBody, DeletedResponse, PlayerDetail, PlayerResponse, PlayerSummary,
    PlayersResponse, TeamBody, TeamDetailResponse, TeamResponse, TeamView, TeamsResponse,
    UpdatePlayerBody,
};
