//! Team infrastructure implementations

mod service;

pub use service::{CreateTeamRequest, TeamService, UpdateTeamRequest};
