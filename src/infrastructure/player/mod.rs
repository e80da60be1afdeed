//! Player infrastructure implementations

mod service;

pub use service::{CreatePlayerRequest, PlayerService};
