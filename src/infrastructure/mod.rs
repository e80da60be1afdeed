//! Infrastructure layer - Token verification, storage backends and services

pub mod auth;
pub mod logging;
pub mod player;
pub mod storage;
pub mod team;
