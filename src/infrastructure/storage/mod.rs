//! Storage infrastructure - roster backends

mod factory;
mod in_memory;
mod postgres;
mod schema;
mod seed;

pub use factory::{RosterStorage, StorageConfig, StorageFactory, StorageType};
pub use in_memory::InMemoryRosterStore;
pub use postgres::{PostgresConfig, PostgresRosterStore};
pub use seed::{seed_demo_data, SeedSummary};
