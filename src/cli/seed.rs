//! Seed command - recreate the schema with demo data

use tracing::info;

use crate::infrastructure::storage::{seed_demo_data, StorageFactory, StorageType};

/// Drop every row, recreate the tables and insert the demo roster
pub async fn run() -> anyhow::Result<()> {
    let config = super::bootstrap()?;

    let storage = StorageFactory::create(&config.database.storage_config()?).await?;

    if storage.storage_type() == StorageType::InMemory {
        info!("Seeding in-memory storage; data is discarded when this command exits");
    }

    storage.reset().await?;
    let summary = seed_demo_data(&storage).await?;
    storage.close().await;

    info!(
        teams = summary.teams,
        players = summary.players,
        "Database seeded"
    );

    Ok(())
}
