//! PostgreSQL schema for the roster tables

use sqlx::postgres::PgPool;
use tracing::info;

use crate::domain::DomainError;

const CREATE_STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS teams (
        id BIGSERIAL PRIMARY KEY,
        name TEXT NOT NULL UNIQUE
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS players (
        id BIGSERIAL PRIMARY KEY,
        name VARCHAR(120) NOT NULL,
        position VARCHAR(120) NOT NULL,
        height VARCHAR(120) NOT NULL,
        team_id BIGINT NULL REFERENCES teams(id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_players_team_id ON players (team_id)",
];

const DROP_STATEMENTS: &[&str] = &["DROP TABLE IF EXISTS players", "DROP TABLE IF EXISTS teams"];

/// Create the tables when they do not exist yet
pub async fn ensure_schema(pool: &PgPool) -> Result<(), DomainError> {
    run(pool, CREATE_STATEMENTS).await
}

/// Drop and recreate the tables, discarding all rows
pub async fn reset_schema(pool: &PgPool) -> Result<(), DomainError> {
    run(pool, DROP_STATEMENTS).await?;
    run(pool, CREATE_STATEMENTS).await?;

    info!("Database schema recreated");
    Ok(())
}

async fn run(pool: &PgPool, statements: &[&str]) -> Result<(), DomainError> {
    for statement in statements {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to apply schema: {}", e)))?;
    }

    Ok(())
}
