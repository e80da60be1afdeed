//! PostgreSQL roster storage with connection pooling

use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::error::ErrorKind;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;
use tracing::error;

use super::schema;
use crate::domain::player::{NewPlayer, Player, PlayerId, PlayerRepository};
use crate::domain::team::{NewTeam, Team, TeamId, TeamRepository};
use crate::domain::DomainError;

const PLAYER_COLUMNS: &str = "id, name, position, height, team_id";

/// PostgreSQL storage configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Idle timeout in seconds
    pub idle_timeout_secs: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/bball".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
            idle_timeout_secs: 600,
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }
}

/// Teams and players stored in two relational tables.
///
/// Constraint violations are reported as client errors: a duplicate team
/// name as `Conflict`, a dangling team reference as `Validation`. Anything
/// else is a `Storage` failure.
#[derive(Clone)]
pub struct PostgresRosterStore {
    pool: PgPool,
}

impl Debug for PostgresRosterStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresRosterStore")
            .field("pool_size", &self.pool.size())
            .finish()
    }
}

impl PostgresRosterStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a connection pool and make sure the schema exists
    pub async fn connect(config: &PostgresConfig) -> Result<Self, DomainError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .idle_timeout(Duration::from_secs(config.idle_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))?;

        schema::ensure_schema(&pool).await?;

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Drop and recreate both tables
    pub async fn reset(&self) -> Result<(), DomainError> {
        schema::reset_schema(&self.pool).await
    }

    /// Cheap round-trip used by the readiness check
    pub async fn ping(&self) -> Result<(), DomainError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| classify(e, "ping database"))
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn classify(err: sqlx::Error, action: &str) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.kind() {
            ErrorKind::UniqueViolation => {
                return DomainError::conflict(format!("Failed to {}: {}", action, db_err));
            }
            ErrorKind::ForeignKeyViolation
            | ErrorKind::NotNullViolation
            | ErrorKind::CheckViolation => {
                return DomainError::validation(format!("Failed to {}: {}", action, db_err));
            }
            _ => {}
        }
    }

    error!(action = action, error = %err, "Database operation failed");
    DomainError::storage(format!("Failed to {}: {}", action, err))
}

fn team_from_row(row: &PgRow) -> Result<Team, DomainError> {
    let id: i64 = row
        .try_get("id")
        .map_err(|e| DomainError::storage(format!("Failed to read team id: {}", e)))?;
    let name: String = row
        .try_get("name")
        .map_err(|e| DomainError::storage(format!("Failed to read team name: {}", e)))?;

    Team::new(TeamId::new(id), name)
        .map_err(|e| DomainError::storage(format!("Invalid team row {}: {}", id, e)))
}

fn player_from_row(row: &PgRow) -> Result<Player, DomainError> {
    let read = |e: sqlx::Error| DomainError::storage(format!("Failed to read player row: {}", e));

    let id: i64 = row.try_get("id").map_err(read)?;
    let name: String = row.try_get("name").map_err(read)?;
    let position: String = row.try_get("position").map_err(read)?;
    let height: String = row.try_get("height").map_err(read)?;
    let team_id: Option<i64> = row.try_get("team_id").map_err(read)?;

    let player = NewPlayer::new(name, position, height, team_id.map(TeamId::new))
        .map_err(|e| DomainError::storage(format!("Invalid player row {}: {}", id, e)))?;

    Ok(player.into_player(PlayerId::new(id)))
}

#[async_trait]
impl TeamRepository for PostgresRosterStore {
    async fn list(&self) -> Result<Vec<Team>, DomainError> {
        let rows = sqlx::query("SELECT id, name FROM teams ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| classify(e, "list teams"))?;

        rows.iter().map(team_from_row).collect()
    }

    async fn get(&self, id: TeamId) -> Result<Option<Team>, DomainError> {
        let row = sqlx::query("SELECT id, name FROM teams WHERE id = $1")
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| classify(e, "get team"))?;

        row.as_ref().map(team_from_row).transpose()
    }

    async fn create(&self, team: NewTeam) -> Result<Team, DomainError> {
        let row = sqlx::query("INSERT INTO teams (name) VALUES ($1) RETURNING id, name")
            .bind(team.name())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| classify(e, "create team"))?;

        team_from_row(&row)
    }

    async fn update(&self, team: &Team) -> Result<Team, DomainError> {
        let row = sqlx::query("UPDATE teams SET name = $1 WHERE id = $2 RETURNING id, name")
            .bind(team.name())
            .bind(team.id().value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| classify(e, "update team"))?;

        match row {
            Some(row) => team_from_row(&row),
            None => Err(DomainError::not_found(format!("Team {} not found", team.id()))),
        }
    }

    async fn delete(&self, id: TeamId) -> Result<bool, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| classify(e, "begin transaction"))?;

        // Blocks player inserts referencing this team until the delete commits
        let locked = sqlx::query("SELECT id FROM teams WHERE id = $1 FOR UPDATE")
            .bind(id.value())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| classify(e, "lock team"))?;

        if locked.is_none() {
            return Ok(false);
        }

        sqlx::query("UPDATE players SET team_id = NULL WHERE team_id = $1")
            .bind(id.value())
            .execute(&mut *tx)
            .await
            .map_err(|e| classify(e, "release players"))?;

        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
            .bind(id.value())
            .execute(&mut *tx)
            .await
            .map_err(|e| classify(e, "delete team"))?;

        tx.commit()
            .await
            .map_err(|e| classify(e, "commit team delete"))?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl PlayerRepository for PostgresRosterStore {
    async fn list(&self) -> Result<Vec<Player>, DomainError> {
        let rows = sqlx::query(&format!("SELECT {} FROM players ORDER BY id", PLAYER_COLUMNS))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| classify(e, "list players"))?;

        rows.iter().map(player_from_row).collect()
    }

    async fn list_by_team(&self, team_id: TeamId) -> Result<Vec<Player>, DomainError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM players WHERE team_id = $1 ORDER BY id",
            PLAYER_COLUMNS
        ))
        .bind(team_id.value())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| classify(e, "list team players"))?;

        rows.iter().map(player_from_row).collect()
    }

    async fn get(&self, id: PlayerId) -> Result<Option<Player>, DomainError> {
        let row = sqlx::query(&format!("SELECT {} FROM players WHERE id = $1", PLAYER_COLUMNS))
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| classify(e, "get player"))?;

        row.as_ref().map(player_from_row).transpose()
    }

    async fn create(&self, player: NewPlayer) -> Result<Player, DomainError> {
        let row = sqlx::query(&format!(
            "INSERT INTO players (name, position, height, team_id) VALUES ($1, $2, $3, $4) RETURNING {}",
            PLAYER_COLUMNS
        ))
        .bind(player.name())
        .bind(player.position())
        .bind(player.height())
        .bind(player.team_id().map(|id| id.value()))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| classify(e, "create player"))?;

        player_from_row(&row)
    }

    async fn update(&self, player: &Player) -> Result<Player, DomainError> {
        let row = sqlx::query(&format!(
            "UPDATE players SET name = $1, position = $2, height = $3, team_id = $4 WHERE id = $5 RETURNING {}",
            PLAYER_COLUMNS
        ))
        .bind(player.name())
        .bind(player.position())
        .bind(player.height())
        .bind(player.team_id().map(|id| id.value()))
        .bind(player.id().value())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| classify(e, "update player"))?;

        match row {
            Some(row) => player_from_row(&row),
            None => Err(DomainError::not_found(format!(
                "Player {} not found",
                player.id()
            ))),
        }
    }

    async fn delete(&self, id: PlayerId) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM players WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(|e| classify(e, "delete player"))?;

        Ok(result.rows_affected() > 0)
    }
}
