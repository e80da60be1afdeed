//! Demo roster used by `seed` and by `database.seed_demo_data`

use tracing::info;

use super::factory::RosterStorage;
use crate::domain::player::NewPlayer;
use crate::domain::team::{NewTeam, TeamId};
use crate::domain::DomainError;

const TEAMS: [&str; 3] = ["Heat", "Knicks", "Nets"];

/// (name, position, height, index into `TEAMS`)
const PLAYERS: [(&str, &str, &str, Option<usize>); 3] = [
    ("Lebron James", "Small Forward", "6'9", Some(0)),
    ("Jalen Brunson", "Point Guard", "6'2", Some(1)),
    ("Luka Doncic", "Point Guard", "6'7", None),
];

/// Row counts written by [`seed_demo_data`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub teams: usize,
    pub players: usize,
}

/// Insert the demo teams and players into empty storage
pub async fn seed_demo_data(storage: &RosterStorage) -> Result<SeedSummary, DomainError> {
    let teams = storage.teams();
    let players = storage.players();

    let mut team_ids: Vec<TeamId> = Vec::with_capacity(TEAMS.len());
    for name in TEAMS {
        let team = teams.create(NewTeam::new(name)?).await?;
        team_ids.push(team.id());
    }

    for (name, position, height, team) in PLAYERS {
        let team_id = team.and_then(|index| team_ids.get(index).copied());
        players
            .create(NewPlayer::new(name, position, height, team_id)?)
            .await?;
    }

    let summary = SeedSummary {
        teams: TEAMS.len(),
        players: PLAYERS.len(),
    };
    info!(teams = summary.teams, players = summary.players, "Demo data seeded");

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_seed_demo_data() {
        let storage = RosterStorage::in_memory();

        let summary = seed_demo_data(&storage).await.unwrap();
        assert_eq!(summary, SeedSummary { teams: 3, players: 3 });

        let teams = storage.teams().list().await.unwrap();
        let names: Vec<_> = teams.iter().map(|t| t.name().to_string()).collect();
        assert_eq!(names, vec!["Heat", "Knicks", "Nets"]);

        let players = storage.players().list().await.unwrap();
        assert_eq!(players[0].team_id(), Some(teams[0].id()));
        assert_eq!(players[1].team_id(), Some(teams[1].id()));
        assert_eq!(players[2].team_id(), None);
    }

    #[tokio::test]
    async fn test_seed_twice_conflicts() {
        let storage = RosterStorage::in_memory();
        seed_demo_data(&storage).await.unwrap();

        let result = seed_demo_data(&storage).await;
        assert!(matches!(result, Err(DomainError::Conflict { .. })));
    }
}
