//! Request bodies and response views for the roster endpoints

use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::player::{PlayerChanges, PlayerProfile};
use crate::domain::team::{TeamId, TeamRoster};
use crate::infrastructure::player::CreatePlayerRequest;
use crate::infrastructure::team::{CreateTeamRequest, UpdateTeamRequest};

/// `{id, name, players: [names]}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamView {
    pub id: i64,
    pub name: String,
    pub players: Vec<String>,
}

impl From<&TeamRoster> for TeamView {
    fn from(roster: &TeamRoster) -> Self {
        Self {
            id: roster.team().id().value(),
            name: roster.team().name().to_string(),
            players: roster.player_names(),
        }
    }
}

/// Short player view: `{id, name, team}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSummary {
    pub id: i64,
    pub name: String,
    pub team: String,
}

impl From<&PlayerProfile> for PlayerSummary {
    fn from(profile: &PlayerProfile) -> Self {
        Self {
            id: profile.player().id().value(),
            name: profile.player().name().to_string(),
            team: profile.team_label().to_string(),
        }
    }
}

/// Long player view, adding position and height
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerDetail {
    pub id: i64,
    pub name: String,
    pub position: String,
    pub height: String,
    pub team: String,
}

impl From<&PlayerProfile> for PlayerDetail {
    fn from(profile: &PlayerProfile) -> Self {
        let player = profile.player();

        Self {
            id: player.id().value(),
            name: player.name().to_string(),
            position: player.position().to_string(),
            height: player.height().to_string(),
            team: profile.team_label().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamsResponse {
    pub success: bool,
    pub teams: Vec<TeamView>,
}

/// GET /teams/{id}
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamDetailResponse {
    pub success: bool,
    pub name: String,
    pub players: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamResponse {
    pub success: bool,
    pub team: TeamView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayersResponse {
    pub success: bool,
    pub players: Vec<PlayerSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerResponse {
    pub success: bool,
    pub player: PlayerDetail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub success: bool,
    pub deleted: i64,
}

impl DeletedResponse {
    pub fn new(id: i64) -> Self {
        Self {
            success: true,
            deleted: id,
        }
    }
}

/// POST /teams and PATCH /teams/{id}
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TeamBody {
    #[serde(default)]
    pub name: Option<String>,
}

impl From<TeamBody> for CreateTeamRequest {
    fn from(body: TeamBody) -> Self {
        Self { name: body.name }
    }
}

impl From<TeamBody> for UpdateTeamRequest {
    fn from(body: TeamBody) -> Self {
        Self { name: body.name }
    }
}

/// POST /players
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CreatePlayerBody {
    pub name: Option<String>,
    pub position: Option<String>,
    pub height: Option<String>,
    pub team_id: Option<i64>,
}

impl From<CreatePlayerBody> for CreatePlayerRequest {
    fn from(body: CreatePlayerBody) -> Self {
        Self {
            name: body.name,
            position: body.position,
            height: body.height,
            team_id: body.team_id,
        }
    }
}

/// PATCH /players/{id}
///
/// Absent fields are left untouched. `"team_id": null` releases the player;
/// a null `name`, `position` or `height` is rejected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePlayerBody {
    #[serde(default, deserialize_with = "deserialize_some")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub position: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub height: Option<Option<String>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub team_id: Option<Option<i64>>,
}

fn deserialize_some<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl From<UpdatePlayerBody> for PlayerChanges {
    fn from(body: UpdatePlayerBody) -> Self {
        Self {
            name: body.name,
            position: body.position,
            height: body.height,
            team_id: body.team_id.map(|team| team.map(TeamId::new)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::player::{NewPlayer, PlayerId};
    use crate::domain::team::Team;

    #[test]
    fn test_team_id_absent_vs_null() {
        let absent: UpdatePlayerBody = serde_json::from_str(r#"{"position":"Center"}"#).unwrap();
        assert_eq!(absent.team_id, None);

        let null: UpdatePlayerBody = serde_json::from_str(r#"{"team_id":null}"#).unwrap();
        assert_eq!(null.team_id, Some(None));

        let set: UpdatePlayerBody = serde_json::from_str(r#"{"team_id":3}"#).unwrap();
        assert_eq!(set.team_id, Some(Some(3)));

        let changes = PlayerChanges::from(null);
        assert_eq!(changes.team_id, Some(None));
    }

    #[test]
    fn test_null_name_is_kept_distinct_from_absent() {
        let body: UpdatePlayerBody = serde_json::from_str(r#"{"name":null}"#).unwrap();
        assert_eq!(body.name, Some(None));
        assert_eq!(body.position, None);

        let changes = PlayerChanges::from(body);
        assert_eq!(changes.name, Some(None));
        assert!(!changes.is_empty());
    }

    #[test]
    fn test_player_views_render_free_agent() {
        let player = NewPlayer::new("Luka Doncic", "Point Guard", "6'7", None)
            .unwrap()
            .into_player(PlayerId::new(3));
        let profile = PlayerProfile::new(player, None);

        let summary = serde_json::to_value(PlayerSummary::from(&profile)).unwrap();
        assert_eq!(
            summary,
            serde_json::json!({"id": 3, "name": "Luka Doncic", "team": "Free Agent"})
        );

        let detail = PlayerDetail::from(&profile);
        assert_eq!(detail.position, "Point Guard");
        assert_eq!(detail.height, "6'7");
    }

    #[test]
    fn test_team_view() {
        let team = Team::new(TeamId::new(1), "Heat").unwrap();
        let player = NewPlayer::new("Lebron James", "Small Forward", "6'9", Some(team.id()))
            .unwrap()
            .into_player(PlayerId::new(1));

        let view = TeamView::from(&TeamRoster::new(team, vec![player]));
        assert_eq!(view.players, vec!["Lebron James".to_string()]);
    }
}
