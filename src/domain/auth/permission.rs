//! Permission catalogue and development roles

use serde::{Deserialize, Serialize};

/// A permission string a token must carry to reach an endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    #[serde(rename = "get:teams")]
    ListTeams,
    #[serde(rename = "get:teams/id")]
    GetTeam,
    #[serde(rename = "post:teams")]
    CreateTeam,
    #[serde(rename = "patch:teams")]
    UpdateTeam,
    #[serde(rename = "delete:teams")]
    DeleteTeam,
    #[serde(rename = "get:players")]
    ListPlayers,
    #[serde(rename = "get:players/id")]
    GetPlayer,
    #[serde(rename = "post:players")]
    CreatePlayer,
    #[serde(rename = "patch:players")]
    UpdatePlayer,
    #[serde(rename = "delete:players")]
    DeletePlayer,
}

impl Permission {
    pub const ALL: [Permission; 10] = [
        Self::ListTeams,
        Self::GetTeam,
        Self::CreateTeam,
        Self::UpdateTeam,
        Self::DeleteTeam,
        Self::ListPlayers,
        Self::GetPlayer,
        Self::CreatePlayer,
        Self::UpdatePlayer,
        Self::DeletePlayer,
    ];

    /// The exact string matched against the token's `permissions` claim
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ListTeams => "get:teams",
            Self::GetTeam => "get:teams/id",
            Self::CreateTeam => "post:teams",
            Self::UpdateTeam => "patch:teams",
            Self::DeleteTeam => "delete:teams",
            Self::ListPlayers => "get:players",
            Self::GetPlayer => "get:players/id",
            Self::CreatePlayer => "post:players",
            Self::UpdatePlayer => "patch:players",
            Self::DeletePlayer => "delete:players",
        }
    }

    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            Self::ListTeams | Self::GetTeam | Self::ListPlayers | Self::GetPlayer
        )
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Roles used when minting development tokens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Read-only access to teams and players
    #[default]
    Analyst,
    /// Full access
    Admin,
}

impl Role {
    pub fn permissions(&self) -> Vec<Permission> {
        match self {
            Self::Analyst => Permission::ALL
                .into_iter()
                .filter(Permission::is_read_only)
                .collect(),
            Self::Admin => Permission::ALL.to_vec(),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "analyst" => Ok(Self::Analyst),
            "admin" => Ok(Self::Admin),
            other => Err(format!("Unknown role '{}'. Use admin or analyst.", other)),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Analyst => write!(f, "analyst"),
            Self::Admin => write!(f, "admin"),
        }
    }
}
