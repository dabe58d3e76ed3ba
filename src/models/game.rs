//! Match, Team and MatchMode for multi-team results.

use crate::models::player::{new_id, PlayerId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique identifier for a match.
pub type MatchId = String;

/// Unique identifier for a team within a match.
pub type TeamId = String;

/// Format of a match. Informational only: rating math depends on the teams.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum MatchMode {
    #[serde(rename = "1v1")]
    OneVOne,
    #[serde(rename = "2v2")]
    TwoVTwo,
    #[serde(rename = "FFA")]
    FreeForAll,
    #[default]
    #[serde(rename = "CUSTOM")]
    Custom,
}

impl std::fmt::Display for MatchMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            MatchMode::OneVOne => "1v1",
            MatchMode::TwoVTwo => "2v2",
            MatchMode::FreeForAll => "FFA",
            MatchMode::Custom => "CUSTOM",
        };
        f.write_str(label)
    }
}

impl std::str::FromStr for MatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "1V1" => Ok(MatchMode::OneVOne),
            "2V2" => Ok(MatchMode::TwoVTwo),
            "FFA" => Ok(MatchMode::FreeForAll),
            "CUSTOM" => Ok(MatchMode::Custom),
            other => Err(format!("unknown match mode: {other}")),
        }
    }
}

/// One side of a match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Player ids, in entry order.
    pub members: Vec<PlayerId>,
    /// Finishing rank within the match: 1 = best.
    pub placement: i32,
}

impl Team {
    pub fn new(members: Vec<PlayerId>, placement: i32) -> Self {
        Self {
            id: new_id(),
            name: None,
            members,
            placement,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

/// A played match: two or more teams with placements.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub mode: MatchMode,
    pub date: DateTime<Utc>,
    pub teams: Vec<Team>,
}

impl Match {
    /// New match stamped with a fresh id and the current time.
    pub fn new(mode: MatchMode, teams: Vec<Team>) -> Self {
        Self {
            id: new_id(),
            name: None,
            mode,
            date: Utc::now(),
            teams,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Override the timestamp (imports, tests).
    pub fn dated(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }

    /// Whether the player is a member of any team in this match.
    pub fn involves(&self, player_id: &str) -> bool {
        self.teams
            .iter()
            .any(|t| t.members.iter().any(|m| m == player_id))
    }

    /// Teams ordered by placement ascending (stable for equal placements).
    pub fn teams_by_placement(&self) -> Vec<&Team> {
        let mut teams: Vec<&Team> = self.teams.iter().collect();
        teams.sort_by_key(|t| t.placement);
        teams
    }
}
