//! The shared document: roster, matches and settings.

use crate::logic::{compute_ratings, RatedPlayer};
use crate::models::game::{Match, MatchId};
use crate::models::player::{Player, PlayerId};
use crate::models::settings::{RatingMethod, Settings};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// Errors that can occur while editing the document.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum DocumentError {
    /// Player name is empty after trimming.
    EmptyName,
    /// A player with this name already exists (names are unique, case-insensitive).
    DuplicatePlayerName,
    /// Player id not on the roster.
    PlayerNotFound(PlayerId),
    /// A match needs at least two teams.
    NotEnoughTeams,
    /// A team has no members.
    EmptyTeam(usize),
    /// Placements must be a permutation of `1..=N`.
    InvalidPlacements,
    /// A team member is not on the roster.
    UnknownMember(PlayerId),
    /// The same player appears more than once in a match.
    DuplicateMember(PlayerId),
}

impl std::fmt::Display for DocumentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentError::EmptyName => write!(f, "Player name must not be empty"),
            DocumentError::DuplicatePlayerName => write!(f, "A player with this name already exists"),
            DocumentError::PlayerNotFound(id) => write!(f, "Player not found: {}", id),
            DocumentError::NotEnoughTeams => write!(f, "A match needs at least 2 teams"),
            DocumentError::EmptyTeam(index) => write!(f, "Team {} has no members", index + 1),
            DocumentError::InvalidPlacements => {
                write!(f, "Placements must be unique and range from 1 to the number of teams")
            }
            DocumentError::UnknownMember(id) => write!(f, "Team member is not on the roster: {}", id),
            DocumentError::DuplicateMember(id) => write!(f, "Player appears more than once: {}", id),
        }
    }
}

impl std::error::Error for DocumentError {}

/// Full persisted state: what the store versions and the local cache holds.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub players: BTreeMap<PlayerId, Player>,
    /// Matches in replay order.
    #[serde(default)]
    pub matches: Vec<Match>,
    #[serde(default)]
    pub settings: Settings,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a player. Names are trimmed and must be unique (case-insensitive).
    pub fn add_player(&mut self, name: &str) -> Result<PlayerId, DocumentError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DocumentError::EmptyName);
        }
        if self.find_player_by_name(name).is_some() {
            return Err(DocumentError::DuplicatePlayerName);
        }
        let player = Player::new(name);
        let id = player.id.clone();
        self.players.insert(id.clone(), player);
        Ok(id)
    }

    /// Remove a player and cascade into matches: the player leaves every team,
    /// empty teams are dropped, and matches left with fewer than 2 teams are dropped.
    pub fn remove_player(&mut self, player_id: &str) -> Result<Player, DocumentError> {
        let removed = self
            .players
            .remove(player_id)
            .ok_or_else(|| DocumentError::PlayerNotFound(player_id.to_string()))?;
        for m in &mut self.matches {
            for team in &mut m.teams {
                team.members.retain(|id| id != player_id);
            }
            m.teams.retain(|t| !t.members.is_empty());
        }
        self.matches.retain(|m| m.teams.len() >= 2);
        Ok(removed)
    }

    /// Case-insensitive lookup by name.
    pub fn find_player_by_name(&self, name: &str) -> Option<&Player> {
        let name = name.trim().to_lowercase();
        self.players
            .values()
            .find(|p| p.name.to_lowercase() == name)
    }

    /// Append a match after checking it against the roster and placement rules.
    pub fn add_match(&mut self, m: Match) -> Result<MatchId, DocumentError> {
        self.validate_match(&m)?;
        let id = m.id.clone();
        self.matches.push(m);
        Ok(id)
    }

    /// Check the match-entry contract: ≥2 non-empty teams, members on the roster
    /// and on one team only, placements a permutation of `1..=N`.
    pub fn validate_match(&self, m: &Match) -> Result<(), DocumentError> {
        if m.teams.len() < 2 {
            return Err(DocumentError::NotEnoughTeams);
        }
        let mut seen = HashSet::new();
        for (index, team) in m.teams.iter().enumerate() {
            if team.members.is_empty() {
                return Err(DocumentError::EmptyTeam(index));
            }
            for id in &team.members {
                if !self.players.contains_key(id) {
                    return Err(DocumentError::UnknownMember(id.clone()));
                }
                if !seen.insert(id.as_str()) {
                    return Err(DocumentError::DuplicateMember(id.clone()));
                }
            }
        }
        let mut placements: Vec<i32> = m.teams.iter().map(|t| t.placement).collect();
        placements.sort_unstable();
        let is_permutation = placements
            .iter()
            .enumerate()
            .all(|(i, &p)| i64::from(p) == i as i64 + 1);
        if !is_permutation {
            return Err(DocumentError::InvalidPlacements);
        }
        Ok(())
    }

    pub fn set_method(&mut self, method: RatingMethod) {
        self.settings.method = method;
    }

    /// Set K (rounded, clamped to `[1, 128]`).
    pub fn set_k(&mut self, k: f64) {
        self.settings.set_k(k);
    }

    /// Clear players, matches and settings back to defaults.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Replay every match under the current settings.
    pub fn ratings(&self) -> BTreeMap<PlayerId, RatedPlayer> {
        compute_ratings(&self.players, &self.matches, &self.settings)
    }
}
