//! Command line interface of the `tourney` client.

use crate::models::{Document, DocumentError, MatchMode, PlayerId, RatingMethod, Team};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser, Debug)]
#[command(author, version, about = "Track multi-team matches and Elo ratings")]
pub struct Cli {
    /// Base URL of the state server
    #[arg(long, env = "TOURNEY_SERVER", default_value = "http://localhost:8080")]
    pub server: String,

    /// Directory holding the local cache file
    #[arg(long, env = "TOURNEY_CACHE_DIR", default_value = ".")]
    pub cache_dir: PathBuf,

    /// HTTP timeout in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout: u64,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
#[clap(rename_all = "lower_case")]
pub enum Command {
    /// List the roster
    Players,
    /// Add a player
    Add { name: String },
    /// Remove a player (by name or id); their matches are pruned
    Remove { player: String },
    /// Record a match, e.g. `record --team 1:alice,bob --team 2:carol,dave`
    Record {
        #[arg(long, default_value = "CUSTOM")]
        mode: MatchMode,
        #[arg(long)]
        name: Option<String>,
        /// [NAME=]PLACEMENT:PLAYER[,PLAYER...]; repeat for every team
        #[arg(long = "team", required = true)]
        teams: Vec<TeamArg>,
    },
    /// Show recent matches, newest first
    Matches {
        #[arg(long, default_value_t = crate::logic::RECENT_LIMIT)]
        limit: usize,
    },
    /// Show the leaderboard
    Leaderboard {
        /// Print CSV instead of a table
        #[arg(long)]
        csv: bool,
    },
    /// Show rating history per match for the given players (all when omitted)
    History { players: Vec<String> },
    /// Show or change rating settings
    Settings {
        #[arg(long)]
        method: Option<RatingMethod>,
        #[arg(long)]
        k: Option<f64>,
    },
    /// Delete all players, matches and settings
    Reset,
}

/// One `--team` argument before names are resolved against the roster.
#[derive(Clone, Debug, PartialEq)]
pub struct TeamArg {
    pub name: Option<String>,
    pub placement: i32,
    pub members: Vec<String>,
}

impl FromStr for TeamArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (head, members) = s
            .split_once(':')
            .ok_or_else(|| format!("expected [NAME=]PLACEMENT:PLAYER[,PLAYER...], got '{s}'"))?;
        let (name, placement) = match head.split_once('=') {
            Some((name, placement)) => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(format!("team name before '=' is empty in '{s}'"));
                }
                (Some(name.to_string()), placement)
            }
            None => (None, head),
        };
        let placement = placement
            .trim()
            .parse()
            .map_err(|_| format!("placement must be a number, got '{placement}'"))?;
        let members: Vec<String> = members
            .split(',')
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(String::from)
            .collect();
        if members.is_empty() {
            return Err(format!("team '{s}' has no players"));
        }
        Ok(Self {
            name,
            placement,
            members,
        })
    }
}

impl TeamArg {
    /// Resolve member names (or ids) against the roster.
    pub fn to_team(&self, doc: &Document) -> Result<Team, DocumentError> {
        let members = self
            .members
            .iter()
            .map(|m| resolve_player(doc, m))
            .collect::<Result<Vec<_>, _>>()?;
        let team = Team::new(members, self.placement);
        Ok(match &self.name {
            Some(name) => team.named(name.as_str()),
            None => team,
        })
    }
}

/// Player id for an id or a (case-insensitive) name.
pub fn resolve_player(doc: &Document, name_or_id: &str) -> Result<PlayerId, DocumentError> {
    if doc.players.contains_key(name_or_id) {
        return Ok(name_or_id.to_string());
    }
    doc.find_player_by_name(name_or_id)
        .map(|p| p.id.clone())
        .ok_or_else(|| DocumentError::PlayerNotFound(name_or_id.to_string()))
}
