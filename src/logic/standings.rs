//! Leaderboard and recent-match views over derived ratings.

use crate::logic::rating::RatedPlayer;
use crate::models::{Match, PlayerId};
use serde::Serialize;
use std::collections::BTreeMap;

/// Default number of matches shown by [`recent_matches`] callers.
pub const RECENT_LIMIT: usize = 10;

/// One leaderboard row.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Standing {
    pub rank: usize,
    pub id: PlayerId,
    pub name: String,
    pub rating: f64,
    /// Change from the previous history point.
    pub last_delta: f64,
}

/// Players by rating, best first. Ties break on name, then id.
pub fn leaderboard(ratings: &BTreeMap<PlayerId, RatedPlayer>) -> Vec<Standing> {
    let mut players: Vec<&RatedPlayer> = ratings.values().collect();
    players.sort_by(|a, b| {
        b.rating
            .total_cmp(&a.rating)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.id.cmp(&b.id))
    });
    players
        .into_iter()
        .enumerate()
        .map(|(i, p)| Standing {
            rank: i + 1,
            id: p.id.clone(),
            name: p.name.clone(),
            rating: p.rating,
            last_delta: p.last_delta(),
        })
        .collect()
}

/// Newest matches first, at most `limit`.
pub fn recent_matches(matches: &[Match], limit: usize) -> Vec<&Match> {
    let mut recent: Vec<&Match> = matches.iter().collect();
    recent.sort_by(|a, b| b.date.cmp(&a.date));
    recent.truncate(limit);
    recent
}
