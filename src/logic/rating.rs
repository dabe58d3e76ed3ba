//! Replay-based Elo ratings for multi-team matches.
//!
//! Ratings are never stored: every call replays the full match list from the
//! initial rating under the given settings.

use crate::models::{Match, Player, PlayerId, RatingMethod, Settings};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Rating every player starts from.
pub const INITIAL_RATING: f64 = 1000.0;

pub const MIN_RATING: f64 = 0.0;
pub const MAX_RATING: f64 = 4000.0;

/// A player with a derived rating and one history point per replayed match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RatedPlayer {
    pub id: PlayerId,
    pub name: String,
    pub rating: f64,
    /// First element is always the initial rating.
    pub history: Vec<f64>,
}

impl RatedPlayer {
    fn new(id: PlayerId, name: String) -> Self {
        Self {
            id,
            name,
            rating: INITIAL_RATING,
            history: vec![INITIAL_RATING],
        }
    }

    /// Change caused by the most recent history point (0 with a single point).
    pub fn last_delta(&self) -> f64 {
        match self.history.as_slice() {
            [.., prev, last] => last - prev,
            _ => 0.0,
        }
    }
}

/// Expected score of `a` against `b`: `1 / (1 + 10^((b - a) / 400))`.
pub fn expected_score(a: f64, b: f64) -> f64 {
    1.0 / (1.0 + 10.0_f64.powf((b - a) / 400.0))
}

/// Replay `matches` in the given order and return every player's rating and history.
///
/// Team members missing from the roster get a placeholder entry, so the
/// computation never fails on dangling references. All histories are padded
/// to the same length by repeating their last value.
pub fn compute_ratings(
    roster: &BTreeMap<PlayerId, Player>,
    matches: &[Match],
    settings: &Settings,
) -> BTreeMap<PlayerId, RatedPlayer> {
    let mut rated: BTreeMap<PlayerId, RatedPlayer> = roster
        .values()
        .map(|p| (p.id.clone(), RatedPlayer::new(p.id.clone(), p.name.clone())))
        .collect();

    for m in matches {
        for id in m.teams.iter().flat_map(|t| t.members.iter()) {
            if !rated.contains_key(id) {
                rated.insert(id.clone(), RatedPlayer::new(id.clone(), Player::placeholder_name(id)));
            }
        }

        let increments = player_increments(&rated, m, settings);
        for player in rated.values_mut() {
            let inc = increments.get(player.id.as_str()).copied().unwrap_or(0.0);
            player.rating = (player.rating + inc).clamp(MIN_RATING, MAX_RATING);
            player.history.push(player.rating);
        }
    }

    let len = rated.values().map(|p| p.history.len()).max().unwrap_or(1);
    for player in rated.values_mut() {
        let last = player.history.last().copied().unwrap_or(INITIAL_RATING);
        player.history.resize(len, last);
    }
    rated
}

/// Mean of the members' current ratings. Unknown ids count as the initial rating.
pub fn team_rating(rated: &BTreeMap<PlayerId, RatedPlayer>, members: &[PlayerId]) -> f64 {
    if members.is_empty() {
        return 0.0;
    }
    let sum: f64 = members
        .iter()
        .map(|id| rated.get(id).map_or(INITIAL_RATING, |p| p.rating))
        .sum();
    sum / members.len() as f64
}

/// Per-team rating deltas for one match, index-aligned with `m.teams`.
pub fn team_deltas(
    rated: &BTreeMap<PlayerId, RatedPlayer>,
    m: &Match,
    settings: &Settings,
) -> Vec<f64> {
    let ratings: Vec<f64> = m
        .teams
        .iter()
        .map(|t| team_rating(rated, &t.members))
        .collect();
    let placements: Vec<i32> = m.teams.iter().map(|t| t.placement).collect();
    match settings.method {
        RatingMethod::Pairwise => pairwise_deltas(&ratings, &placements, settings.k),
        RatingMethod::Field => field_deltas(&ratings, &placements, settings.k),
    }
}

fn pairwise_deltas(ratings: &[f64], placements: &[i32], k: f64) -> Vec<f64> {
    let n = ratings.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by_key(|&i| placements[i]);

    let k = k / n.saturating_sub(1).max(1) as f64;
    let mut deltas = vec![0.0; n];
    for (pos, &a) in order.iter().enumerate() {
        for &b in &order[pos + 1..] {
            let gain = k * (1.0 - expected_score(ratings[a], ratings[b]));
            deltas[a] += gain;
            deltas[b] -= gain;
        }
    }
    deltas
}

fn field_deltas(ratings: &[f64], placements: &[i32], k: f64) -> Vec<f64> {
    let n = ratings.len();
    let denom = n.saturating_sub(1).max(1) as f64;
    (0..n)
        .map(|i| {
            let actual = (n as f64 - f64::from(placements[i])) / denom;
            let expected: f64 = (0..n)
                .filter(|&j| j != i)
                .map(|j| expected_score(ratings[i], ratings[j]))
                .sum::<f64>()
                / denom;
            k * (actual - expected)
        })
        .collect()
}

/// Split each team's delta evenly over its members. A player listed on
/// several teams accumulates every share.
fn player_increments<'m>(
    rated: &BTreeMap<PlayerId, RatedPlayer>,
    m: &'m Match,
    settings: &Settings,
) -> HashMap<&'m str, f64> {
    let deltas = team_deltas(rated, m, settings);
    let mut increments: HashMap<&str, f64> = HashMap::new();
    for (team, delta) in m.teams.iter().zip(deltas) {
        let share = delta / team.members.len().max(1) as f64;
        for id in &team.members {
            *increments.entry(id.as_str()).or_insert(0.0) += share;
        }
    }
    increments
}
