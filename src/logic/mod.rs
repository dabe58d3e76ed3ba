//! Rating logic: match replay, standings, export.

mod export;
mod rating;
mod standings;

pub use export::leaderboard_csv;
pub use rating::{
    compute_ratings, expected_score, team_deltas, team_rating, RatedPlayer, INITIAL_RATING,
    MAX_RATING, MIN_RATING,
};
pub use standings::{leaderboard, recent_matches, Standing, RECENT_LIMIT};
