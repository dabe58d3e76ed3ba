//! CSV export of the leaderboard.

use crate::logic::standings::Standing;
use serde::Serialize;

#[derive(Serialize)]
struct LeaderboardRow<'a> {
    rank: usize,
    player: &'a str,
    rating: i64,
    last_delta: i64,
}

/// Leaderboard as CSV with whole-number ratings, header included.
pub fn leaderboard_csv(standings: &[Standing]) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for s in standings {
        writer.serialize(LeaderboardRow {
            rank: s.rank,
            player: &s.name,
            rating: s.rating.round() as i64,
            last_delta: s.last_delta.round() as i64,
        })?;
    }
    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
