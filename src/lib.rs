//! Tournament rating tracker: library with models, rating logic, state store and sync client.

pub mod api;
pub mod cli;
pub mod config;
pub mod logic;
pub mod models;
pub mod store;
pub mod sync;

pub use logic::{
    compute_ratings, expected_score, leaderboard, leaderboard_csv, recent_matches, RatedPlayer,
    Standing,
};
pub use models::{
    Document, DocumentError, Match, MatchId, MatchMode, Player, PlayerId, RatingMethod, Settings,
    Team, TeamId,
};
pub use store::{PutOutcome, Snapshot, StateStore, StoreError};
pub use sync::{HttpRemote, LocalCache, RemoteStore, SyncClient, SyncError, SyncStatus};
