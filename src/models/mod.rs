//! Data structures for match tracking: players, matches, settings, the shared document.

mod document;
mod game;
mod player;
mod settings;

pub use document::{Document, DocumentError};
pub use game::{Match, MatchId, MatchMode, Team, TeamId};
pub use player::{Player, PlayerId};
pub use settings::{normalize_k, RatingMethod, Settings, DEFAULT_K, MAX_K, MIN_K};
