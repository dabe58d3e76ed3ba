//! Player data structure.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a player (opaque string, used in teams and lookups).
pub type PlayerId = String;

/// A player on the roster.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
}

impl Player {
    /// Create a new player with a freshly generated id.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: new_id(),
            name: name.into(),
        }
    }

    /// Create a player with a known id (e.g. when rebuilding from stored data).
    pub fn with_id(id: impl Into<PlayerId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Display name used for ids referenced by matches but missing from the roster.
    pub fn placeholder_name(id: &str) -> String {
        let prefix: String = id.chars().take(4).collect();
        format!("P-{prefix}")
    }
}

/// Generate an opaque id for players, teams and matches.
pub(crate) fn new_id() -> String {
    Uuid::new_v4().to_string()
}
