//! Player and standings models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PlayerId;

/// A registered player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Unique identifier (assigned by the store)
    pub id: PlayerId,

    /// Full name as registered; need not be unique
    pub name: String,

    /// When the player registered
    pub registered_at: DateTime<Utc>,
}

impl Player {
    pub fn new(id: PlayerId, name: String) -> Self {
        Self {
            id,
            name,
            registered_at: Utc::now(),
        }
    }
}

/// One row of the standings, as seen at pairing time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingsEntry {
    pub id: PlayerId,
    pub name: String,

    /// Sum of the configured points for every result and bye
    pub score: f64,

    /// Matches played; byes are not matches
    pub matches: u32,
}

impl StandingsEntry {
    pub fn new(id: PlayerId, name: impl Into<String>, score: f64, matches: u32) -> Self {
        Self {
            id,
            name: name.into(),
            score,
            matches,
        }
    }
}
