//! Reported matches.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MatchId, MatchResult, PlayerId};

/// One side of a match: who played and what they reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSide {
    pub player_id: PlayerId,
    pub result: MatchResult,
}

impl MatchSide {
    pub fn new(player_id: PlayerId, result: MatchResult) -> Self {
        Self { player_id, result }
    }
}

/// A validated match ready to be written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchReport {
    pub first: MatchSide,
    pub second: MatchSide,
}

/// A match as stored: the match itself, its two players and their results
/// live in one record so they are written together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    pub id: MatchId,
    pub first: MatchSide,
    pub second: MatchSide,
    pub recorded_at: DateTime<Utc>,
}

impl MatchRecord {
    pub fn new(id: MatchId, report: MatchReport) -> Self {
        Self {
            id,
            first: report.first,
            second: report.second,
            recorded_at: Utc::now(),
        }
    }

    /// Both sides in reporting order.
    pub fn sides(&self) -> [MatchSide; 2] {
        [self.first, self.second]
    }

    /// The opponent of `player`, if they took part in this match.
    pub fn opponent_of(&self, player: PlayerId) -> Option<PlayerId> {
        if self.first.player_id == player {
            Some(self.second.player_id)
        } else if self.second.player_id == player {
            Some(self.first.player_id)
        } else {
            None
        }
    }
}
