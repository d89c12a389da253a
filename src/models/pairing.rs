//! Pairing model — round pairings and bye records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{PlayerId, StandingsEntry};

/// Two players assigned to meet in one round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    /// Higher-ranked player of the two
    pub player1_id: PlayerId,
    pub player1_name: String,

    /// Lower-ranked player of the two
    pub player2_id: PlayerId,
    pub player2_name: String,
}

impl Pairing {
    /// Pair two standings rows, keeping their rank order.
    pub fn between(higher: &StandingsEntry, lower: &StandingsEntry) -> Self {
        Self {
            player1_id: higher.id,
            player1_name: higher.name.clone(),
            player2_id: lower.id,
            player2_name: lower.name.clone(),
        }
    }
}

/// A bye awarded to a player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ByeRecord {
    /// Player who received the bye
    pub player_id: PlayerId,

    /// Matches recorded in the store when the bye was awarded
    pub after_matches: usize,

    /// When this record was created
    pub awarded_at: DateTime<Utc>,
}

impl ByeRecord {
    pub fn new(player_id: PlayerId, after_matches: usize) -> Self {
        Self {
            player_id,
            after_matches,
            awarded_at: Utc::now(),
        }
    }
}

/// The outcome of pairing one round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundPlan {
    /// 1-based round number
    pub round: u32,

    /// Player sitting out this round, if the field is odd
    pub bye: Option<StandingsEntry>,

    /// Pairings in rank order, highest pair first
    pub pairings: Vec<Pairing>,
}

/// A planned round as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub plan: RoundPlan,

    /// Matches recorded in the store when the round was paired
    pub after_matches: usize,

    pub planned_at: DateTime<Utc>,
}

impl RoundRecord {
    pub fn new(plan: RoundPlan, after_matches: usize) -> Self {
        Self {
            plan,
            after_matches,
            planned_at: Utc::now(),
        }
    }

    /// A round stays open until as many matches as it has pairings have been
    /// reported since it was paired.
    pub fn is_open(&self, match_count: usize) -> bool {
        match_count.saturating_sub(self.after_matches) < self.plan.pairings.len()
    }
}
