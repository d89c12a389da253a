//! Match result labels.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// The result one side of a match reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchResult {
    Win,
    Lose,
    Draw,
}

impl MatchResult {
    /// Returns true if `self` and `other` can be the two sides of one match:
    /// (win, lose), (lose, win) or (draw, draw).
    pub fn is_consistent_with(&self, other: MatchResult) -> bool {
        matches!(
            (self, other),
            (MatchResult::Win, MatchResult::Lose)
                | (MatchResult::Lose, MatchResult::Win)
                | (MatchResult::Draw, MatchResult::Draw)
        )
    }
}

impl std::fmt::Display for MatchResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatchResult::Win => write!(f, "win"),
            MatchResult::Lose => write!(f, "lose"),
            MatchResult::Draw => write!(f, "draw"),
        }
    }
}

impl FromStr for MatchResult {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "win" => Ok(MatchResult::Win),
            "lose" | "loss" => Ok(MatchResult::Lose),
            "draw" => Ok(MatchResult::Draw),
            other => Err(format!("unknown result '{}' (expected win, lose or draw)", other)),
        }
    }
}

/// Anything that earns points in the standings. A bye is not a match result
/// but is scored from the same table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Lose,
    Draw,
    Bye,
}

impl From<MatchResult> for Outcome {
    fn from(result: MatchResult) -> Self {
        match result {
            MatchResult::Win => Outcome::Win,
            MatchResult::Lose => Outcome::Lose,
            MatchResult::Draw => Outcome::Draw,
        }
    }
}
