//! Tournament storage.
//!
//! The pairing core only ever talks to a [`TournamentStore`]. Two backends
//! are provided:
//! - [`MemoryStore`]: process-local, used by tests and short-lived sessions
//! - [`JsonlStore`]: append-only JSONL files under a data directory
//!
//! Standings are never cached. Every call recomputes them from the match and
//! bye history, so they always agree with what has been recorded.

pub mod jsonl;
pub mod memory;

pub use jsonl::{JsonlFile, JsonlStore, RecordKind};
pub use memory::MemoryStore;

use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

use crate::config::ScoreConfig;
use crate::models::{
    ByeRecord, MatchRecord, MatchReport, Outcome, Player, PlayerId, RoundRecord, StandingsEntry,
};

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Corrupt record in {path:?} at line {line}: {source}")]
    CorruptRecord {
        path: PathBuf,
        line: usize,
        source: serde_json::Error,
    },

    #[error("Unknown player: {0}")]
    UnknownPlayer(PlayerId),
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn players_path(&self) -> PathBuf {
        self.data_dir.join(RecordKind::Player.filename())
    }

    pub fn matches_path(&self) -> PathBuf {
        self.data_dir.join(RecordKind::Match.filename())
    }

    pub fn byes_path(&self) -> PathBuf {
        self.data_dir.join(RecordKind::Bye.filename())
    }

    pub fn rounds_path(&self) -> PathBuf {
        self.data_dir.join(RecordKind::Round.filename())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

/// Persistence for one tournament: players, matches and byes.
///
/// Every write is all-or-nothing. In particular `record_match` stores the match,
/// both participants and both results as a single record, so a reader never
/// sees a match counted for one player but not the other.
pub trait TournamentStore: Send {
    /// Backend name for logging.
    fn name(&self) -> &'static str;

    /// Add a player and return it with its newly assigned id.
    fn register_player(&mut self, name: &str) -> Result<Player, StorageError>;

    /// All players in registration order.
    fn players(&self) -> Result<Vec<Player>, StorageError>;

    fn count_players(&self) -> Result<usize, StorageError> {
        Ok(self.players()?.len())
    }

    /// All recorded matches in the order they were reported.
    fn matches(&self) -> Result<Vec<MatchRecord>, StorageError>;

    fn match_count(&self) -> Result<usize, StorageError> {
        Ok(self.matches()?.len())
    }

    /// Store a match. Fails with `UnknownPlayer` if either side is not registered.
    fn record_match(&mut self, report: MatchReport) -> Result<MatchRecord, StorageError>;

    /// All byes in the order they were awarded.
    fn byes(&self) -> Result<Vec<ByeRecord>, StorageError>;

    /// Append a bye. Fails with `UnknownPlayer` if the player is not registered.
    fn record_bye(&mut self, bye: ByeRecord) -> Result<(), StorageError>;

    /// All paired rounds, oldest first.
    fn rounds(&self) -> Result<Vec<RoundRecord>, StorageError>;

    /// Append a paired round.
    fn record_round(&mut self, round: RoundRecord) -> Result<(), StorageError>;

    /// Remove all matches, byes and rounds. Players stay registered.
    fn delete_matches(&mut self) -> Result<(), StorageError>;

    /// Remove all players, together with every match, bye and round.
    fn delete_players(&mut self) -> Result<(), StorageError>;

    /// Current standings, scored with `scores`.
    fn standings(&self, scores: &ScoreConfig) -> Result<Vec<StandingsEntry>, StorageError> {
        Ok(compute_standings(
            &self.players()?,
            &self.matches()?,
            &self.byes()?,
            scores,
        ))
    }
}

impl<S: TournamentStore + ?Sized> TournamentStore for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn register_player(&mut self, name: &str) -> Result<Player, StorageError> {
        (**self).register_player(name)
    }

    fn players(&self) -> Result<Vec<Player>, StorageError> {
        (**self).players()
    }

    fn count_players(&self) -> Result<usize, StorageError> {
        (**self).count_players()
    }

    fn matches(&self) -> Result<Vec<MatchRecord>, StorageError> {
        (**self).matches()
    }

    fn match_count(&self) -> Result<usize, StorageError> {
        (**self).match_count()
    }

    fn record_match(&mut self, report: MatchReport) -> Result<MatchRecord, StorageError> {
        (**self).record_match(report)
    }

    fn byes(&self) -> Result<Vec<ByeRecord>, StorageError> {
        (**self).byes()
    }

    fn record_bye(&mut self, bye: ByeRecord) -> Result<(), StorageError> {
        (**self).record_bye(bye)
    }

    fn rounds(&self) -> Result<Vec<RoundRecord>, StorageError> {
        (**self).rounds()
    }

    fn record_round(&mut self, round: RoundRecord) -> Result<(), StorageError> {
        (**self).record_round(round)
    }

    fn delete_matches(&mut self) -> Result<(), StorageError> {
        (**self).delete_matches()
    }

    fn delete_players(&mut self) -> Result<(), StorageError> {
        (**self).delete_players()
    }

    fn standings(&self, scores: &ScoreConfig) -> Result<Vec<StandingsEntry>, StorageError> {
        (**self).standings(scores)
    }
}

/// Build standings from history.
///
/// Sorted by score descending; equal scores keep registration order (ascending
/// id). Every player appears exactly once, including those with no matches.
pub fn compute_standings(
    players: &[Player],
    matches: &[MatchRecord],
    byes: &[ByeRecord],
    scores: &ScoreConfig,
) -> Vec<StandingsEntry> {
    let mut rows: HashMap<PlayerId, StandingsEntry> = players
        .iter()
        .map(|p| (p.id, StandingsEntry::new(p.id, p.name.clone(), 0.0, 0)))
        .collect();

    for record in matches {
        for side in record.sides() {
            if let Some(row) = rows.get_mut(&side.player_id) {
                row.score += scores.score_for(side.result);
                row.matches += 1;
            }
        }
    }

    for bye in byes {
        if let Some(row) = rows.get_mut(&bye.player_id) {
            row.score += scores.score_for(Outcome::Bye);
        }
    }

    let mut standings: Vec<StandingsEntry> = rows.into_values().collect();
    standings.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.id.cmp(&b.id)));
    standings
}

/// Checks that every id in `ids` belongs to a registered player.
pub(crate) fn ensure_registered(players: &[Player], ids: &[PlayerId]) -> Result<(), StorageError> {
    for id in ids {
        if !players.iter().any(|p| p.id == *id) {
            return Err(StorageError::UnknownPlayer(*id));
        }
    }
    Ok(())
}
